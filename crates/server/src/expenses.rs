//! Expense API endpoints

use std::path::Path as FsPath;

use api_types::{
    Message,
    expense::{ExpenseFields, ExpenseNew, ExpenseView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use engine::{EngineError, User};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{expense_input, expense_view},
};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .new_expense(&user, payload.batch_id, expense_input(payload.fields))
        .await?;

    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&user, expense_id).await?;
    Ok(Json(expense_view(expense)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseFields>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(&user, expense_id, expense_input(payload))
        .await?;

    Ok(Json(expense_view(expense)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_expense(&user, expense_id).await?;
    Ok(Json(Message {
        message: "Expense deleted successfully".to_string(),
    }))
}

/// Name usable inside a quoted `Content-Disposition` filename.
fn disposition_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && !matches!(c, '"' | '\\')) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Stream back the receipt stored for an expense.
///
/// Only the last component of the stored path is used, so a crafted
/// attachment value cannot escape the upload directory.
pub async fn attachment(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let expense = state.engine.expense(&user, expense_id).await?;
    let missing = || ServerError::Engine(EngineError::KeyNotFound("attachment not exists".to_string()));

    let stored = expense.attachment.ok_or_else(missing)?;
    let stored_name = FsPath::new(&stored)
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(missing)?
        .to_string();

    let bytes = match tokio::fs::read(state.config.upload_dir.join(&stored_name)).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(missing()),
        Err(err) => return Err(ServerError::Upload(err.to_string())),
    };

    let file_name = disposition_name(expense.attachment_name.as_deref().unwrap_or(&stored_name));
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}
