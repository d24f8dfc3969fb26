//! Earning API endpoints

use api_types::{
    Message,
    earning::{EarningFields, EarningNew, EarningView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::User;
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{earning_input, earning_view},
};

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<EarningNew>,
) -> Result<(StatusCode, Json<EarningView>), ServerError> {
    let earning = state
        .engine
        .new_earning(&user, payload.batch_id, earning_input(payload.fields))
        .await?;

    Ok((StatusCode::CREATED, Json(earning_view(earning))))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(earning_id): Path<Uuid>,
) -> Result<Json<EarningView>, ServerError> {
    let earning = state.engine.earning(&user, earning_id).await?;
    Ok(Json(earning_view(earning)))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(earning_id): Path<Uuid>,
    Json(payload): Json<EarningFields>,
) -> Result<Json<EarningView>, ServerError> {
    let earning = state
        .engine
        .update_earning(&user, earning_id, earning_input(payload))
        .await?;

    Ok(Json(earning_view(earning)))
}

pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(earning_id): Path<Uuid>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_earning(&user, earning_id).await?;
    Ok(Json(Message {
        message: "Earning deleted successfully".to_string(),
    }))
}
