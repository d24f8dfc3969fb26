//! Batch API endpoints

use api_types::{
    analytics::BatchSummary as SummaryView,
    batch::{BatchDetail, BatchList, BatchNew, BatchOwner, BatchUpdate, BatchView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{BatchFilter, BatchStatus, Totals, User};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{batch_view, earning_view, expense_view, status_from_wire, summary_view, totals_view},
};

/// `all` or an empty value means no status filter.
fn parse_status(status: Option<&str>) -> Result<Option<BatchStatus>, ServerError> {
    match status.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => BatchStatus::try_from(s.to_uppercase().as_str())
            .map(Some)
            .map_err(|_| ServerError::Generic(format!("invalid status: {s}"))),
    }
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BatchNew>,
) -> Result<(StatusCode, Json<BatchView>), ServerError> {
    let batch = state
        .engine
        .new_batch(
            &user,
            engine::BatchNew {
                name: payload.name,
                start_date: payload.start_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(batch_view(batch))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<BatchList>,
) -> Result<Json<Vec<SummaryView>>, ServerError> {
    let filter = BatchFilter {
        status: parse_status(query.status.as_deref())?,
        search: query.search,
    };
    let summaries = state.engine.list_batches(&user, &filter).await?;

    Ok(Json(summaries.into_iter().map(summary_view).collect()))
}

pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<BatchDetail>, ServerError> {
    let detail = state.engine.batch_detail(&user, batch_id).await?;
    let totals = Totals::of(&detail.expenses, &detail.earnings)?;

    Ok(Json(BatchDetail {
        batch: batch_view(detail.batch),
        owner: BatchOwner {
            name: detail.owner.name,
            email: detail.owner.email,
        },
        expenses: detail.expenses.into_iter().map(expense_view).collect(),
        earnings: detail.earnings.into_iter().map(earning_view).collect(),
        summary: totals_view(&totals),
    }))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<BatchUpdate>,
) -> Result<Json<BatchView>, ServerError> {
    let batch = state
        .engine
        .update_batch(
            &user,
            batch_id,
            engine::BatchUpdate {
                name: payload.name,
                status: status_from_wire(payload.status),
                start_date: payload.start_date,
                end_date: payload.end_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(batch_view(batch)))
}

/// Delete a batch along with its expenses and earnings.
pub async fn delete(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_batch(&user, batch_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn analytics(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<SummaryView>, ServerError> {
    let summary = state.engine.batch_summary(&user, batch_id).await?;
    Ok(Json(summary_view(summary)))
}
