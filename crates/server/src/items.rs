use api_types::items::ItemQuery;
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::User;

use crate::{ServerError, server::ServerState};

/// Autocomplete suggestions for item names.
pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<String>>, ServerError> {
    let names = state.engine.item_names(&user, query.q.as_deref()).await?;
    Ok(Json(names))
}
