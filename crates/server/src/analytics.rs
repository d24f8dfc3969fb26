//! Dashboard analytics.

use api_types::analytics::{Dashboard, RangeQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{TimeRange, User};

use crate::{
    ServerError,
    server::ServerState,
    views::{breakdown_view, summary_view, totals_view},
};

/// Missing or blank means `month`.
pub(crate) fn parse_range(range: Option<&str>) -> Result<TimeRange, ServerError> {
    match range.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(TimeRange::default()),
        Some(r) => r
            .parse()
            .map_err(|_| ServerError::Generic(format!("invalid range: {r}"))),
    }
}

pub(crate) async fn load_dashboard(
    state: &ServerState,
    user: &User,
    query: &RangeQuery,
) -> Result<engine::Dashboard, ServerError> {
    let range = parse_range(query.range.as_deref())?;
    let today = Utc::now().date_naive();
    Ok(state.engine.dashboard(user, range, today).await?)
}

pub async fn dashboard(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Dashboard>, ServerError> {
    let dashboard = load_dashboard(&state, &user, &query).await?;

    Ok(Json(Dashboard {
        range: dashboard.range.as_str().to_string(),
        since: dashboard.since,
        until: dashboard.until,
        currency: state.config.currency.clone(),
        overall: totals_view(&dashboard.overall),
        batches: dashboard.batches.into_iter().map(summary_view).collect(),
        expenses_by_category: breakdown_view(dashboard.expenses_by_category),
        earnings_by_category: breakdown_view(dashboard.earnings_by_category),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_defaults_to_month() {
        assert!(matches!(parse_range(None), Ok(TimeRange::Month)));
        assert!(matches!(parse_range(Some("")), Ok(TimeRange::Month)));
        assert!(matches!(parse_range(Some("quarter")), Ok(TimeRange::Quarter)));
        assert!(matches!(
            parse_range(Some("decade")),
            Err(ServerError::Generic(_))
        ));
    }
}
