use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::documents::UserCollectionDocument;
use crate::inbound::http::router::AppState;

/// Raw pagination parameters. Anything that is not a positive integer
/// falls back to the defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn positive(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Option<Query<ListUsersQuery>>,
) -> Result<ApiSuccess<UserCollectionDocument>, ApiError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let request = state.pagination.resolve(
        positive(query.page.as_deref()),
        positive(query.per_page.as_deref()),
    );

    state
        .user_service
        .list_users(request)
        .await
        .map_err(ApiError::from)
        .map(|ref page| ApiSuccess::new(StatusCode::OK, page.into()))
}
