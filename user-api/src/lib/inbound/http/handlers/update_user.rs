use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::JsonBody;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::validation::validate_user_changes;
use crate::inbound::http::documents::UserRequestDocument;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

fn parse_changes(body: Option<UserRequestDocument>) -> Result<UpdateUserCommand, ApiError> {
    let attributes = body
        .unwrap_or_default()
        .into_attributes()
        .map_err(|missing| ApiError::ParameterMissing(missing.name().to_string()))?;

    validate_user_changes(attributes.into()).map_err(|fields| UserError::Validation(fields).into())
}

/// Apply a partial update. Answers `204 No Content`; clients re-fetch the
/// resource to see its new state.
///
/// A missing user is reported before any problem with the payload.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Option<UserRequestDocument>>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&id).map_err(|_| UserError::NotFound(id.clone()))?;

    let command = match parse_changes(body) {
        Ok(command) => command,
        Err(e) => {
            state.user_service.get_user(&user_id).await?;
            return Err(e);
        }
    };

    state.user_service.update_user(&user_id, command).await?;
    tracing::debug!(user_id = %user_id, updated_by = %caller.user_id, "User update applied");

    Ok(StatusCode::NO_CONTENT)
}
