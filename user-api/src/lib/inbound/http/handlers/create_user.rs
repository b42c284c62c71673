use axum::extract::State;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::user::validation::validate_new_user;
use crate::inbound::http::documents::UserDocument;
use crate::inbound::http::documents::UserRequestDocument;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Option<UserRequestDocument>>,
) -> Result<ApiSuccess<UserDocument>, ApiError> {
    let attributes = body
        .unwrap_or_default()
        .into_attributes()
        .map_err(|missing| ApiError::ParameterMissing(missing.name().to_string()))?;

    let command = validate_new_user(attributes.into()).map_err(UserError::Validation)?;

    let user = state.user_service.create_user(command).await?;
    let document = UserDocument::from(&user);
    let location = document.data.location();

    Ok(ApiSuccess::created(document, location))
}
