use std::any::Any;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::user::errors::FieldError;
use crate::user::errors::UserError;

pub mod authenticate;
pub mod create_user;
pub mod get_user;
pub mod list_users;
pub mod update_user;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq> {
    status: StatusCode,
    location: Option<String>,
    body: Json<T>,
}

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.location == other.location
            && self.body.0 == other.body.0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess {
            status,
            location: None,
            body: Json(data),
        }
    }

    /// `201 Created` pointing at the new resource.
    pub fn created(data: T, location: String) -> Self {
        ApiSuccess {
            status: StatusCode::CREATED,
            location: Some(location),
            body: Json(data),
        }
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();

        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(e) => tracing::warn!(error = %e, location = %location, "Unencodable Location header"),
            }
        }

        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ValidationFailed(Vec<FieldError>),
    ParameterMissing(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    NotAcceptable,
    UnsupportedMediaType,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ValidationFailed(_) | ApiError::ParameterMissing(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "Internal Server Error",
            ApiError::ValidationFailed(_) => VALIDATIONS_FAILED,
            ApiError::ParameterMissing(_) => "Parameter missing",
            ApiError::BadRequest(_) => "Bad request",
            ApiError::NotFound(_) => "Not found",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NotAcceptable => "Not Acceptable",
            ApiError::UnsupportedMediaType => "Unsupported Media Type",
        }
    }

    fn into_body(self) -> ApiErrorBody {
        let status = self.status().as_u16().to_string();
        let title = self.title();

        let details = match self {
            ApiError::ValidationFailed(fields) => {
                return ApiErrorBody {
                    title: Some(VALIDATIONS_FAILED),
                    errors: fields
                        .iter()
                        .map(|field| ApiErrorObject {
                            status: status.clone(),
                            title,
                            details: Some(field.full_message()),
                            source: Some(ErrorSource {
                                pointer: format!("/data/attributes/{}", field.field),
                            }),
                        })
                        .collect(),
                };
            }
            ApiError::InternalServerError(cause) => {
                tracing::error!(error = %cause, "Request failed with internal error");
                None
            }
            ApiError::ParameterMissing(param) => Some(format!(
                "param is missing or the value is empty: {param}"
            )),
            ApiError::BadRequest(details)
            | ApiError::NotFound(details)
            | ApiError::Unauthorized(details) => Some(details),
            ApiError::NotAcceptable => Some(format!(
                "Accept header must be {}",
                super::JSON_API_MEDIA_TYPE
            )),
            ApiError::UnsupportedMediaType => Some(format!(
                "Content-Type header must be {}",
                super::JSON_API_MEDIA_TYPE
            )),
        };

        ApiErrorBody {
            title: None,
            errors: vec![ApiErrorObject {
                status,
                title,
                details,
                source: None,
            }],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(fields) => ApiError::ValidationFailed(fields),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => {
                ApiError::ValidationFailed(vec![FieldError::new("email", "has already been taken")])
            }
            UserError::PasswordHashing(_)
            | UserError::InvalidRecord(_)
            | UserError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::MalformedToken => ApiError::Unauthorized(err.to_string()),
        }
    }
}

/// Response for a handler that panicked, used by the catch-panic layer.
///
/// The layer sits outside content negotiation, so the media type is set here.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let cause = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());

    let mut response = ApiError::InternalServerError(cause).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(super::JSON_API_MEDIA_TYPE),
    );
    response
}

const VALIDATIONS_FAILED: &str = "Validations Failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'static str>,
    errors: Vec<ApiErrorObject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorObject {
    pub status: String,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSource {
    pub pointer: String,
}

/// JSON body extractor whose rejections use the error envelope.
///
/// Content-Type is not checked here; resource routes negotiate it in
/// middleware. An empty body deserializes as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(payload)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::user::errors::EmailError;
    use crate::user::errors::NameError;

    fn body_of(error: ApiError) -> serde_json::Value {
        serde_json::to_value(error.into_body()).unwrap()
    }

    #[test]
    fn test_not_found_body() {
        let error = ApiError::from(UserError::NotFound("7".to_string()));
        assert_eq!(error.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            body_of(error),
            json!({
                "errors": [{
                    "status": "404",
                    "title": "Not found",
                    "details": "Couldn't find User with 'id'=7"
                }]
            })
        );
    }

    #[test]
    fn test_validation_body_has_entry_per_field() {
        let error = ApiError::from(UserError::Validation(vec![
            FieldError::new("name", NameError::Blank),
            FieldError::new("email", EmailError::InvalidFormat),
        ]));
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_of(error);
        assert_eq!(body["title"], "Validations Failed");
        assert_eq!(body["errors"][0]["details"], "Name can't be blank");
        assert_eq!(
            body["errors"][1]["source"]["pointer"],
            "/data/attributes/email"
        );
    }

    #[test]
    fn test_duplicate_email_is_a_validation_failure() {
        let error = ApiError::from(UserError::EmailAlreadyExists(
            "ada@example.com".to_string(),
        ));

        let body = body_of(error);
        assert_eq!(body["title"], "Validations Failed");
        assert_eq!(body["errors"][0]["details"], "Email has already been taken");
    }

    #[test]
    fn test_parameter_missing_differs_from_validation() {
        let error = ApiError::ParameterMissing("data".to_string());
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_of(error);
        assert!(body.get("title").is_none());
        assert_eq!(body["errors"][0]["title"], "Parameter missing");
        assert_eq!(
            body["errors"][0]["details"],
            "param is missing or the value is empty: data"
        );
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let error = ApiError::from(UserError::DatabaseError(
            "password authentication failed for user postgres".to_string(),
        ));

        let body = body_of(error);
        assert_eq!(
            body,
            json!({"errors": [{"status": "500", "title": "Internal Server Error"}]})
        );
    }

    #[test]
    fn test_auth_errors_share_one_title() {
        for error in [
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::MalformedToken,
        ] {
            let api_error = ApiError::from(error);
            assert_eq!(api_error.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(api_error.title(), "Unauthorized");
        }
    }

    #[test]
    fn test_handle_panic_is_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            crate::inbound::http::JSON_API_MEDIA_TYPE
        );
    }
}
