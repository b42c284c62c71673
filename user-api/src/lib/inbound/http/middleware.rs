use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use super::JSON_API_MEDIA_TYPE;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that rejects requests not speaking the JSON:API media type.
///
/// `Accept` is checked on every request and `Content-Type` on requests that
/// carry a body, before authentication or any handler runs. Responses that
/// have a body are relabelled with the JSON:API media type.
pub async fn negotiate_content(req: Request, next: Next) -> Response {
    let mut response = match check_media_types(&req) {
        Ok(()) => next.run(req).await,
        Err(e) => {
            tracing::debug!(method = %req.method(), uri = %req.uri(), error = ?e, "Content negotiation failed");
            e.into_response()
        }
    };

    if response.headers().contains_key(header::CONTENT_TYPE) {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_API_MEDIA_TYPE),
        );
    }

    response
}

fn check_media_types(req: &Request) -> Result<(), ApiError> {
    if !accepts_json_api(req.headers()) {
        return Err(ApiError::NotAcceptable);
    }
    if has_body(req.method()) && !sends_json_api(req.headers()) {
        return Err(ApiError::UnsupportedMediaType);
    }

    Ok(())
}

/// Middleware that validates the bearer token and adds the user to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(req.headers())?;

    let user_id = state.auth_service.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Bearer token rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn has_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Media type without parameters, lowercased.
fn essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn accepts_json_api(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|range| essence(range) == JSON_API_MEDIA_TYPE)
}

fn sends_json_api(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| essence(value) == JSON_API_MEDIA_TYPE)
}

fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_static(*value));
        }
        headers
    }

    #[test]
    fn test_accept_must_name_json_api() {
        assert!(accepts_json_api(&headers(&[(
            header::ACCEPT,
            "application/vnd.api+json"
        )])));
        assert!(accepts_json_api(&headers(&[(
            header::ACCEPT,
            "text/html, application/vnd.api+json; q=0.9"
        )])));
        assert!(!accepts_json_api(&headers(&[(
            header::ACCEPT,
            "application/json"
        )])));
        assert!(!accepts_json_api(&HeaderMap::new()));
    }

    #[test]
    fn test_content_type_must_be_json_api() {
        assert!(sends_json_api(&headers(&[(
            header::CONTENT_TYPE,
            "application/vnd.api+json; charset=utf-8"
        )])));
        assert!(!sends_json_api(&headers(&[(
            header::CONTENT_TYPE,
            "application/json"
        )])));
        assert!(!sends_json_api(&HeaderMap::new()));
    }

    #[test]
    fn test_only_body_methods_need_content_type() {
        assert!(has_body(&Method::POST));
        assert!(has_body(&Method::PUT));
        assert!(has_body(&Method::PATCH));
        assert!(!has_body(&Method::GET));
    }

    #[test]
    fn test_extract_bearer_token() {
        let valid = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(extract_token_from_header(&valid), Ok("abc.def.ghi"));

        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "abc.def.ghi"] {
            let invalid = headers(&[(header::AUTHORIZATION, value)]);
            assert!(matches!(
                extract_token_from_header(&invalid),
                Err(ApiError::Unauthorized(_))
            ));
        }

        assert!(matches!(
            extract_token_from_header(&HeaderMap::new()),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
