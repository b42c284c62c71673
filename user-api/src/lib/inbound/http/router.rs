use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::documents::USERS_PATH;
use super::handlers::authenticate::authenticate;
use super::handlers::create_user::create_user;
use super::handlers::get_user::get_user;
use super::handlers::handle_panic;
use super::handlers::list_users::list_users;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::negotiate_content;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::pagination::PaginationPolicy;
use crate::domain::user::ports::UserServicePort;

pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub pagination: PaginationPolicy,
}

/// Build the HTTP application.
///
/// Resource routes run content negotiation, then (except registration)
/// bearer authentication, then the handler. Errors from any stage are
/// rendered by `ApiError`.
pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
    pagination: PaginationPolicy,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
        pagination,
    };

    let member_path = format!("{USERS_PATH}/:user_id");

    let public_resource_routes = Router::new().route(USERS_PATH, post(create_user));

    let protected_resource_routes = Router::new()
        .route(USERS_PATH, get(list_users))
        .route(&member_path, get(get_user).put(update_user).patch(update_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let resource_routes = Router::new()
        .merge(public_resource_routes)
        .merge(protected_resource_routes)
        .route_layer(middleware::from_fn(negotiate_content));

    let auth_routes = Router::new().route(LOGIN_PATH, post(authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(auth_routes)
        .merge(resource_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
