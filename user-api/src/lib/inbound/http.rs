pub mod documents;
pub mod handlers;
pub mod middleware;
pub mod router;

/// Media type of every resource request and response.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
