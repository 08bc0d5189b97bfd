//! HTTP middleware: CORS, request IDs, and access logging.

use std::time::Duration;

use axum::{body::Body, http::Request};
use gateway_config::CorsOrigins;
use http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tracing::{warn, Span};

/// Header carrying the per-request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the CORS layer for the configured origins.
///
/// A wildcard cannot be combined with credentials, so credentials are only
/// allowed for an explicit origin list; methods and headers are then mirrored
/// from the preflight request.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let cors = match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(allowed)
                .allow_credentials(true)
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
        }
    };

    cors.max_age(Duration::from_secs(3600))
}

/// Span for one HTTP request, tagged with its request ID
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
