use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::error::ALLOWED_METHODS;

/// Allowed headers when the caller did not ask for specific ones
pub const DEFAULT_ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Permissive CORS on every response, echoing whatever headers the caller requested
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let allowed_headers = request
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers);

    response
}
