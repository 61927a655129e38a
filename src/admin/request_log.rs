use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::metrics;

/// Log URI and method of each admin request.
pub async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        request_uri = %request.uri(),
        request_method = %request.method(),
        "Internal endpoint hit"
    );
    next.run(request).await
}

/// Count admin requests by route and status.
pub async fn count_request(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    metrics::record_admin_request(&path, response.status().as_u16());
    response
}
