use askama::Template;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::VERSION;

/// Newtype for passing error messages through response extensions.
#[derive(Clone)]
pub struct ErrorMessage(pub String);

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorPageTemplate {
    title: String,
    version: &'static str,
    status_code: u16,
    status_text: &'static str,
    message: String,
    /// CSS modifier of the alert box, `warning` or `error`.
    severity: &'static str,
}

/// Routes whose error responses are consumed by programs, not people.
fn keeps_own_body(path: &str) -> bool {
    path.starts_with("/api/") || path.ends_with(".csv") || path == "/health"
}

/// Middleware that logs failed requests and wraps page errors in a full
/// HTML error page.
pub async fn error_page_middleware(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let method = request.method().clone();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = response
        .extensions()
        .get::<ErrorMessage>()
        .map(|m| m.0.clone());
    tracing::warn!(
        %status,
        %method,
        %path,
        error_message = message.as_deref().unwrap_or(""),
        "request failed"
    );

    if keeps_own_body(&path) {
        response
    } else {
        render_error_page(status, message)
    }
}

/// Fallback handler for unmatched routes.
pub async fn fallback_handler() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    response.extensions_mut().insert(ErrorMessage(
        "The page you're looking for doesn't exist.".into(),
    ));
    response
}

fn render_error_page(status: StatusCode, message: Option<String>) -> Response {
    let status_text = status.canonical_reason().unwrap_or("Error");
    let template = ErrorPageTemplate {
        title: status_text.to_string(),
        version: VERSION,
        status_code: status.as_u16(),
        status_text,
        message: message.unwrap_or_else(|| fallback_message(status)),
        // A user without data is a warning, not a failure.
        severity: if status == StatusCode::NOT_FOUND {
            "warning"
        } else {
            "error"
        },
    };

    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page template: {}", e);
            (status, status_text).into_response()
        }
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => "The request could not be understood.".into(),
        StatusCode::NOT_FOUND => "The page you're looking for doesn't exist.".into(),
        StatusCode::METHOD_NOT_ALLOWED => "This action is not supported.".into(),
        s if s.is_server_error() => "Something went wrong on our end.".into(),
        s => format!("An unexpected error occurred ({}).", s.as_u16()),
    }
}
