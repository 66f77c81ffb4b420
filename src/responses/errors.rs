use crate::errors::{ExportError, ServerError, StoreError};
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};
use tracing::{error, warn};

pub type ResultResp = Result<Response, ServerError>;

/// Status code and message shown for an error that reached the top of a handler.
pub fn status_and_message(err: &ServerError) -> (u16, String) {
    match err {
        ServerError::NotFound => (404, "Not Found".into()),
        ServerError::BadRequest(msg) => (400, msg.clone()),
        ServerError::Unauthorized(msg) => (401, msg.clone()),
        ServerError::Store(e @ StoreError::PermissionDenied { .. }) => (403, e.user_message()),
        ServerError::Store(e @ StoreError::Unavailable(_)) => (503, e.user_message()),
        ServerError::Store(e) => (500, e.user_message()),
        ServerError::Export(ExportError::Empty) => (422, ExportError::Empty.to_string()),
        ServerError::Export(e) => (500, e.to_string()),
        ServerError::DbError(msg) => (500, format!("Database Error: {msg}")),
        ServerError::InternalError => (500, "Internal Server Error".into()),
    }
}

/// Convert a ServerError into a proper HTML response page
pub fn error_to_response(err: ServerError) -> Response {
    let (status, message) = status_and_message(&err);
    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
