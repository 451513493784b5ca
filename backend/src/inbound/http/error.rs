//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const CONFIGURATION_MESSAGE: &str = "Internal server error";
const PERSISTENCE_MESSAGE: &str = "Service temporarily unavailable";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DuplicateIdentity | ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::PersistenceError => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Replace server-side failure messages with generic text.
///
/// Configuration and persistence messages name settings and storage details
/// that clients must not see; the full error is logged instead.
fn redact_if_internal(error: &Error) -> Error {
    let generic = match error.code() {
        ErrorCode::ConfigurationError => CONFIGURATION_MESSAGE,
        ErrorCode::PersistenceError => PERSISTENCE_MESSAGE,
        _ => return error.clone(),
    };
    error!(code = ?error.code(), message = error.message(), "request failed");
    let redacted = Error::new(error.code(), generic);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::configuration("request handling failed")
    }
}
