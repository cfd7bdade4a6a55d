use crate::fairings::request_span_for;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"error": "Internal server error"}))]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Failure raised by a route handler. Whatever the cause, the client only
/// ever sees the generic 500 body; the detail goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Internal(String),
}

/// Message of every error in the `source()` chain, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let stack = error_chain(&self);
        request_span_for(req).in_scope(|| {
            tracing::error!(
                error = %self,
                stack = ?stack,
                "Unhandled error"
            );
        });

        (
            Status::InternalServerError,
            Json(ErrorResponse::new(INTERNAL_ERROR_MESSAGE)),
        )
            .respond_to(req)
    }
}
