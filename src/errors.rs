// errors.rs
use crate::tesla::ApiError;
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad input, etc.) or the upstream API layer.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Upstream API error: {0}")]
    Upstream(#[from] ApiError),
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
