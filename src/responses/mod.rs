pub mod errors;
pub mod html;

// Error page conversion lives in responses/errors.rs
pub use errors::error_to_response;

// Normal HTML responses and redirects
pub use html::{html_response, html_response_with_cookie, redirect_response};
