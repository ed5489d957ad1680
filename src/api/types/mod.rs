//! Shared API types: error mapping and JSON extraction

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
