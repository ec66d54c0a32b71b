// src/handlers/mod.rs

pub mod admin;
pub mod answer;
pub mod questionnaire;

use crate::error::AppError;

/// Fallback for every unknown route.
pub async fn endpoint_not_found() -> AppError {
    AppError::EndpointNotFound
}
