// src/models/status.rs

use serde::Serialize;
use utoipa::ToSchema;

/// `{"message": ...}` body of 402/404 responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

/// `{"status": "OK"}` or `{"status": "failed", "reason": ...}` from admin endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdminStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            reason: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub dbconnection: String,
}
