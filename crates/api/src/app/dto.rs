use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use txguard_auth::{Role, ScopePredicate};
use txguard_core::Username;

// -------------------------
// Request DTOs
// -------------------------

/// Login body. `role` is free text here; anything outside the closed role set
/// fails like any other credential mismatch.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub username: Username,
    pub role: Role,
    pub scope: ScopePredicate,
    pub expires_at: DateTime<Utc>,
}
