//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON exactly: auth payloads are
//! snake_case (`expires_at`), review payloads are camelCase
//! (`proteinPerServing`). Serde renames keep the Rust side idiomatic.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// An authenticated account as stored in the session and returned by login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric account identifier.
    pub id: i64,
    /// Login email address.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
}

impl User {
    /// Name to show in the UI, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or(&self.email)
    }
}

/// Body of `POST /api/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful `POST /api/login` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for authenticated requests.
    pub token: String,
    pub user: User,
    /// Token expiry as an RFC 3339 string, when the server reports it.
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `201 Created` response from `POST /api/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Review author summary embedded in each review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// A published supplement review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user: ReviewAuthor,
    /// Publication timestamp as sent by the server.
    pub posted_at: String,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    pub protein_per_serving: String,
    pub price_per_serving: String,
    pub comment: String,
}

/// Body of `POST /api/reviews`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub protein_per_serving: String,
    pub price_per_serving: String,
    pub comment: String,
    pub images: Vec<String>,
}

/// Response from `POST /api/reviews`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error envelope used by every backend handler: `{"error": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
