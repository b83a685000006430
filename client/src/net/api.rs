//! Typed REST endpoints for auth and reviews.
//!
//! Auth endpoints are public calls (a `401` from `/api/login` means wrong
//! credentials, not an expired session). Review reads are public; posting a
//! review requires a session.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` with the server's
//! `{"error": ...}` text so forms can show it inline.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::error::ApiError;
use super::gateway::{ApiGateway, RequestOptions, expect_json};
use super::transport::{HttpResponse, Method};
use super::types::{
    CreateReviewRequest, CreateReviewResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    Review,
};
use crate::state::session::SessionContext;

pub const LOGIN_PATH: &str = "/api/login";
pub const REGISTER_PATH: &str = "/api/register";
pub const REVIEWS_PATH: &str = "/api/reviews";
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

fn review_endpoint(id: i64) -> String {
    format!("{REVIEWS_PATH}/{id}")
}

fn reviews_page_endpoint(limit: u32, offset: u32) -> String {
    format!("{REVIEWS_PATH}?limit={limit}&offset={offset}")
}

/// The backend encodes an empty list as `null`.
fn expect_review_list(resp: &HttpResponse) -> Result<Vec<Review>, ApiError> {
    let reviews: Option<Vec<Review>> = expect_json(resp, "Failed to load reviews.")?;
    Ok(reviews.unwrap_or_default())
}

fn user_reviews_endpoint(user_id: i64, limit: u32, offset: u32) -> String {
    format!("/api/users/{user_id}/reviews?limit={limit}&offset={offset}")
}

/// Exchange credentials for a token via `POST /api/login`.
///
/// # Errors
///
/// Returns `ApiError::Status` when the server rejects the credentials and
/// `ApiError::Network` when it cannot be reached.
pub async fn login(gateway: &ApiGateway, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let options = RequestOptions::json(Method::Post, request)?.public();
    let resp = gateway.request(LOGIN_PATH, options).await?;
    expect_json(&resp, "Login failed.")
}

/// Log in and start the session with the returned token and user.
///
/// # Errors
///
/// Returns the login error; a failure to persist the credential is logged by
/// the session and does not fail the call.
pub async fn sign_in(
    gateway: &ApiGateway,
    session: &SessionContext,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let resp = login(gateway, request).await?;
    if let Err(e) = session.login(resp.token.clone(), resp.user.clone()) {
        // Already logged by the session; the in-memory login stands.
        log::debug!("sign_in: continuing without persisted credential: {e}");
    }
    Ok(resp)
}

/// Create an account via `POST /api/register`.
///
/// # Errors
///
/// Returns `ApiError::Status` for validation failures and duplicates (`409`).
pub async fn register(gateway: &ApiGateway, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
    let options = RequestOptions::json(Method::Post, request)?.public();
    let resp = gateway.request(REGISTER_PATH, options).await?;
    expect_json(&resp, "Registration failed.")
}

/// Publish a review via `POST /api/reviews`.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationExpired` when the session was rejected.
pub async fn create_review(
    gateway: &ApiGateway,
    request: &CreateReviewRequest,
) -> Result<CreateReviewResponse, ApiError> {
    let resp = gateway.post(REVIEWS_PATH, request).await?;
    expect_json(&resp, "Failed to post the review.")
}

/// Fetch one page of the public review feed.
///
/// # Errors
///
/// Returns `ApiError::Status` or `ApiError::Network` on failure.
pub async fn list_reviews(gateway: &ApiGateway, limit: u32, offset: u32) -> Result<Vec<Review>, ApiError> {
    let options = RequestOptions::new(Method::Get).public();
    let resp = gateway.request(&reviews_page_endpoint(limit, offset), options).await?;
    expect_review_list(&resp)
}

/// Fetch a single review.
///
/// # Errors
///
/// Returns `ApiError::Status` (e.g. `404`) or `ApiError::Network`.
pub async fn get_review(gateway: &ApiGateway, id: i64) -> Result<Review, ApiError> {
    let options = RequestOptions::new(Method::Get).public();
    let resp = gateway.request(&review_endpoint(id), options).await?;
    expect_json(&resp, "Failed to load the review.")
}

/// Fetch one page of a user's reviews.
///
/// # Errors
///
/// Returns `ApiError::Status` or `ApiError::Network` on failure.
pub async fn user_reviews(
    gateway: &ApiGateway,
    user_id: i64,
    limit: u32,
    offset: u32,
) -> Result<Vec<Review>, ApiError> {
    let options = RequestOptions::new(Method::Get).public();
    let resp = gateway.request(&user_reviews_endpoint(user_id, limit, offset), options).await?;
    expect_review_list(&resp)
}
