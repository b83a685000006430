//! Form validation for login, registration, and review posting.
//!
//! Each validator returns the trimmed, ready-to-send request or a
//! field → message map for inline display. Messages are stable strings so
//! pages can match on them in tests.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::collections::BTreeMap;

use crate::net::types::{CreateReviewRequest, LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_REVIEW_IMAGES: usize = 4;

/// Field name → message for every invalid field.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub const EMAIL_REQUIRED: &str = "Enter your email address.";
pub const EMAIL_INVALID: &str = "Enter a valid email address.";
pub const PASSWORD_REQUIRED: &str = "Enter your password.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
pub const PASSWORD_WEAK: &str = "Password must contain uppercase, lowercase, and a digit.";
pub const CONFIRM_REQUIRED: &str = "Confirm your password.";
pub const CONFIRM_MISMATCH: &str = "Passwords do not match.";
pub const PROTEIN_REQUIRED: &str = "Enter the protein per serving.";
pub const PRICE_REQUIRED: &str = "Enter the price per serving.";
pub const COMMENT_REQUIRED: &str = "Enter a comment.";
pub const TOO_MANY_IMAGES: &str = "You can attach up to 4 images.";

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.insert("email", EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.insert("email", EMAIL_INVALID);
    }
}

/// Validate the login form.
///
/// # Errors
///
/// Returns the field errors when the email or password is missing or the
/// email is malformed.
pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, FieldErrors> {
    let email = email.trim();
    let mut errors = FieldErrors::new();
    check_email(email, &mut errors);
    if password.trim().is_empty() {
        errors.insert("password", PASSWORD_REQUIRED);
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
}

/// Validate the registration form.
///
/// # Errors
///
/// Returns the field errors for a missing or malformed email, a password
/// shorter than [`MIN_PASSWORD_LEN`] or lacking upper/lower/digit, or a
/// missing/mismatched confirmation.
pub fn validate_registration(form: &RegistrationForm) -> Result<RegisterRequest, FieldErrors> {
    let email = form.email.trim();
    let mut errors = FieldErrors::new();
    check_email(email, &mut errors);

    let password = form.password.as_str();
    if password.is_empty() {
        errors.insert("password", PASSWORD_REQUIRED);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password", PASSWORD_TOO_SHORT);
    } else if !(password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit()))
    {
        errors.insert("password", PASSWORD_WEAK);
    }

    if form.confirm_password.is_empty() {
        errors.insert("confirmPassword", CONFIRM_REQUIRED);
    } else if form.confirm_password != form.password {
        errors.insert("confirmPassword", CONFIRM_MISMATCH);
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    let name = Some(form.name.trim().to_owned()).filter(|n| !n.is_empty());
    Ok(RegisterRequest { email: email.to_owned(), password: password.to_owned(), name })
}

/// Raw review form input; `images` are already-uploaded image URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub protein_per_serving: String,
    pub price_per_serving: String,
    pub comment: String,
    pub images: Vec<String>,
}

/// Validate a review draft.
///
/// # Errors
///
/// Returns the field errors for blank required fields or more than
/// [`MAX_REVIEW_IMAGES`] images.
pub fn validate_review(draft: &ReviewDraft) -> Result<CreateReviewRequest, FieldErrors> {
    let protein = draft.protein_per_serving.trim();
    let price = draft.price_per_serving.trim();
    let comment = draft.comment.trim();

    let mut errors = FieldErrors::new();
    if protein.is_empty() {
        errors.insert("proteinPerServing", PROTEIN_REQUIRED);
    }
    if price.is_empty() {
        errors.insert("pricePerServing", PRICE_REQUIRED);
    }
    if comment.is_empty() {
        errors.insert("comment", COMMENT_REQUIRED);
    }
    if draft.images.len() > MAX_REVIEW_IMAGES {
        errors.insert("images", TOO_MANY_IMAGES);
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CreateReviewRequest {
        protein_per_serving: protein.to_owned(),
        price_per_serving: price.to_owned(),
        comment: comment.to_owned(),
        images: draft.images.clone(),
    })
}
