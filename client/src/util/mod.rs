//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, object
//! URLs) and pure form/guard logic from components so they stay testable
//! without a browser.

pub mod auth;
pub mod image_upload;
pub mod storage;
pub mod token_store;
pub mod validation;
