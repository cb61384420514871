//! Request extractors whose rejections go through `AppError`.
//!
//! Axum's own `Json` and `Path` reject with plain-text bodies and their own status
//! codes. These wrappers keep malformed input inside the `{"detail": ...}` contract.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json`, rejecting with `AppError::Validation` (422).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path`, rejecting with `AppError::Validation` (422).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
