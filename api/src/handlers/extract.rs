//! Extractors whose rejections render as `AppError`
//!
//! Malformed bodies (unknown enum values, wrong types, bad JSON) and
//! non-numeric path ids come back as a 400 validation error with the usual
//! `{error, details}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` with validation-error rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with validation-error rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
