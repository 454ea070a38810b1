//! Request extractors that report rejections in the API's error shape.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections become [`AppError::BadRequest`], so malformed
/// bodies answer with `{error, code}` instead of axum's plain-text default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
