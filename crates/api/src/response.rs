//! Shared response envelope for the `/api/v1` handlers.
//!
//! The three assistant endpoints under `/api` keep their own flat shapes
//! (`{response}`, `{answer}`, the plan object) because the dashboard reads
//! them that way. Everything under `/api/v1` uses [`DataResponse`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: projects }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
