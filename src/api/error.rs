//! # API Errors
//!
//! Failures talking to the generation service. None of them are fatal: the
//! caller keeps whatever it had, shows the plan as unavailable and may retry with
//! a fresh request.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a usable response: connection failure,
    /// timeout, or a non-success status.
    ///
    /// # Example
    /// ```
    /// # use trainplay_lib::api::ApiError;
    /// let err = ApiError::Unavailable {
    ///     endpoint: "/user/api/combo/make".to_string(),
    ///     reason: "HTTP 503".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Training service unavailable (/user/api/combo/make): HTTP 503");
    /// ```
    #[error("Training service unavailable ({endpoint}): {reason}")]
    Unavailable { endpoint: String, reason: String },

    /// The service answered but the body is not the expected shape.
    #[error("Unexpected payload from {endpoint}: {source}")]
    InvalidPayload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Rejected locally before any request was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether sending the same request again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Unavailable { .. })
    }
}
