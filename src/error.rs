use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaultlineError>;

#[derive(Debug, Error)]
pub enum FaultlineError {
    #[error("Failed to serialize response body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write response: {message}")]
    ResponseWrite { message: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfiguration { key: String, value: String },
}

impl FaultlineError {
    /// Create a response write failure
    pub fn write_failed(msg: impl Into<String>) -> Self {
        Self::ResponseWrite {
            message: msg.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl axum::response::IntoResponse for FaultlineError {
    fn into_response(self) -> axum::response::Response {
        // The handler itself failed; nothing structured is left to say.
        tracing::error!("Fault handler failed: {}", self);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
            .into_response()
    }
}
