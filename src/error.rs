//! Error types for shotty.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Errors that can occur while operating on the fleet.
#[derive(Error, Debug)]
pub enum ShottyError {
    /// The EC2 API answered with an error for a single resource.
    #[error("[{resource}] {code}: {message}")]
    Client {
        resource: String,
        code: String,
        message: String,
    },

    /// A waiter gave up before the resource reached the expected state.
    #[error("[{resource}] did not reach state '{state}': {message}")]
    Wait {
        resource: String,
        state: String,
        message: String,
    },

    /// The request never got a usable answer (network, credentials, timeouts).
    #[error("AWS request failed: {0}")]
    Transport(String),

    #[error("Refusing to {operation} instances across the whole fleet without --project. Use --force to override.")]
    ScopeRequired { operation: String },

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ShottyError {
    /// Classify an SDK error raised while acting on `resource`.
    ///
    /// Service errors are scoped to the resource and can be skipped by the
    /// bulk handlers. Anything else means the API could not be reached at all.
    pub fn aws<E, R>(resource: &str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(_) => ShottyError::Client {
                resource: resource.to_string(),
                code: err.code().unwrap_or("Unknown").to_string(),
                message: err
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&err).to_string()),
            },
            _ => ShottyError::Transport(DisplayErrorContext(&err).to_string()),
        }
    }

    /// Build a waiter failure for `resource`.
    pub fn wait<E: std::error::Error + 'static>(resource: &str, state: &str, err: E) -> Self {
        ShottyError::Wait {
            resource: resource.to_string(),
            state: state.to_string(),
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    /// True when the error only concerns one resource and the caller may
    /// continue with the next one.
    pub fn is_resource_error(&self) -> bool {
        matches!(self, ShottyError::Client { .. } | ShottyError::Wait { .. })
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, ShottyError>;
