//! Crate error type and the service-error classification shared by every call site.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use std::{error, fmt, result};

/// Boxed error used to carry SDK failures that are not service rejections.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

/// Result alias for session-level operations.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors surfaced by the session layer.
///
/// Rejections by the remote service (throttling, not found, validation, permission,
/// conflict) are not represented here: they are logged and turned into a `false` or
/// `None` sentinel. Everything below is a failure the caller has to handle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a service response (construction, dispatch, timeout or
    /// an unparseable response).
    #[error("{operation} failed: {source}")]
    Transport {
        /// Name of the remote operation.
        operation: &'static str,
        /// Underlying SDK error.
        #[source]
        source: BoxError,
    },
    /// A table did not become active within the polling budget.
    #[error("table {table} was not active after {attempts} status checks")]
    Timeout {
        /// Table being waited on.
        table: String,
        /// Number of status checks performed.
        attempts: u32,
    },
    /// An HTTP endpoint answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status returned by the endpoint.
        status: reqwest::StatusCode,
    },
    /// HTTP transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// JSON body could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Local file or writer failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Object body stream failure.
    #[error(transparent)]
    Stream(#[from] aws_sdk_s3::primitives::ByteStreamError),
    /// Record could not be decoded into the requested type.
    #[error(transparent)]
    Decode(#[from] serde_dynamo::Error),
    /// Text that is not a decimal number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    /// Wire attribute type this crate does not model.
    #[error("unsupported attribute value {0}")]
    UnsupportedAttribute(String),
    /// A record lacks an attribute or carries it with the wrong type.
    #[error("missing or mistyped attribute {0:?}")]
    MissingAttribute(String),
}

/// Classifies SDK results into "service said no" and "something else went wrong".
pub(crate) trait ServiceResultExt<T> {
    /// `Ok(Some(_))` on success, `Ok(None)` after logging a service rejection, `Err` for
    /// any failure that is not a service rejection.
    fn or_logged(self, operation: &'static str) -> Result<Option<T>>;
}

impl<T, E, R> ServiceResultExt<T> for result::Result<T, SdkError<E, R>>
where
    E: ProvideErrorMetadata + error::Error + Send + Sync + 'static,
    R: fmt::Debug + Send + Sync + 'static,
{
    fn or_logged(self, operation: &'static str) -> Result<Option<T>> {
        match self {
            Ok(output) => Ok(Some(output)),
            Err(SdkError::ServiceError(service_error)) => {
                let service_error = service_error.into_err();
                tracing::error!(
                    operation,
                    code = service_error.code().unwrap_or("Unknown"),
                    error_message = service_error.message().unwrap_or_default(),
                    "request rejected by service"
                );
                Ok(None)
            }
            Err(other) => Err(Error::Transport {
                operation,
                source: Box::new(other),
            }),
        }
    }
}
