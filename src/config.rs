//! Session configuration.

use crate::object::upload::DEFAULT_PART_SIZE;

pub use crate::table::wait::PollPolicy;

/// Where and how a [`Session`](crate::session::Session) connects.
///
/// Unset values fall back to the SDK's default provider chain (environment, profile,
/// instance metadata).
///
/// ```rust
/// use cloud_crud::config::Config;
///
/// let config = Config {
///     dynamodb_endpoint: Some("http://localhost:8000".to_string()),
///     region: Some("us-east-1".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.poll_policy.max_attempts, 30);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Endpoint of the database service, e.g. a local emulator.
    pub dynamodb_endpoint: Option<String>,
    /// Part size of chunked uploads, in bytes.
    pub part_size: usize,
    /// Polling used while waiting for a table to become active.
    pub poll_policy: PollPolicy,
    /// Region of both services.
    pub region: Option<String>,
    /// Endpoint of the object storage service.
    pub s3_endpoint: Option<String>,
    /// Address buckets as a path segment instead of a host name.
    pub s3_force_path_style: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dynamodb_endpoint: None,
            part_size: DEFAULT_PART_SIZE,
            poll_policy: PollPolicy::default(),
            region: None,
            s3_endpoint: None,
            s3_force_path_style: false,
        }
    }
}
