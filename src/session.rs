//! Client handle with "rejected means `false`/`None`" semantics.
//!
//! Every method issues one logical operation. When the service rejects the request
//! (throttling, not found, validation, permission, conflict) the rejection is logged and
//! the method returns `false` or `None`. Any other failure is returned as an
//! [`Error`](crate::Error).

use crate::config::Config;

use aws_config::{BehaviorVersion, Region};

/// Item operations.
mod item;

/// Object storage operations.
mod object;

/// Table lifecycle operations.
mod table;

/// Database, object storage and HTTP clients sharing one configuration.
#[derive(Clone, Debug)]
pub struct Session {
    config: Config,
    dynamodb: aws_sdk_dynamodb::Client,
    http: reqwest::Client,
    s3: aws_sdk_s3::Client,
}

impl Session {
    /// Load credentials and region from the environment and build the clients.
    pub async fn connect(config: Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut dynamodb = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            dynamodb = dynamodb.endpoint_url(endpoint);
        }
        let mut s3 = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_force_path_style);
        if let Some(endpoint) = &config.s3_endpoint {
            s3 = s3.endpoint_url(endpoint);
        }
        tracing::debug!(
            region = ?sdk_config.region(),
            dynamodb_endpoint = ?config.dynamodb_endpoint,
            s3_endpoint = ?config.s3_endpoint,
            "session configured"
        );

        Self::from_clients(
            aws_sdk_dynamodb::Client::from_conf(dynamodb.build()),
            aws_sdk_s3::Client::from_conf(s3.build()),
            reqwest::Client::new(),
            config,
        )
    }

    /// Session over already built clients.
    pub fn from_clients(
        dynamodb: aws_sdk_dynamodb::Client,
        s3: aws_sdk_s3::Client,
        http: reqwest::Client,
        config: Config,
    ) -> Self {
        Self {
            config,
            dynamodb,
            http,
            s3,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Database client, for operations this handle does not wrap.
    pub fn dynamodb(&self) -> &aws_sdk_dynamodb::Client {
        &self.dynamodb
    }

    /// HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Object storage client, for operations this handle does not wrap.
    pub fn s3(&self) -> &aws_sdk_s3::Client {
        &self.s3
    }
}
