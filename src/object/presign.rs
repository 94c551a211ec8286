use aws_sdk_s3::{Client, error, operation, presigning::PresigningConfig};
use std::time;

/// Signed download URL for one object.
///
/// Signing happens locally; no request reaches the service. The URL grants `GET` on the
/// object to anyone holding it until it expires.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Presign {
    /// Bucket name.
    pub bucket: String,
    /// How long the URL stays valid; at most seven days.
    pub expires_in: time::Duration,
    /// Object key.
    pub key: String,
}

impl Default for Presign {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            expires_in: time::Duration::from_secs(3600),
            key: String::new(),
        }
    }
}

impl Presign {
    /// Sign the request and return its URL.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<String, error::SdkError<operation::get_object::GetObjectError>> {
        let config = match PresigningConfig::expires_in(self.expires_in) {
            Ok(config) => config,
            Err(failure) => return Err(error::SdkError::construction_failure(failure)),
        };
        let request = client
            .get_object()
            .bucket(self.bucket)
            .key(self.key)
            .presigned(config)
            .await?;
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_s3::config::{Credentials, Region};

    fn client() -> Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version_latest()
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"))
            .build();
        Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_presigned_url() {
        let presign = Presign {
            bucket: "movies".to_string(),
            key: "deniro.csv".to_string(),
            ..Default::default()
        };
        let url = presign.send(&client()).await.unwrap();
        assert!(url.starts_with("https://"));
        assert!(url.contains("movies"));
        assert!(url.contains("deniro.csv"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_expiry_too_long() {
        let presign = Presign {
            bucket: "movies".to_string(),
            expires_in: time::Duration::from_secs(8 * 24 * 3600),
            key: "deniro.csv".to_string(),
        };
        let failure = presign.send(&client()).await.unwrap_err();
        assert!(matches!(failure, error::SdkError::ConstructionFailure(_)));
    }
}
