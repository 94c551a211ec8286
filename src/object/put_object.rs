use aws_sdk_s3::{Client, error, operation, primitives::ByteStream};

/// Put object operation: one request, no chunking.
///
/// The whole body travels in a single request, which caps it at the service's single
/// upload limit. Use [`Upload`](crate::object::upload::Upload) for bodies of any size.
///
/// ```rust,no_run
/// use aws_sdk_s3::{Client, primitives::ByteStream};
/// use cloud_crud::object::put_object::PutObject;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_object = PutObject {
///     body: ByteStream::from_path("deniro.csv").await?,
///     bucket: "my-bucket".to_string(),
///     content_type: Some("text/csv".to_string()),
///     key: "deniro.csv".to_string(),
/// };
/// put_object.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PutObject {
    /// Object payload.
    pub body: ByteStream,
    /// Bucket name.
    pub bucket: String,
    /// Content type stored with the object.
    pub content_type: Option<String>,
    /// Object key.
    pub key: String,
}

impl PutObject {
    /// Execute the put object operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_object::PutObjectOutput,
        error::SdkError<operation::put_object::PutObjectError>,
    > {
        client
            .put_object()
            .bucket(self.bucket)
            .key(self.key)
            .set_content_type(self.content_type)
            .body(self.body)
            .send()
            .await
    }
}

/// Delete object operation. Deleting a missing key succeeds.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DeleteObject {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl DeleteObject {
    /// Execute the delete object operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_object::DeleteObjectOutput,
        error::SdkError<operation::delete_object::DeleteObjectError>,
    > {
        client
            .delete_object()
            .bucket(self.bucket)
            .key(self.key)
            .send()
            .await
    }
}
