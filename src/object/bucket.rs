use aws_sdk_s3::{Client, error, operation, types};

/// Region whose buckets must be created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// create bucket operation
#[derive(Clone, Debug, Default, PartialEq)]
struct CreateBucketInput {
    bucket: String,
    configuration: Option<types::CreateBucketConfiguration>,
}

/// Create bucket operation.
///
/// ```rust,no_run
/// use aws_sdk_s3::Client;
/// use cloud_crud::object::bucket::CreateBucket;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let create_bucket = CreateBucket {
///     bucket: "my-bucket".to_string(),
///     region: Some("us-west-1".to_string()),
/// };
/// create_bucket.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CreateBucket {
    /// Bucket name.
    pub bucket: String,
    /// Region the bucket is created in; `None` uses the client's region.
    pub region: Option<String>,
}

impl From<CreateBucket> for CreateBucketInput {
    fn from(create_bucket: CreateBucket) -> Self {
        let configuration = create_bucket
            .region
            .filter(|region| region != DEFAULT_REGION)
            .map(|region| {
                types::CreateBucketConfiguration::builder()
                    .location_constraint(types::BucketLocationConstraint::from(region.as_str()))
                    .build()
            });
        Self {
            bucket: create_bucket.bucket,
            configuration,
        }
    }
}

impl CreateBucket {
    /// Execute the create bucket operation.
    #[tracing::instrument(name = "cloud_crud.create_bucket", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::create_bucket::CreateBucketOutput,
        error::SdkError<operation::create_bucket::CreateBucketError>,
    > {
        let create_bucket: CreateBucketInput = self.into();
        client
            .create_bucket()
            .bucket(create_bucket.bucket)
            .set_create_bucket_configuration(create_bucket.configuration)
            .send()
            .await
    }
}

/// Delete bucket operation. The bucket must be empty.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DeleteBucket {
    /// Bucket name.
    pub bucket: String,
}

impl DeleteBucket {
    /// Execute the delete bucket operation.
    #[tracing::instrument(name = "cloud_crud.delete_bucket", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_bucket::DeleteBucketOutput,
        error::SdkError<operation::delete_bucket::DeleteBucketError>,
    > {
        client.delete_bucket().bucket(self.bucket).send().await
    }
}

/// Follow continuation tokens from the first page until a page carries none.
pub(crate) async fn follow_pages<F, Fut, E>(mut fetch: F) -> Result<Vec<String>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<String>, Option<String>), E>>,
{
    let mut names = Vec::new();
    let mut continuation_token = None;
    loop {
        let (page, next) = fetch(continuation_token).await?;
        names.extend(page);
        match next {
            Some(token) if !token.is_empty() => continuation_token = Some(token),
            _ => return Ok(names),
        }
    }
}

/// Names of the buckets owned by the caller, all pages included.
pub async fn list_buckets(
    client: &Client,
) -> Result<Vec<String>, error::SdkError<operation::list_buckets::ListBucketsError>> {
    follow_pages(|continuation_token| async move {
        let output = client
            .list_buckets()
            .set_continuation_token(continuation_token)
            .send()
            .await?;
        let names = output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect();
        Ok((names, output.continuation_token().map(str::to_string)))
    })
    .await
}
