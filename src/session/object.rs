use crate::{
    error::{Result, ServiceResultExt},
    object::{
        bucket::{self, CreateBucket, DeleteBucket},
        get_object::{self, GetObject},
        list::{self, ObjectKeys},
        presign::Presign,
        put_object::{DeleteObject, PutObject},
        select::{SelectEvents, SelectObject},
        upload::Upload,
    },
    probe::{self, ProbeBody},
    session::Session,
};

use aws_sdk_s3::primitives::ByteStream;
use std::{path::Path, time};
use tokio::io::{AsyncRead, AsyncWrite};

impl Session {
    /// Names of the buckets owned by the caller.
    #[tracing::instrument(name = "session.list_buckets", skip(self), err)]
    pub async fn list_buckets(&self) -> Result<Option<Vec<String>>> {
        bucket::list_buckets(&self.s3)
            .await
            .or_logged("list_buckets")
    }

    /// Create a bucket in `region`, or in the session's region when `None`.
    #[tracing::instrument(name = "session.create_bucket", skip(self), err)]
    pub async fn create_bucket(&self, bucket: &str, region: Option<&str>) -> Result<bool> {
        let region = region.map(str::to_string).or_else(|| {
            self.s3
                .config()
                .region()
                .map(|region| region.as_ref().to_string())
        });
        let create_bucket = CreateBucket {
            bucket: bucket.to_string(),
            region,
        };
        let created = create_bucket
            .send(&self.s3)
            .await
            .or_logged("create_bucket")?;
        Ok(created.is_some())
    }

    /// Delete an empty bucket.
    #[tracing::instrument(name = "session.delete_bucket", skip(self), err)]
    pub async fn delete_bucket(&self, bucket: &str) -> Result<bool> {
        let delete_bucket = DeleteBucket {
            bucket: bucket.to_string(),
        };
        let deleted = delete_bucket
            .send(&self.s3)
            .await
            .or_logged("delete_bucket")?;
        Ok(deleted.is_some())
    }

    /// Upload everything `reader` yields, in parts when it exceeds the part size.
    #[tracing::instrument(name = "session.upload", skip(self, reader), err)]
    pub async fn upload<R>(&self, bucket: &str, key: &str, reader: R) -> Result<bool>
    where
        R: AsyncRead + Unpin,
    {
        let upload = Upload {
            bucket: bucket.to_string(),
            content_type: None,
            key: key.to_string(),
            part_size: self.config.part_size,
        };
        let uploaded = upload.send(&self.s3, reader).await?;
        if let Some(uploaded) = &uploaded {
            tracing::info!(parts = uploaded.parts, e_tag = ?uploaded.e_tag, "object uploaded");
        }
        Ok(uploaded.is_some())
    }

    /// Upload a local file, in parts when it exceeds the part size.
    #[tracing::instrument(name = "session.upload_file", skip(self, path), fields(path = %path.as_ref().display()), err)]
    pub async fn upload_file(
        &self,
        bucket: &str,
        path: impl AsRef<Path>,
        key: &str,
    ) -> Result<bool> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        self.upload(bucket, key, file).await
    }

    /// Upload an in-memory body, in parts when it exceeds the part size.
    #[tracing::instrument(name = "session.upload_bytes", skip(self, body), fields(bytes = body.len()), err)]
    pub async fn upload_bytes(&self, bucket: &str, key: &str, body: &[u8]) -> Result<bool> {
        self.upload(bucket, key, body).await
    }

    /// Upload a local file in a single request, without chunking.
    #[tracing::instrument(name = "session.put_object_file", skip(self, path), fields(path = %path.as_ref().display()), err)]
    pub async fn put_object_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<bool> {
        let put_object = PutObject {
            body: ByteStream::from_path(path.as_ref()).await?,
            bucket: bucket.to_string(),
            content_type: None,
            key: key.to_string(),
        };
        let stored = put_object
            .send(&self.s3)
            .await
            .or_logged("put_object")?;
        Ok(stored.is_some())
    }

    async fn object_body(&self, bucket: &str, key: &str) -> Result<Option<ByteStream>> {
        let get_object = GetObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            range: None,
        };
        let output = get_object
            .send(&self.s3)
            .await
            .or_logged("get_object")?;
        Ok(output.map(|output| output.body))
    }

    /// Whole object in memory.
    #[tracing::instrument(name = "session.get_object", skip(self), err)]
    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        match self.object_body(bucket, key).await? {
            Some(body) => Ok(Some(get_object::read_body(body).await?)),
            None => Ok(None),
        }
    }

    /// Stream an object into `writer`; returns the number of bytes copied.
    #[tracing::instrument(name = "session.download_to", skip(self, writer), err)]
    pub async fn download_to<W>(&self, bucket: &str, key: &str, writer: &mut W) -> Result<Option<u64>>
    where
        W: AsyncWrite + Unpin,
    {
        match self.object_body(bucket, key).await? {
            Some(body) => Ok(Some(get_object::copy_body(body, writer).await?)),
            None => Ok(None),
        }
    }

    /// Stream an object into a local file. The file is created only once the object is
    /// found, and removed again if the transfer fails.
    #[tracing::instrument(name = "session.download_file", skip(self, path), fields(path = %path.as_ref().display()), err)]
    pub async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<bool> {
        let Some(body) = self.object_body(bucket, key).await? else {
            return Ok(false);
        };
        let written = get_object::copy_to_file(body, path.as_ref()).await?;
        tracing::info!(bytes = written, "object downloaded");
        Ok(true)
    }

    /// Lazy cursor over the keys of a bucket.
    pub fn object_keys(&self, bucket: &str) -> ObjectKeys<'_, aws_sdk_s3::Client> {
        ObjectKeys::new(&self.s3, bucket)
    }

    /// Every key of a bucket, all pages included.
    #[tracing::instrument(name = "session.list_objects", skip(self), err)]
    pub async fn list_objects(&self, bucket: &str) -> Result<Option<Vec<String>>> {
        self.object_keys(bucket).collect().await
    }

    /// Delete one object. Deleting a missing key succeeds.
    #[tracing::instrument(name = "session.delete_object", skip(self), err)]
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<bool> {
        let delete_object = DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        let deleted = delete_object
            .send(&self.s3)
            .await
            .or_logged("delete_object")?;
        Ok(deleted.is_some())
    }

    /// Delete every object of a bucket, one by one.
    ///
    /// Not atomic: concurrent writers may observe, or add to, a partially emptied bucket.
    #[tracing::instrument(name = "session.delete_all_objects", skip(self), err)]
    pub async fn delete_all_objects(&self, bucket: &str) -> Result<bool> {
        list::delete_all(&self.s3, bucket).await
    }

    /// Signed `GET` URL for an object, valid for `expires_in`.
    #[tracing::instrument(name = "session.presigned_url", skip(self), err)]
    pub async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: time::Duration,
    ) -> Result<Option<String>> {
        let presign = Presign {
            bucket: bucket.to_string(),
            expires_in,
            key: key.to_string(),
        };
        presign.send(&self.s3).await.or_logged("presign_get_object")
    }

    /// Dereference a signed URL; a non-success status is an error.
    pub async fn fetch_presigned(&self, url: &str) -> Result<Vec<u8>> {
        probe::fetch(&self.http, url).await
    }

    /// Run a SQL expression over one object and stream back its events.
    #[tracing::instrument(
        name = "session.select_object_content",
        skip_all,
        fields(bucket = %select.bucket, key = %select.key),
        err
    )]
    pub async fn select_object_content(&self, select: SelectObject) -> Result<Option<SelectEvents>> {
        let output = select
            .send(&self.s3)
            .await
            .or_logged("select_object_content")?;
        Ok(output.map(SelectEvents::from))
    }

    /// `GET` a JSON endpoint; a non-success status is an error.
    pub async fn get_json(&self, url: &str) -> Result<ProbeBody> {
        probe::get_json(&self.http, url).await
    }
}
