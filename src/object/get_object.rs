use aws_sdk_s3::{
    Client, error, operation,
    primitives::{ByteStream, ByteStreamError},
};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Get object operation.
///
/// The output body is a stream: read it whole with [`read_body`] or copy it to a writer
/// with [`copy_body`].
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct GetObject {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
    /// Byte range, e.g. `bytes=0-1023`.
    pub range: Option<String>,
}

impl GetObject {
    /// Execute the get object operation.
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_object::GetObjectOutput,
        error::SdkError<operation::get_object::GetObjectError>,
    > {
        client
            .get_object()
            .bucket(self.bucket)
            .key(self.key)
            .set_range(self.range)
            .send()
            .await
    }
}

/// Collect a body into memory.
pub async fn read_body(body: ByteStream) -> Result<Vec<u8>, ByteStreamError> {
    Ok(body.collect().await?.into_bytes().to_vec())
}

/// Copy a body to `writer` chunk by chunk and return the number of bytes written.
pub async fn copy_body<W>(mut body: ByteStream, writer: &mut W) -> crate::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(chunk) = body.try_next().await? {
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// Copy a body into a new file at `path`. A file left incomplete by a failed copy is
/// removed.
pub async fn copy_to_file(body: ByteStream, path: &Path) -> crate::Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let copied = copy_body(body, &mut file).await;
    drop(file);
    discard_on_error(path, copied).await
}

async fn discard_on_error<T>(path: &Path, result: crate::Result<T>) -> crate::Result<T> {
    if let Err(error) = &result {
        tracing::warn!(path = %path.display(), %error, "removing incomplete download");
        if let Err(removal) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), %removal, "failed to remove incomplete download");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_copy_body() {
        let content = b"name,year\nTaxi Driver,1976\n".to_vec();
        let mut sink = Vec::new();
        let written = copy_body(ByteStream::from(content.clone()), &mut sink)
            .await
            .unwrap();
        assert_eq!(written, content.len() as u64);
        assert_eq!(sink, content);
    }

    #[tokio::test]
    async fn test_read_body() {
        let body = read_body(ByteStream::from_static(b"hello")).await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_copy_to_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("some_data2.txt");
        let written = copy_to_file(ByteStream::from_static(b"This is some data"), &path)
            .await
            .unwrap();
        assert_eq!(written, 17);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"This is some data");
    }

    #[tokio::test]
    async fn test_failed_copy_removes_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("deniro.csv");
        tokio::fs::write(&path, b"name,ye").await.unwrap();
        let failure = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "body ended early");
        let result = discard_on_error::<u64>(&path, Err(Error::Io(failure))).await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_successful_copy_keeps_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("deniro.csv");
        tokio::fs::write(&path, b"name,year").await.unwrap();
        assert_eq!(discard_on_error(&path, Ok(9)).await.unwrap(), 9);
        assert!(path.exists());
    }
}
