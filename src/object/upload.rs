use crate::error::{Error, Result, ServiceResultExt};

use async_trait::async_trait;
use aws_sdk_s3::{Client, primitives::ByteStream, types};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Smallest part the service accepts for every part but the last.
pub const MIN_PART_SIZE: usize = 5 * 1024 * 1024;

/// Part size used when none is configured.
pub const DEFAULT_PART_SIZE: usize = 8 * 1024 * 1024;

/// Outcome of a successful upload.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Uploaded {
    /// Entity tag of the stored object.
    pub e_tag: Option<String>,
    /// Number of parts sent; `1` for a single-request upload.
    pub parts: usize,
}

/// Chunked upload of any size.
///
/// The source is read one part at a time, so memory use is bounded by the part size.
/// A source that fits in one part goes out as a single put; larger sources use a
/// multipart upload, which is aborted if any part or the completion is rejected.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Upload {
    /// Bucket name.
    pub bucket: String,
    /// Content type stored with the object.
    pub content_type: Option<String>,
    /// Object key.
    pub key: String,
    /// Part size in bytes, raised to [`MIN_PART_SIZE`] when smaller.
    pub part_size: usize,
}

impl Default for Upload {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            content_type: None,
            key: String::new(),
            part_size: DEFAULT_PART_SIZE,
        }
    }
}

/// Acknowledgement of a stored body or part.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Stored {
    /// Entity tag returned by the service.
    pub e_tag: Option<String>,
}

/// The requests a chunked upload is made of.
///
/// Service rejections are logged by the implementation and reported as `Ok(None)`.
#[async_trait]
pub trait UploadTarget: Send + Sync {
    /// Store a whole body in one request.
    async fn put_whole(&self, upload: &Upload, body: Vec<u8>) -> Result<Option<Stored>>;

    /// Start a multipart upload; returns its id.
    async fn create_upload(&self, upload: &Upload) -> Result<Option<String>>;

    /// Send one part. Part numbers start at 1.
    async fn send_part(
        &self,
        upload: &Upload,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<Option<Stored>>;

    /// Assemble the parts into the object.
    async fn complete_upload(
        &self,
        upload: &Upload,
        upload_id: &str,
        parts: Vec<types::CompletedPart>,
    ) -> Result<Option<Stored>>;

    /// Discard the parts sent so far.
    async fn abort_upload(&self, upload: &Upload, upload_id: &str) -> Result<bool>;
}

#[async_trait]
impl UploadTarget for Client {
    async fn put_whole(&self, upload: &Upload, body: Vec<u8>) -> Result<Option<Stored>> {
        let output = self
            .put_object()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .set_content_type(upload.content_type.clone())
            .body(ByteStream::from(body))
            .send()
            .await
            .or_logged("put_object")?;
        Ok(output.map(|output| Stored {
            e_tag: output.e_tag().map(str::to_string),
        }))
    }

    async fn create_upload(&self, upload: &Upload) -> Result<Option<String>> {
        let Some(created) = self
            .create_multipart_upload()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .set_content_type(upload.content_type.clone())
            .send()
            .await
            .or_logged("create_multipart_upload")?
        else {
            return Ok(None);
        };
        created
            .upload_id()
            .map(|upload_id| Some(upload_id.to_string()))
            .ok_or_else(|| Error::MissingAttribute("UploadId".to_string()))
    }

    async fn send_part(
        &self,
        upload: &Upload,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<Option<Stored>> {
        let output = self
            .upload_part()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .or_logged("upload_part")?;
        Ok(output.map(|output| Stored {
            e_tag: output.e_tag().map(str::to_string),
        }))
    }

    async fn complete_upload(
        &self,
        upload: &Upload,
        upload_id: &str,
        parts: Vec<types::CompletedPart>,
    ) -> Result<Option<Stored>> {
        let output = self
            .complete_multipart_upload()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .upload_id(upload_id)
            .multipart_upload(
                types::CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .or_logged("complete_multipart_upload")?;
        Ok(output.map(|output| Stored {
            e_tag: output.e_tag().map(str::to_string),
        }))
    }

    async fn abort_upload(&self, upload: &Upload, upload_id: &str) -> Result<bool> {
        let aborted = self
            .abort_multipart_upload()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .upload_id(upload_id)
            .send()
            .await
            .or_logged("abort_multipart_upload")?;
        Ok(aborted.is_some())
    }
}

/// Read up to `size` bytes; a short chunk means the source is exhausted.
pub(crate) async fn read_chunk<R>(reader: &mut R, size: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = Vec::with_capacity(size);
    (&mut *reader).take(size as u64).read_to_end(&mut chunk).await?;
    Ok(chunk)
}

impl Upload {
    /// Upload everything `reader` yields.
    ///
    /// `Ok(None)` means the service rejected one of the requests; the rejection has
    /// been logged and any multipart upload in progress aborted.
    pub async fn send<T, R>(self, target: &T, mut reader: R) -> Result<Option<Uploaded>>
    where
        T: UploadTarget + ?Sized,
        R: AsyncRead + Unpin,
    {
        let part_size = self.part_size.max(MIN_PART_SIZE);
        let first = read_chunk(&mut reader, part_size).await?;
        if first.len() < part_size {
            let stored = target.put_whole(&self, first).await?;
            return Ok(stored.map(|stored| Uploaded {
                e_tag: stored.e_tag,
                parts: 1,
            }));
        }

        let Some(upload_id) = target.create_upload(&self).await? else {
            return Ok(None);
        };
        let completed = match self
            .send_parts(target, &upload_id, first, &mut reader, part_size)
            .await
        {
            Ok(Some(parts)) => {
                let count = parts.len();
                target
                    .complete_upload(&self, &upload_id, parts)
                    .await
                    .map(|stored| {
                        stored.map(|stored| Uploaded {
                            e_tag: stored.e_tag,
                            parts: count,
                        })
                    })
            }
            other => other.map(|_| None),
        };
        if !matches!(completed, Ok(Some(_))) {
            match target.abort_upload(&self, &upload_id).await {
                Ok(true) => {
                    tracing::info!(key = %self.key, upload_id = %upload_id, "multipart upload aborted")
                }
                Ok(false) => {}
                Err(error) => tracing::warn!(
                    key = %self.key,
                    upload_id = %upload_id,
                    %error,
                    "failed to abort multipart upload"
                ),
            }
        }
        completed
    }

    async fn send_parts<T, R>(
        &self,
        target: &T,
        upload_id: &str,
        first: Vec<u8>,
        reader: &mut R,
        part_size: usize,
    ) -> Result<Option<Vec<types::CompletedPart>>>
    where
        T: UploadTarget + ?Sized,
        R: AsyncRead + Unpin,
    {
        let mut parts = Vec::new();
        let mut chunk = first;
        let mut part_number = 1;
        loop {
            tracing::debug!(key = %self.key, part_number, bytes = chunk.len(), "uploading part");
            let Some(stored) = target
                .send_part(self, upload_id, part_number, chunk)
                .await?
            else {
                return Ok(None);
            };
            parts.push(
                types::CompletedPart::builder()
                    .set_e_tag(stored.e_tag)
                    .part_number(part_number)
                    .build(),
            );
            chunk = read_chunk(reader, part_size).await?;
            if chunk.is_empty() {
                return Ok(Some(parts));
            }
            part_number += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq)]
    enum Request {
        Put(usize),
        Create,
        Part(i32, usize),
        Complete(Vec<i32>),
        Abort,
    }

    /// Records every request; rejects the part numbered `reject_part`.
    #[derive(Default)]
    struct RecordingTarget {
        reject_part: Option<i32>,
        requests: Mutex<Vec<Request>>,
    }

    impl RecordingTarget {
        fn record(&self, request: Request) {
            self.requests.lock().unwrap().push(request);
        }

        fn requests(&self) -> Vec<Request> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn stored(tag: impl Into<String>) -> Option<Stored> {
        Some(Stored {
            e_tag: Some(tag.into()),
        })
    }

    #[async_trait]
    impl UploadTarget for RecordingTarget {
        async fn put_whole(&self, _upload: &Upload, body: Vec<u8>) -> Result<Option<Stored>> {
            self.record(Request::Put(body.len()));
            Ok(stored("whole"))
        }

        async fn create_upload(&self, _upload: &Upload) -> Result<Option<String>> {
            self.record(Request::Create);
            Ok(Some("upload-1".to_string()))
        }

        async fn send_part(
            &self,
            _upload: &Upload,
            upload_id: &str,
            part_number: i32,
            body: Vec<u8>,
        ) -> Result<Option<Stored>> {
            assert_eq!(upload_id, "upload-1");
            self.record(Request::Part(part_number, body.len()));
            if self.reject_part == Some(part_number) {
                return Ok(None);
            }
            Ok(stored(format!("part-{part_number}")))
        }

        async fn complete_upload(
            &self,
            _upload: &Upload,
            _upload_id: &str,
            parts: Vec<types::CompletedPart>,
        ) -> Result<Option<Stored>> {
            for part in &parts {
                assert_eq!(
                    part.e_tag(),
                    Some(format!("part-{}", part.part_number().unwrap_or_default()).as_str())
                );
            }
            self.record(Request::Complete(
                parts
                    .iter()
                    .filter_map(types::CompletedPart::part_number)
                    .collect(),
            ));
            Ok(stored("assembled"))
        }

        async fn abort_upload(&self, _upload: &Upload, _upload_id: &str) -> Result<bool> {
            self.record(Request::Abort);
            Ok(true)
        }
    }

    fn upload() -> Upload {
        Upload {
            bucket: "bucket".to_string(),
            key: "deniro.csv".to_string(),
            part_size: MIN_PART_SIZE,
            ..Default::default()
        }
    }

    const HALF: usize = MIN_PART_SIZE / 2;

    #[rstest]
    #[case::shorter_than_a_part(
        100,
        None,
        vec![Request::Put(100)],
        Some(1)
    )]
    #[case::exactly_one_part(
        MIN_PART_SIZE,
        None,
        vec![
            Request::Create,
            Request::Part(1, MIN_PART_SIZE),
            Request::Complete(vec![1]),
        ],
        Some(1)
    )]
    #[case::two_and_a_half_parts(
        2 * MIN_PART_SIZE + HALF,
        None,
        vec![
            Request::Create,
            Request::Part(1, MIN_PART_SIZE),
            Request::Part(2, MIN_PART_SIZE),
            Request::Part(3, HALF),
            Request::Complete(vec![1, 2, 3]),
        ],
        Some(3)
    )]
    #[case::rejected_part_aborts(
        2 * MIN_PART_SIZE + HALF,
        Some(2),
        vec![
            Request::Create,
            Request::Part(1, MIN_PART_SIZE),
            Request::Part(2, MIN_PART_SIZE),
            Request::Abort,
        ],
        None
    )]
    #[tokio::test]
    async fn test_upload_requests(
        #[case] length: usize,
        #[case] reject_part: Option<i32>,
        #[case] expected: Vec<Request>,
        #[case] parts: Option<usize>,
    ) {
        let target = RecordingTarget {
            reject_part,
            ..Default::default()
        };
        let body = vec![7u8; length];
        let uploaded = upload().send(&target, body.as_slice()).await.unwrap();
        assert_eq!(uploaded.map(|uploaded| uploaded.parts), parts);
        assert_eq!(target.requests(), expected);
    }

    #[tokio::test]
    async fn test_small_part_size_is_raised() {
        let target = RecordingTarget::default();
        let upload = Upload {
            part_size: 1024,
            ..upload()
        };
        let body = vec![0u8; 4096];
        let uploaded = upload.send(&target, body.as_slice()).await.unwrap();
        assert_eq!(uploaded.map(|uploaded| uploaded.parts), Some(1));
        assert_eq!(target.requests(), vec![Request::Put(4096)]);
    }

    #[rstest]
    #[case::empty(0, 4, vec![])]
    #[case::short(3, 4, vec![3])]
    #[case::exact(8, 4, vec![4, 4])]
    #[case::remainder(10, 4, vec![4, 4, 2])]
    #[tokio::test]
    async fn test_read_chunk(
        #[case] length: usize,
        #[case] size: usize,
        #[case] expected: Vec<usize>,
    ) {
        let source: Vec<u8> = (0..length).map(|i| i as u8).collect();
        let mut reader = source.as_slice();
        let mut chunks = Vec::new();
        loop {
            let chunk = read_chunk(&mut reader, size).await.unwrap();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }
        let lengths: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(lengths, expected);
        assert_eq!(chunks.concat(), source);
    }

    #[test]
    fn test_default_part_size() {
        assert_eq!(Upload::default().part_size, DEFAULT_PART_SIZE);
        assert!(DEFAULT_PART_SIZE >= MIN_PART_SIZE);
    }
}
