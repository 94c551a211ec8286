use crate::{
    error::{Result, ServiceResultExt},
    object::put_object::DeleteObject,
};

use async_trait::async_trait;
use aws_sdk_s3::Client;
use std::collections::VecDeque;

/// One page of a bucket listing.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ObjectPage {
    /// Keys on this page.
    pub keys: Vec<String>,
    /// Token for the next page; `None` on the last page.
    pub continuation_token: Option<String>,
}

/// Paged access to the keys of a bucket.
///
/// Service rejections are logged by the implementation and reported as `Ok(None)` or
/// `Ok(false)`.
#[async_trait]
pub trait ObjectPages: Send + Sync {
    /// List the page after `continuation_token`, or the first page when it is `None`.
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<Option<ObjectPage>>;

    /// Delete one object.
    async fn delete_key(&self, bucket: &str, key: &str) -> Result<bool>;
}

#[async_trait]
impl ObjectPages for Client {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<Option<ObjectPage>> {
        let output = self
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token)
            .send()
            .await
            .or_logged("list_objects_v2")?;
        Ok(output.map(|output| ObjectPage {
            keys: output
                .contents()
                .iter()
                .filter_map(|object| object.key().map(str::to_string))
                .collect(),
            continuation_token: output.next_continuation_token().map(str::to_string),
        }))
    }

    async fn delete_key(&self, bucket: &str, key: &str) -> Result<bool> {
        let delete_object = DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        Ok(delete_object
            .send(self)
            .await
            .or_logged("delete_object")?
            .is_some())
    }
}

/// Lazy cursor over every key of a bucket.
///
/// Pages are fetched on demand, following continuation tokens until the listing is
/// exhausted. An empty bucket yields nothing. A rejected page request ends the cursor
/// and is reported by [`ObjectKeys::was_rejected`].
pub struct ObjectKeys<'a, S: ?Sized> {
    bucket: String,
    buffered: VecDeque<String>,
    continuation_token: Option<String>,
    exhausted: bool,
    rejected: bool,
    source: &'a S,
}

impl<'a, S> ObjectKeys<'a, S>
where
    S: ObjectPages + ?Sized,
{
    /// Cursor positioned before the first key of `bucket`.
    pub fn new(source: &'a S, bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            buffered: VecDeque::new(),
            continuation_token: None,
            exhausted: false,
            rejected: false,
            source,
        }
    }

    /// Next key, fetching another page when the current one is used up.
    pub async fn next(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(key) = self.buffered.pop_front() {
                return Ok(Some(key));
            }
            if self.exhausted {
                return Ok(None);
            }
            let token = self.continuation_token.take();
            match self.source.list_page(&self.bucket, token).await? {
                Some(page) => {
                    self.exhausted = page.continuation_token.is_none();
                    self.continuation_token = page.continuation_token;
                    self.buffered.extend(page.keys);
                }
                None => {
                    self.exhausted = true;
                    self.rejected = true;
                }
            }
        }
    }

    /// Drain the cursor.
    pub async fn collect(mut self) -> Result<Option<Vec<String>>> {
        let mut keys = Vec::new();
        while let Some(key) = self.next().await? {
            keys.push(key);
        }
        Ok((!self.rejected).then_some(keys))
    }

    /// Whether a page request was rejected by the service.
    pub fn was_rejected(&self) -> bool {
        self.rejected
    }
}

/// Delete every object in `bucket`.
///
/// Keeps going after a rejected delete; returns `false` if any delete or page request
/// was rejected.
pub async fn delete_all<S>(source: &S, bucket: &str) -> Result<bool>
where
    S: ObjectPages + ?Sized,
{
    let mut keys = ObjectKeys::new(source, bucket);
    let mut complete = true;
    while let Some(key) = keys.next().await? {
        if !source.delete_key(bucket, &key).await? {
            complete = false;
        }
    }
    Ok(complete && !keys.was_rejected())
}
