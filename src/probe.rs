//! Outbound HTTP probe.
//!
//! A single unauthenticated `GET` whose status must be a success before the body is
//! looked at.

use crate::error::{Error, Result};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Endpoint the demo probes by default.
pub const DEFAULT_URL: &str = "https://m7bhhfooo3.execute-api.us-east-1.amazonaws.com/my-function";

/// Record shape served by the probed endpoint.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Author identifier.
    pub user_id: i64,
    /// Record identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
}

/// Decoded probe body.
///
/// Lists and objects carrying the four post fields decode as posts; any other JSON is
/// kept as is.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProbeBody {
    /// A list of posts.
    Posts(Vec<Post>),
    /// A single post.
    Post(Post),
    /// JSON of any other shape.
    Other(serde_json::Value),
}

impl ProbeBody {
    /// Posts carried by the body, if any.
    pub fn posts(&self) -> &[Post] {
        match self {
            Self::Posts(posts) => posts,
            Self::Post(post) => std::slice::from_ref(post),
            Self::Other(_) => &[],
        }
    }
}

fn ensure_success(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Status {
            url: url.to_string(),
            status,
        })
    }
}

/// Decode a response: the status is checked first and the body is parsed only on success.
pub fn decode(url: &str, status: StatusCode, body: &[u8]) -> Result<ProbeBody> {
    ensure_success(url, status)?;
    Ok(serde_json::from_slice(body)?)
}

/// `GET` `url` and decode its JSON body.
#[tracing::instrument(name = "cloud_crud.get_json", skip(client), err)]
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<ProbeBody> {
    let response = client.get(url).send().await?;
    let status = response.status();
    tracing::info!(%status, "probe answered");
    let body = response.bytes().await?;
    decode(url, status, &body)
}

/// `GET` `url` and return the raw body.
#[tracing::instrument(name = "cloud_crud.fetch", skip(client, url), err)]
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    ensure_success(url, response.status())?;
    Ok(response.bytes().await?.to_vec())
}
