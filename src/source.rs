//! Content source adapter for Are.na channels.
//!
//! Each category maps to one channel slug. A fetch requests a single page of
//! up to `per_page` blocks; the channel endpoint embeds them as `contents`.
//!
//! ## Failure isolation
//!
//! [`fetch`] never fails. Transport errors, non-success statuses and
//! malformed JSON are logged with `tracing::warn!` and degrade to an empty
//! list for that category only. [`fetch_round`] issues the three fetches
//! concurrently and returns once all of them have settled, so a slow or
//! broken channel cannot hide the others' results and no partial round is
//! ever visible.

use crate::config::{ApiConfig, ChannelsConfig};
use crate::types::{CategorizedItem, Category, CollectionState, ContentItem};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Channel '{slug}' returned status {status}")]
    Status { slug: String, status: u16 },
    #[error("Malformed channel JSON for '{slug}': {source}")]
    Json {
        slug: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can list a channel's items.
///
/// The Are.na client is the production implementation; tests script their
/// own to drive the poller.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn channel_contents(&self, slug: &str) -> Result<Vec<ContentItem>, SourceError>;
}

/// Channel payload. Only `contents` is read; everything else is ignored.
#[derive(Debug, Deserialize)]
struct ChannelPage {
    #[serde(default)]
    contents: Vec<ContentItem>,
}

/// Are.na v2 REST client.
pub struct ArenaClient {
    http: reqwest::Client,
    base_url: String,
    per_page: u32,
}

impl ArenaClient {
    pub fn new(api: &ApiConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(api.user_agent.clone())
            .timeout(api.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            per_page: api.per_page,
        })
    }

    fn channel_url(&self, slug: &str) -> String {
        format!("{}/channels/{}", self.base_url, slug)
    }
}

#[async_trait]
impl ChannelSource for ArenaClient {
    async fn channel_contents(&self, slug: &str) -> Result<Vec<ContentItem>, SourceError> {
        let response = self
            .http
            .get(self.channel_url(slug))
            .query(&[("page", 1), ("per", self.per_page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                slug: slug.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let page: ChannelPage =
            serde_json::from_slice(&body).map_err(|source| SourceError::Json {
                slug: slug.to_string(),
                source,
            })?;
        Ok(page.contents)
    }
}

/// Fetch one category's channel, degrading to an empty list on any failure.
pub async fn fetch<S>(source: &S, category: Category, slug: &str) -> Vec<CategorizedItem>
where
    S: ChannelSource + ?Sized,
{
    match source.channel_contents(slug).await {
        Ok(items) => {
            debug!(%category, slug, count = items.len(), "fetched channel");
            items
                .into_iter()
                .map(|item| CategorizedItem::new(category, item))
                .collect()
        }
        Err(err) => {
            warn!(%category, slug, error = %err, "channel fetch failed, using empty list");
            Vec::new()
        }
    }
}

/// Fetch all three categories concurrently; completes when every fetch settles.
pub async fn fetch_round<S>(source: &S, channels: &ChannelsConfig) -> CollectionState
where
    S: ChannelSource + ?Sized,
{
    let fetches = Category::ALL.map(|category| async move {
        (category, fetch(source, category, channels.slug(category)).await)
    });

    let mut state = CollectionState::default();
    for (category, items) in join_all(fetches).await {
        *state.get_mut(category) = items.into_iter().map(|c| c.item).collect();
    }
    state
}
