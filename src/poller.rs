//! Periodic refresh of the channel collections.
//!
//! ```text
//! Idle → Fetching(initial) → Idle(polling) → Fetching(refresh) → Idle(polling) → …
//! ```
//!
//! The initial round raises the `loading` flag for its duration; refresh
//! rounds leave it alone. Each round is compared per category against the
//! held state with a deliberately cheap check: item count, leading item id
//! and leading item `updated_at`. Edits deeper in a list are not detected.
//! A round with no changed category leaves the state untouched and wakes no
//! subscriber.
//!
//! The background task is owned by a [`PollerHandle`]. Dropping the handle
//! aborts the task, so the timer never outlives its owner whichever way the
//! owner exits.

use crate::config::ChannelsConfig;
use crate::source::{ChannelSource, fetch_round};
use crate::types::{Category, CollectionState, ContentItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// What subscribers observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub collections: CollectionState,
    /// True only while the initial round is in flight.
    pub loading: bool,
}

/// Cheap change check between a held list and a freshly fetched one.
pub fn has_changed(old: &[ContentItem], new: &[ContentItem]) -> bool {
    if old.len() != new.len() {
        return true;
    }
    match (old.first(), new.first()) {
        (Some(a), Some(b)) => a.id != b.id || a.updated_at != b.updated_at,
        _ => false,
    }
}

impl CollectionState {
    /// Replace every category whose fetched list differs per [`has_changed`].
    ///
    /// Returns the replaced categories; empty means nothing was touched.
    pub fn apply_round(&mut self, mut fetched: CollectionState) -> Vec<Category> {
        let mut changed = Vec::new();
        for category in Category::ALL {
            if has_changed(self.get(category), fetched.get(category)) {
                *self.get_mut(category) = std::mem::take(fetched.get_mut(category));
                changed.push(category);
            }
        }
        changed
    }
}

pub struct Poller<S: ?Sized> {
    source: Arc<S>,
    channels: ChannelsConfig,
    interval: Duration,
    state: watch::Sender<FeedState>,
}

impl<S> Poller<S>
where
    S: ChannelSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, channels: ChannelsConfig, interval: Duration) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        Self {
            source,
            channels,
            interval,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// First round: `loading` is true while fetching, false afterwards even
    /// when every channel failed.
    pub async fn initial(&self) {
        self.state.send_modify(|s| s.loading = true);
        let fetched = fetch_round(self.source.as_ref(), &self.channels).await;
        self.state.send_modify(|s| {
            let changed = s.collections.apply_round(fetched);
            info!(?changed, total = s.collections.total(), "initial round complete");
            s.loading = false;
        });
    }

    /// Later rounds. Returns whether any category was replaced.
    pub async fn refresh(&self) -> bool {
        let fetched = fetch_round(self.source.as_ref(), &self.channels).await;
        self.state.send_if_modified(|s| {
            let changed = s.collections.apply_round(fetched);
            if changed.is_empty() {
                debug!("refresh round: no changes");
                false
            } else {
                info!(?changed, "refresh round replaced categories");
                true
            }
        })
    }

    /// Run the initial round, then refresh every interval until the handle goes away.
    pub fn spawn(self) -> PollerHandle {
        let state = self.subscribe();
        let task = tokio::spawn(async move {
            self.initial().await;
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial round covered it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        });
        PollerHandle { task, state }
    }
}

/// Owner of the polling task. Dropping it cancels the pending timer.
pub struct PollerHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<FeedState>,
}

impl PollerHandle {
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
