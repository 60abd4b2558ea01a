// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feed fetching with a per-user cache and debounced refetch.

use crate::error::{Presentation, Result};
use crate::models::Trip;
use crate::services::api::TravelogClient;
use crate::services::debounce::Debouncer;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Cached feed with the time it was fetched.
#[derive(Clone)]
pub struct CachedFeed {
    trips: Vec<Trip>,
    fetched_at: Instant,
}

/// Shared feed cache type.
pub type FeedCache = Arc<DashMap<u64, CachedFeed>>;

/// Shared per-user fetch locks.
pub type FetchLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// What a feed view should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing fetched yet, or a fetch is in flight.
    Loading,
    Ready,
    /// Last fetch failed; the message is shown inline.
    Failed(String),
}

/// Feed service: serves feeds from cache and coalesces fetches.
///
/// - A cached feed is returned without any network call while it is fresh
///   (always, when no TTL is configured).
/// - Concurrent loads for the same user share one request through a
///   per-user lock with a re-check after acquiring it.
/// - `trigger` debounces refetch events (mount, visibility change).
/// - A failed fetch leaves the cache untouched and is not retried.
#[derive(Clone)]
pub struct FeedService {
    client: TravelogClient,
    cache: FeedCache,
    fetch_locks: FetchLocks,
    status: Arc<DashMap<u64, FeedStatus>>,
    debouncer: Debouncer<u64>,
    ttl: Option<Duration>,
}

impl FeedService {
    pub fn new(client: TravelogClient, debounce: Duration, ttl: Option<Duration>) -> Self {
        Self {
            client,
            cache: Arc::new(DashMap::new()),
            fetch_locks: Arc::new(DashMap::new()),
            status: Arc::new(DashMap::new()),
            debouncer: Debouncer::new(debounce),
            ttl,
        }
    }

    fn fresh(&self, entry: &CachedFeed) -> bool {
        match self.ttl {
            Some(ttl) => entry.fetched_at.elapsed() < ttl,
            None => true,
        }
    }

    /// Cached feed for `user_id`, if present and fresh.
    pub fn cached(&self, user_id: u64) -> Option<Vec<Trip>> {
        self.cache
            .get(&user_id)
            .filter(|entry| self.fresh(entry))
            .map(|entry| entry.trips.clone())
    }

    pub fn status(&self, user_id: u64) -> FeedStatus {
        self.status
            .get(&user_id)
            .map(|s| s.clone())
            .unwrap_or(FeedStatus::Loading)
    }

    /// Load the feed of trips by users `user_id` follows.
    pub async fn load_feed(&self, user_id: u64) -> Result<Vec<Trip>> {
        if let Some(trips) = self.cached(user_id) {
            return Ok(trips);
        }

        let lock = self
            .fetch_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another task may have fetched while we waited.
        if let Some(trips) = self.cached(user_id) {
            return Ok(trips);
        }

        self.status.insert(user_id, FeedStatus::Loading);

        match self.client.feed(user_id).await {
            Ok(trips) => {
                tracing::debug!(user_id, count = trips.len(), "Feed fetched");
                self.cache.insert(
                    user_id,
                    CachedFeed {
                        trips: trips.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                self.status.insert(user_id, FeedStatus::Ready);
                Ok(trips)
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Feed fetch failed");
                let message = match e.presentation("feed") {
                    Presentation::Inline(msg) | Presentation::Blocking(msg) => msg,
                    Presentation::Silent => String::new(),
                };
                self.status.insert(user_id, FeedStatus::Failed(message));
                Err(e)
            }
        }
    }

    /// Debounced load: rapid triggers within the quiet period collapse into
    /// one `load_feed` call. The handle resolves to `true` if this trigger
    /// performed the load.
    pub fn trigger(&self, user_id: u64) -> JoinHandle<bool> {
        let service = self.clone();
        self.debouncer.trigger(user_id, move || async move {
            // Failure is already recorded in the feed status.
            let _ = service.load_feed(user_id).await;
        })
    }

    /// Drop the cached feed and fetch again.
    pub async fn refresh(&self, user_id: u64) -> Result<Vec<Trip>> {
        self.invalidate(user_id);
        self.load_feed(user_id).await
    }

    /// Drop `user_id`'s cached feed. Its status returns to `Loading` until
    /// the next fetch settles.
    pub fn invalidate(&self, user_id: u64) {
        self.status.remove(&user_id);
        if self.cache.remove(&user_id).is_some() {
            tracing::debug!(user_id, "Feed cache invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        self.cache.clear();
        self.status.clear();
    }

    /// Invalidate the feeds of everyone who follows the author of a new trip.
    pub fn invalidate_followers<I: IntoIterator<Item = u64>>(&self, follower_ids: I) {
        for follower_id in follower_ids {
            self.invalidate(follower_id);
        }
    }

    /// Apply `f` to every cached copy of `trip_id`.
    pub fn patch_trip<F: Fn(&mut Trip)>(&self, trip_id: u64, f: F) {
        for mut entry in self.cache.iter_mut() {
            if let Some(trip) = entry.trips.iter_mut().find(|t| t.id == trip_id) {
                f(trip);
            }
        }
    }

    /// Remove a deleted trip from every cached feed.
    pub fn remove_trip(&self, trip_id: u64) {
        for mut entry in self.cache.iter_mut() {
            entry.trips.retain(|t| t.id != trip_id);
        }
    }
}
