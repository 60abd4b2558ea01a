// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Keyed trailing-edge debouncer.
//!
//! Each trigger bumps a per-key generation and arms a timer. When a timer
//! fires it only runs its action if no newer trigger arrived meanwhile, so a
//! burst of triggers yields exactly one action after the quiet period.
//! Superseded timers exit without touching anything already in flight.

use dashmap::DashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct Debouncer<K> {
    delay: Duration,
    generations: Arc<DashMap<K, u64>>,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generations: Arc::new(DashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer for `key`.
    ///
    /// The returned handle resolves to `true` if this trigger's action ran,
    /// `false` if a later trigger superseded it.
    pub fn trigger<F, Fut>(&self, key: K, action: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = {
            let mut entry = self.generations.entry(key.clone()).or_insert(0);
            *entry += 1;
            *entry
        };

        let generations = self.generations.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let latest = generations.get(&key).map(|g| *g);
            if latest != Some(generation) {
                return false;
            }

            action().await;
            true
        })
    }
}
