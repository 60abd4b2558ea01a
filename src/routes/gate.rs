// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route gate that follows session changes.

use super::{resolve, Page, Resolution};
use crate::services::session::{SessionStore, SessionSubscription};

/// Redirect chains are at most two hops (e.g. `/login` → `/home`).
const MAX_REDIRECTS: usize = 4;

/// Tracks the current location and re-evaluates it whenever the session changes.
pub struct RouteGate {
    session: SessionStore,
    subscription: SessionSubscription,
    location: String,
}

impl RouteGate {
    pub fn new(session: SessionStore, initial_path: &str) -> Self {
        let subscription = session.subscribe();
        let mut gate = Self {
            session,
            subscription,
            location: initial_path.to_string(),
        };
        gate.settle();
        gate
    }

    /// Current location after following redirects.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Page rendered at the current location.
    pub fn page(&self) -> Page {
        match resolve(&self.location, self.session.is_present()) {
            Resolution::Render(page) => page,
            // settle() always leaves us on a renderable path
            Resolution::Redirect { .. } => Page::Landing,
        }
    }

    /// Navigate to `path`, following any redirects. Returns the rendered page.
    pub fn navigate(&mut self, path: &str) -> Page {
        self.location = path.to_string();
        self.settle();
        self.page()
    }

    /// Wait for the next session change and re-evaluate the current location.
    ///
    /// Returns `None` once the session store is gone.
    pub async fn next_change(&mut self) -> Option<Page> {
        self.subscription.changed().await?;
        self.settle();
        Some(self.page())
    }

    fn settle(&mut self) {
        let present = self.session.is_present();
        for _ in 0..MAX_REDIRECTS {
            match resolve(&self.location, present) {
                Resolution::Render(_) => return,
                Resolution::Redirect { to } => {
                    tracing::debug!(from = %self.location, to, "Route redirect");
                    self.location = to.to_string();
                }
            }
        }
    }
}
