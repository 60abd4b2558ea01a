// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Landing page and home feed.

use crate::error::Result;
use crate::models::User;
use crate::services::{TripBoard, ViewScope};
use crate::AppState;

/// Everyone registered, for the landing page.
pub async fn load_landing(state: &AppState, scope: &ViewScope) -> Result<Vec<User>> {
    scope.run(state.client.list_users()).await
}

/// Trips of the users the session user follows, served through the feed cache.
pub async fn load_home(state: &AppState, scope: &ViewScope) -> Result<TripBoard> {
    let session = state.require_session()?;
    let trips = scope.run(state.feed.load_feed(session.id)).await?;
    Ok(TripBoard::new(trips))
}
