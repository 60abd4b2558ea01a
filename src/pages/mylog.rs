// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The session user's own trip log.

use crate::error::Result;
use crate::models::NewTrip;
use crate::services::{TripBoard, ViewScope};
use crate::AppState;
use validator::Validate;

pub async fn load_mylog(state: &AppState, scope: &ViewScope) -> Result<TripBoard> {
    let session = state.require_session()?;
    let trips = scope.run(state.client.user_trips(session.id)).await?;
    Ok(TripBoard::new(trips))
}

/// Submit a new trip, then refresh `board` from the backend.
///
/// Followers' cached feeds are invalidated so they pick the trip up on
/// their next load.
pub async fn add_trip(state: &AppState, board: &TripBoard, trip: &NewTrip) -> Result<()> {
    let session = state.require_session()?;
    trip.validate()?;

    state.client.create_trip(session.id, trip).await.inspect_err(|e| {
        tracing::error!(user_id = session.id, error = %e, "Trip creation failed");
    })?;
    tracing::info!(user_id = session.id, city = %trip.city, "Trip created");

    match state.client.followers(session.id).await {
        Ok(followers) => state
            .feed
            .invalidate_followers(followers.into_iter().map(|u| u.id)),
        Err(e) => {
            // Cached feeds may show a stale list until they expire.
            tracing::warn!(user_id = session.id, error = %e, "Could not fetch followers");
        }
    }

    board.replace(state.client.user_trips(session.id).await?);
    Ok(())
}
