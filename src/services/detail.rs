// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip detail overlay.
//!
//! States: `Closed → Viewing → ConfirmingDelete → Closed`. Deleting takes two
//! steps; cancelling the confirmation returns to `Viewing` untouched.

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentId, Session, Trip};
use crate::services::api::TravelogClient;
use crate::services::board::TripBoard;
use crate::services::feed::FeedService;
use crate::services::mutation::TripMutations;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Closed,
    Viewing(Trip),
    ConfirmingDelete(Trip),
}

/// Detail overlay bound to the board of the view that opened it.
pub struct TripDetail {
    viewer: Session,
    board: TripBoard,
    client: TravelogClient,
    feed: FeedService,
    mutations: TripMutations,
    state: DetailState,
}

impl TripDetail {
    pub fn new(
        viewer: Session,
        board: TripBoard,
        client: TravelogClient,
        feed: FeedService,
        mutations: TripMutations,
    ) -> Self {
        Self {
            viewer,
            board,
            client,
            feed,
            mutations,
            state: DetailState::Closed,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Trip being shown, if open.
    pub fn trip(&self) -> Option<&Trip> {
        match &self.state {
            DetailState::Closed => None,
            DetailState::Viewing(trip) | DetailState::ConfirmingDelete(trip) => Some(trip),
        }
    }

    /// Whether the viewer may delete the open trip.
    pub fn can_delete(&self) -> bool {
        self.trip()
            .map(|t| t.is_owned_by(self.viewer.id))
            .unwrap_or(false)
    }

    /// Open the overlay on a trip from the board.
    pub fn open(&mut self, trip_id: u64) -> Result<()> {
        let trip = self
            .board
            .get(trip_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip {}", trip_id)))?;
        self.state = DetailState::Viewing(trip);
        Ok(())
    }

    /// Fetch the open trip's comments and show them.
    pub async fn load_comments(&mut self) -> Result<()> {
        let trip_id = self.open_trip_id()?;
        let comments = self.client.comments(trip_id).await?;
        self.board.patch(trip_id, |t| t.comments = comments.clone());
        self.sync();
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = DetailState::Closed;
    }

    /// First step of deletion: ask for confirmation. Owner only.
    pub fn request_delete(&mut self) -> Result<()> {
        match &self.state {
            DetailState::Viewing(trip) => {
                if !trip.is_owned_by(self.viewer.id) {
                    return Err(AppError::Unauthorized);
                }
                self.state = DetailState::ConfirmingDelete(trip.clone());
                Ok(())
            }
            DetailState::ConfirmingDelete(_) => Ok(()),
            DetailState::Closed => Err(AppError::Validation("No trip is open".to_string())),
        }
    }

    /// Back out of the confirmation step without side effects.
    pub fn cancel_delete(&mut self) {
        if let DetailState::ConfirmingDelete(trip) = &self.state {
            self.state = DetailState::Viewing(trip.clone());
        }
    }

    /// Second step of deletion: issue the delete and drop the trip from every list.
    ///
    /// On failure the overlay returns to `Viewing` and nothing is removed.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let DetailState::ConfirmingDelete(trip) = &self.state else {
            return Err(AppError::Validation(
                "Deletion has not been requested".to_string(),
            ));
        };
        let trip = trip.clone();

        if let Err(e) = self.client.delete_trip(trip.id).await {
            tracing::error!(trip_id = trip.id, error = %e, "Trip deletion failed");
            self.state = DetailState::Viewing(trip);
            return Err(e);
        }

        self.board.remove(trip.id);
        self.feed.remove_trip(trip.id);
        tracing::info!(trip_id = trip.id, user_id = self.viewer.id, "Trip deleted");
        self.state = DetailState::Closed;
        Ok(())
    }

    pub async fn toggle_like(&mut self) -> Result<bool> {
        let trip_id = self.viewing_trip_id()?;
        let result = self
            .mutations
            .toggle_like(&self.board, trip_id, self.viewer.id)
            .await;
        self.sync();
        result
    }

    pub async fn add_comment(&mut self, content: &str) -> Result<Comment> {
        let trip_id = self.viewing_trip_id()?;
        let result = self
            .mutations
            .add_comment(&self.board, trip_id, &self.viewer, content)
            .await;
        self.sync();
        result
    }

    pub async fn remove_comment(&mut self, comment_id: CommentId) -> Result<()> {
        let trip_id = self.viewing_trip_id()?;
        let result = self
            .mutations
            .remove_comment(&self.board, trip_id, comment_id, self.viewer.id)
            .await;
        self.sync();
        result
    }

    fn open_trip_id(&self) -> Result<u64> {
        self.trip()
            .map(|t| t.id)
            .ok_or_else(|| AppError::Validation("No trip is open".to_string()))
    }

    fn viewing_trip_id(&self) -> Result<u64> {
        match &self.state {
            DetailState::Viewing(trip) => Ok(trip.id),
            _ => Err(AppError::Validation("No trip is being viewed".to_string())),
        }
    }

    /// Refresh the overlay's copy from the board.
    fn sync(&mut self) {
        let Some(trip_id) = self.trip().map(|t| t.id) else {
            return;
        };
        let Some(latest) = self.board.get(trip_id) else {
            self.state = DetailState::Closed;
            return;
        };
        if let DetailState::Viewing(trip) | DetailState::ConfirmingDelete(trip) = &mut self.state {
            *trip = latest;
        }
    }
}
