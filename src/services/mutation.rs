// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Optimistic mutations (likes, comments, follows).
//!
//! Each mutation is a command: apply the local patch, send the request, and
//! on rejection apply the inverse patch, log, and return the error. The
//! inverse only touches what the mutation changed, so other mutations that
//! landed on the same trip in the meantime survive a rollback. Nothing waits
//! for the server before the view updates.

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentId, Session, Trip, User};
use crate::services::api::TravelogClient;
use crate::services::board::TripBoard;
use crate::services::feed::FeedService;
use std::sync::{Arc, RwLock};

/// Applies optimistic patches to trips and rolls them back on failure.
#[derive(Clone)]
pub struct TripMutations {
    client: TravelogClient,
    feed: FeedService,
}

impl TripMutations {
    pub fn new(client: TravelogClient, feed: FeedService) -> Self {
        Self { client, feed }
    }

    /// Patch the trip on the board and in every cached feed.
    fn apply<F: Fn(&mut Trip)>(&self, board: &TripBoard, trip_id: u64, f: F) -> Result<()> {
        if !board.patch(trip_id, &f) {
            return Err(AppError::NotFound(format!("Trip {} is not displayed", trip_id)));
        }
        self.feed.patch_trip(trip_id, &f);
        Ok(())
    }

    /// Undo a rejected patch. The trip may have left the board since, in
    /// which case only the feed copies are touched.
    fn revert<F: Fn(&mut Trip)>(&self, board: &TripBoard, trip_id: u64, undo: F) {
        board.patch(trip_id, &undo);
        self.feed.patch_trip(trip_id, &undo);
        tracing::debug!(trip_id, "Optimistic update rolled back");
    }

    /// Like or unlike `trip_id` as `user_id`. Returns whether the trip is now liked.
    pub async fn toggle_like(&self, board: &TripBoard, trip_id: u64, user_id: u64) -> Result<bool> {
        let liked = !board
            .get(trip_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip {} is not displayed", trip_id)))?
            .is_liked_by(user_id);

        self.apply(board, trip_id, |trip| {
            if trip.is_liked_by(user_id) != liked {
                trip.likes.toggle(user_id);
            }
        })?;

        let result = if liked {
            self.client.like(trip_id, user_id).await
        } else {
            self.client.unlike(trip_id, user_id).await
        };

        match result {
            Ok(()) => {
                tracing::info!(trip_id, user_id, liked, "Like toggled");
                Ok(liked)
            }
            Err(e) => {
                tracing::error!(trip_id, user_id, error = %e, "Like toggle rejected");
                self.revert(board, trip_id, |trip| {
                    if trip.is_liked_by(user_id) == liked {
                        trip.likes.toggle(user_id);
                    }
                });
                Err(e)
            }
        }
    }

    /// Add a comment. A pending placeholder shows immediately and is replaced
    /// by the stored comment once the backend confirms it.
    pub async fn add_comment(
        &self,
        board: &TripBoard,
        trip_id: u64,
        author: &Session,
        content: &str,
    ) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        let pending = Comment::pending(trip_id, author.id, &author.username, content);
        let pending_id = pending.id;
        self.apply(board, trip_id, |trip| trip.comments.push(pending.clone()))?;

        match self.client.add_comment(trip_id, author.id, content).await {
            Ok(mut confirmed) => {
                if confirmed.username.is_empty() {
                    confirmed.username = author.username.clone();
                }
                let replace = |trip: &mut Trip| {
                    if let Some(slot) = trip.comments.iter_mut().find(|c| c.id == pending_id) {
                        *slot = confirmed.clone();
                    }
                };
                board.patch(trip_id, &replace);
                self.feed.patch_trip(trip_id, &replace);
                tracing::info!(trip_id, user_id = author.id, "Comment added");
                Ok(confirmed)
            }
            Err(e) => {
                tracing::error!(trip_id, user_id = author.id, error = %e, "Comment rejected");
                self.revert(board, trip_id, |trip| {
                    trip.comments.retain(|c| c.id != pending_id)
                });
                Err(e)
            }
        }
    }

    /// Delete one of the actor's own comments.
    pub async fn remove_comment(
        &self,
        board: &TripBoard,
        trip_id: u64,
        comment_id: CommentId,
        actor_id: u64,
    ) -> Result<()> {
        let trip = board
            .get(trip_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip {} is not displayed", trip_id)))?;
        let comment = trip
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound(format!("Comment {:?}", comment_id)))?;
        if comment.user_id != actor_id {
            return Err(AppError::Unauthorized);
        }
        // A pending comment has nothing to delete server-side yet.
        let backend_id = comment.id.confirmed().ok_or_else(|| {
            AppError::Validation("Comment is still being posted".to_string())
        })?;
        let removed = comment.clone();
        let index = trip
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .unwrap_or(trip.comments.len());

        self.apply(board, trip_id, |trip| {
            trip.comments.retain(|c| c.id != comment_id)
        })?;

        match self.client.delete_comment(backend_id).await {
            Ok(()) => {
                tracing::info!(trip_id, comment_id = backend_id, "Comment removed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(trip_id, comment_id = backend_id, error = %e, "Comment removal rejected");
                self.revert(board, trip_id, |trip| {
                    if !trip.comments.iter().any(|c| c.id == comment_id) {
                        let at = index.min(trip.comments.len());
                        trip.comments.insert(at, removed.clone());
                    }
                });
                Err(e)
            }
        }
    }

    /// Follow or unfollow the profile shown in `view`.
    ///
    /// On success the actor's cached feed is invalidated, since its
    /// composition just changed.
    pub async fn toggle_follow(&self, view: &FollowView, actor: &Session) -> Result<bool> {
        let target_id = view.target().id;
        if target_id == actor.id {
            return Err(AppError::Validation("You cannot follow yourself".to_string()));
        }

        let follow = !view.snapshot().is_following;
        let set_following = |state: &mut FollowState, following: bool| {
            state.is_following = following;
            state.followers.retain(|u| u.id != actor.id);
            if following {
                state.followers.push(User::from(actor));
            }
        };
        view.update(|state| set_following(state, follow));

        let result = if follow {
            self.client.follow(actor.id, target_id).await
        } else {
            self.client.unfollow(actor.id, target_id).await
        };

        match result {
            Ok(()) => {
                tracing::info!(user_id = actor.id, target_id, follow, "Follow toggled");
                self.feed.invalidate(actor.id);
                Ok(follow)
            }
            Err(e) => {
                tracing::error!(user_id = actor.id, target_id, error = %e, "Follow toggle rejected");
                view.update(|state| set_following(state, !follow));
                Err(e)
            }
        }
    }
}

/// Follow relationship as rendered on a profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowState {
    pub is_following: bool,
    pub followers: Vec<User>,
    pub following: Vec<User>,
}

/// Shared follow state for one profile view.
#[derive(Clone)]
pub struct FollowView {
    target: User,
    state: Arc<RwLock<FollowState>>,
}

impl FollowView {
    pub fn new(target: User, state: FollowState) -> Self {
        Self {
            target,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn target(&self) -> &User {
        &self.target
    }

    pub fn snapshot(&self) -> FollowState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update<F: FnOnce(&mut FollowState)>(&self, f: F) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        f(&mut state);
    }
}
