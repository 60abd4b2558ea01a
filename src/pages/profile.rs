// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Own profile and other users' profiles.

use crate::error::{AppError, Result};
use crate::models::{Session, User};
use crate::services::{FollowState, FollowView, ViewScope};
use crate::AppState;
use serde::Serialize;

/// The session user's profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub user: Session,
    pub avatar_url: String,
}

pub fn load_profile(state: &AppState) -> Result<ProfileView> {
    let user = state.require_session()?;
    let avatar_url = state.client.avatar_url(user.id);
    Ok(ProfileView { user, avatar_url })
}

/// Re-read the session user from the backend and store the fresh copy.
pub async fn refresh_profile(state: &AppState, scope: &ViewScope) -> Result<ProfileView> {
    let current = state.require_session()?;
    let user = scope.run(state.client.get_user(current.id)).await?;
    let avatar_url = avatar_url(state, &user);
    let session = Session::from(user);
    if session != current {
        state.session.set(session.clone())?;
    }
    Ok(ProfileView {
        user: session,
        avatar_url,
    })
}

/// Another user's profile, looked up by username.
pub async fn load_user_profile(
    state: &AppState,
    scope: &ViewScope,
    username: &str,
) -> Result<FollowView> {
    let viewer = state.require_session()?;

    let users = scope.run(state.client.list_users()).await?;
    let target = users
        .into_iter()
        .find(|u| u.username == username)
        .ok_or_else(|| AppError::NotFound(format!("User {}", username)))?;

    let (followers, following) = scope
        .run(async {
            tokio::try_join!(
                state.client.followers(target.id),
                state.client.following(target.id)
            )
        })
        .await?;

    let is_following = followers.iter().any(|u| u.id == viewer.id);
    tracing::debug!(
        target_id = target.id,
        followers = followers.len(),
        following = following.len(),
        is_following,
        "Profile loaded"
    );

    Ok(FollowView::new(
        target,
        FollowState {
            is_following,
            followers,
            following,
        },
    ))
}

/// Follow or unfollow the user shown in `view`.
pub async fn toggle_follow(state: &AppState, view: &FollowView) -> Result<bool> {
    let viewer = state.require_session()?;
    state.mutations.toggle_follow(view, &viewer).await
}

/// Avatar URL for any user.
pub fn avatar_url(state: &AppState, user: &User) -> String {
    user.avatar_url(state.client.base_url())
}
