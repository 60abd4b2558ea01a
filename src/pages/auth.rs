// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, signup and sign-out.

use crate::error::Result;
use crate::models::Session;
use crate::services::{LoginRequest, SignupRequest};
use crate::AppState;

/// Log in and store the session.
pub async fn login(state: &AppState, request: &LoginRequest) -> Result<Session> {
    let user = state.client.login(request).await.inspect_err(|e| {
        tracing::warn!(username = %request.username, error = %e, "Login failed");
    })?;
    let session = Session::from(user);
    state.session.set(session.clone())?;
    Ok(session)
}

/// Create an account and start a session for it.
///
/// When the backend does not echo the new user, a follow-up login with the
/// same credentials obtains it.
pub async fn signup(state: &AppState, request: &SignupRequest) -> Result<Session> {
    let created = state.client.signup(request).await.inspect_err(|e| {
        tracing::warn!(username = %request.username, error = %e, "Signup failed");
    })?;

    let session = match created {
        Some(user) => Session::from(user),
        None => {
            tracing::debug!(username = %request.username, "Signup returned no user, logging in");
            let login = LoginRequest {
                username: request.username.clone(),
                password: request.password.clone(),
            };
            Session::from(state.client.login(&login).await?)
        }
    };

    tracing::info!(user_id = session.id, "Account created");
    state.session.set(session.clone())?;
    Ok(session)
}

/// End the session and forget every cached feed.
pub fn sign_out(state: &AppState) -> Result<()> {
    state.session.clear()?;
    state.feed.invalidate_all();
    Ok(())
}
