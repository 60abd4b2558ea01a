// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View lifetimes and request cancellation.

use crate::error::{AppError, Result};
use std::future::Future;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Lifetime of a mounted view.
///
/// Requests started through [`ViewScope::run`] are abandoned when the scope
/// is cancelled or dropped, and a response that arrives after that point is
/// discarded rather than applied to the dead view.
pub struct ViewScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl ViewScope {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// Scope for a nested view (e.g. a modal) that also ends with its parent.
    pub fn child(&self) -> Self {
        let token = self.token.child_token();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Token for work spawned on behalf of this view.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Run `request` unless the view goes away first.
    pub async fn run<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        run_until_cancelled(&self.token, request).await
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Await `request`, returning `AppError::Cancelled` if `token` fires first or
/// fired while the request was completing.
pub async fn run_until_cancelled<T, F>(token: &CancellationToken, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        result = request => {
            if token.is_cancelled() {
                tracing::debug!("Discarding response for cancelled view");
                return Err(AppError::Cancelled);
            }
            result
        }
    }
}
