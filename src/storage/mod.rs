// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted client-side key-value storage.

pub mod local;

pub use local::{LocalStorage, StorageError};

/// Storage keys as constants.
pub mod keys {
    /// Serialized session user
    pub const SESSION: &str = "user";
    /// Recent city searches, most recent first
    pub const RECENT_SEARCHES: &str = "recent_searches";
}
