//! Trip comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

static NEXT_PENDING_ID: AtomicU64 = AtomicU64::new(1);

/// Comment identifier.
///
/// Comments added locally carry a `Pending` id until the backend confirms
/// them and assigns the real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentId {
    Confirmed(u64),
    Pending { pending: u64 },
}

impl CommentId {
    /// Allocate a fresh temporary id, unique within this process.
    pub fn next_pending() -> Self {
        CommentId::Pending {
            pending: NEXT_PENDING_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CommentId::Pending { .. })
    }

    /// Backend id, if confirmed.
    pub fn confirmed(&self) -> Option<u64> {
        match self {
            CommentId::Confirmed(id) => Some(*id),
            CommentId::Pending { .. } => None,
        }
    }
}

/// A comment on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comment {
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "number | { pending: number }")
    )]
    pub id: CommentId,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub trip_id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    pub content: String,
    #[serde(with = "crate::time_utils::flexible_timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build the local placeholder shown while the backend call is in flight.
    pub fn pending(trip_id: u64, user_id: u64, username: &str, content: &str) -> Self {
        Self {
            id: CommentId::next_pending(),
            trip_id,
            user_id,
            username: username.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}
