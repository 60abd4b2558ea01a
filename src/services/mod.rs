// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client-side business logic.

pub mod api;
pub mod board;
pub mod debounce;
pub mod detail;
pub mod feed;
pub mod mutation;
pub mod scope;
pub mod searches;
pub mod session;

pub use api::{LoginRequest, SignupRequest, TravelogClient};
pub use board::TripBoard;
pub use detail::{DetailState, TripDetail};
pub use feed::{FeedService, FeedStatus};
pub use mutation::{FollowState, FollowView, TripMutations};
pub use scope::ViewScope;
pub use searches::RecentSearches;
pub use session::{SessionStore, SessionSubscription};
