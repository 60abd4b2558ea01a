// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod city;
pub mod comment;
pub mod session;
pub mod trip;
pub mod user;

pub use city::City;
pub use comment::{Comment, CommentId};
pub use session::Session;
pub use trip::{Likes, NewTrip, Photo, Trip};
pub use user::User;
