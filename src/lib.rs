// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Travelog: client data layer for a social travel journal
//!
//! This crate talks to the Travelog REST backend and keeps the client-side
//! state (session, feed cache, optimistic trip updates, recent searches)
//! that the pages of the app are built on.

pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::{AppError, Result};
use models::Session;
use services::{
    FeedService, RecentSearches, SessionStore, TravelogClient, TripBoard, TripDetail,
    TripMutations,
};
use storage::LocalStorage;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub client: TravelogClient,
    pub session: SessionStore,
    pub feed: FeedService,
    pub mutations: TripMutations,
    pub searches: RecentSearches,
}

impl AppState {
    /// Build state from `config`, opening persisted storage in its state directory.
    pub fn new(config: Config) -> Result<Self> {
        let storage = LocalStorage::open(config.storage_path())?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: LocalStorage) -> Result<Self> {
        let client = TravelogClient::new(&config)?;
        let feed = FeedService::new(client.clone(), config.feed_debounce, config.feed_cache_ttl);
        let mutations = TripMutations::new(client.clone(), feed.clone());

        Ok(Self {
            session: SessionStore::new(storage.clone()),
            searches: RecentSearches::new(storage),
            client,
            feed,
            mutations,
            config,
        })
    }

    /// The logged-in user, or `Unauthorized` when there is none.
    pub fn require_session(&self) -> Result<Session> {
        self.session.get().ok_or(AppError::Unauthorized)
    }

    /// Open a detail overlay over `board` for the current session user.
    pub fn trip_detail(&self, board: TripBoard) -> Result<TripDetail> {
        Ok(TripDetail::new(
            self.require_session()?,
            board,
            self.client.clone(),
            self.feed.clone(),
            self.mutations.clone(),
        ))
    }
}
