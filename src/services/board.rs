// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The list of trips a view is currently showing.
//!
//! Views replace the whole list on refetch; optimistic mutations patch single
//! trips in place and undo their own change on failure.

use crate::models::Trip;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, ordered collection of rendered trips.
#[derive(Clone, Debug, Default)]
pub struct TripBoard {
    trips: Arc<RwLock<Vec<Trip>>>,
}

impl TripBoard {
    pub fn new(trips: Vec<Trip>) -> Self {
        Self {
            trips: Arc::new(RwLock::new(trips)),
        }
    }

    // The lock is never held across an await, so a poisoned lock only means a
    // panic elsewhere; the data is still a consistent Vec.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Trip>> {
        self.trips.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Trip>> {
        self.trips.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the contents after a full refetch.
    pub fn replace(&self, trips: Vec<Trip>) {
        *self.write() = trips;
    }

    pub fn snapshot(&self) -> Vec<Trip> {
        self.read().clone()
    }

    pub fn get(&self, trip_id: u64) -> Option<Trip> {
        self.read().iter().find(|t| t.id == trip_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Apply `f` to the trip with `trip_id`. Returns false if it is not shown.
    pub fn patch<F: FnOnce(&mut Trip)>(&self, trip_id: u64, f: F) -> bool {
        let mut trips = self.write();
        match trips.iter_mut().find(|t| t.id == trip_id) {
            Some(trip) => {
                f(trip);
                true
            }
            None => false,
        }
    }

    /// Remove a trip. Returns it with its former position.
    pub fn remove(&self, trip_id: u64) -> Option<(usize, Trip)> {
        let mut trips = self.write();
        let index = trips.iter().position(|t| t.id == trip_id)?;
        Some((index, trips.remove(index)))
    }
}
