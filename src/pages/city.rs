// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! City detail page.

use crate::error::Result;
use crate::models::{City, User};
use crate::services::{TripBoard, ViewScope};
use crate::AppState;

pub struct CityView {
    pub city: City,
    pub trips: TripBoard,
    pub visitors: Vec<User>,
}

/// Fetch the city, its trips and its visitors concurrently.
pub async fn load_city(state: &AppState, scope: &ViewScope, city_id: u64) -> Result<CityView> {
    state.require_session()?;
    let (city, trips, visitors) = scope
        .run(async {
            tokio::try_join!(
                state.client.city(city_id),
                state.client.city_trips(city_id),
                state.client.city_users(city_id)
            )
        })
        .await
        .inspect_err(|e| tracing::warn!(city_id, error = %e, "City load failed"))?;

    Ok(CityView {
        city,
        trips: TripBoard::new(trips),
        visitors,
    })
}
