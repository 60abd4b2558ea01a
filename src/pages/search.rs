// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! City search.

use crate::error::Result;
use crate::models::City;
use crate::services::ViewScope;
use crate::AppState;

/// Search cities by name. Non-blank queries are remembered.
pub async fn search(state: &AppState, scope: &ViewScope, query: &str) -> Result<Vec<City>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let cities = scope.run(state.client.search_cities(query)).await?;
    if let Err(e) = state.searches.record(query) {
        tracing::warn!(error = %e, "Could not save recent search");
    }
    tracing::debug!(query, results = cities.len(), "City search");
    Ok(cities)
}
