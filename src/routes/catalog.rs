// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public restaurant and event catalog.

use crate::error::{AppError, Result};
use crate::models::{City, Coordinates, Event, Restaurant};
use crate::services::catalog::{self, RestaurantFilter, TableLayout, TimeSlots};
use crate::AppState;
use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/restaurants", get(list_restaurants))
        .route("/api/restaurants/{id}", get(get_restaurant))
        .route("/api/restaurants/{id}/time-slots", get(get_time_slots))
        .route("/api/restaurants/{id}/tables", get(get_tables))
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event))
        .route("/api/cities", get(search_cities))
        .route("/api/cities/nearest", get(get_nearest_city))
}

fn find_restaurant(id: &str) -> Result<&'static Restaurant> {
    catalog::restaurant(id).ok_or_else(|| AppError::NotFound(format!("Restaurant {} not found", id)))
}

async fn list_restaurants(Query(filter): Query<RestaurantFilter>) -> Json<Vec<&'static Restaurant>> {
    Json(catalog::restaurants(&filter))
}

async fn get_restaurant(Path(id): Path<String>) -> Result<Json<&'static Restaurant>> {
    Ok(Json(find_restaurant(&id)?))
}

/// All restaurants share one slot schedule.
async fn get_time_slots(Path(id): Path<String>) -> Result<Json<&'static TimeSlots>> {
    find_restaurant(&id)?;
    Ok(Json(catalog::time_slots()))
}

async fn get_tables(Path(id): Path<String>) -> Result<Json<&'static TableLayout>> {
    find_restaurant(&id)?;
    Ok(Json(catalog::table_layout()))
}

async fn list_events() -> Json<&'static [Event]> {
    Json(catalog::events())
}

async fn get_event(Path(id): Path<String>) -> Result<Json<&'static Event>> {
    catalog::event(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    q: Option<String>,
}

async fn search_cities(Query(query): Query<CityQuery>) -> Json<Vec<&'static City>> {
    Json(catalog::cities(query.q.as_deref()))
}

async fn get_nearest_city(Query(at): Query<Coordinates>) -> Result<Json<&'static City>> {
    if !(-90.0..=90.0).contains(&at.lat) || !(-180.0..=180.0).contains(&at.lng) {
        return Err(AppError::InvalidArgument(
            "lat must be in [-90, 90] and lng in [-180, 180]".to_string(),
        ));
    }
    catalog::nearest_city(at)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No cities available".to_string()))
}
