// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog endpoint tests.

use axum::http::StatusCode;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, get_request};

#[tokio::test]
async fn test_list_and_filter_restaurants() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/restaurants", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
    assert_eq!(body[0]["name"], "Spice Garden");
    assert_eq!(body[0]["location"]["city"], "Bangalore");

    let response = app
        .router
        .oneshot(get_request("/api/restaurants?cuisine=seafood", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "The Coastal Kitchen");
}

#[tokio::test]
async fn test_restaurant_detail_slots_and_tables() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/restaurants/4", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["name"], "Pizza Paradise");

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/restaurants/4/time-slots", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["lunch"][0], "11:30 AM");
    assert_eq!(body["dinner"].as_array().unwrap().len(), 8);

    let response = app
        .router
        .oneshot(get_request("/api/restaurants/4/tables", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["floors"][3]["name"], "third");
    assert_eq!(body["floors"][3]["tables"][7], "T8");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = create_test_app();

    for uri in [
        "/api/restaurants/99",
        "/api/restaurants/99/time-slots",
        "/api/restaurants/99/tables",
        "/api/events/99",
    ] {
        let response = app
            .router
            .clone()
            .oneshot(get_request(uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body_json(response).await["error"], "not-found");
    }
}

#[tokio::test]
async fn test_events() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/events", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .router
        .oneshot(get_request("/api/events/1", None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["name"], "Wine Tasting Evening");
    assert_eq!(body["registeredCount"], 15);
}

#[tokio::test]
async fn test_city_search() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/cities?q=tamil", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["city"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chennai", "Coimbatore"]);
    assert_eq!(body[0]["state"], "Tamil Nadu");
    assert_eq!(body[0]["country"], "India");

    let response = app
        .router
        .oneshot(get_request("/api/cities", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_nearest_city() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/cities/nearest?lat=19.1&lng=72.9", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["city"], "Mumbai");

    let response = app
        .router
        .oneshot(get_request("/api/cities/nearest?lat=95&lng=72.9", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
