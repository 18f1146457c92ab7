mod support;

use std::sync::Arc;

use axum::body::to_bytes;
use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use support::{MemoryStore, RecordingIdentity, TestApp, cache_header, json_body};

fn app_with_restaurant() -> TestApp {
    let store = MemoryStore::new();
    store.add_restaurant(1, "Taco Stand");
    store.add_food(10, 1, "Carnitas", Some(8.5));
    TestApp::new(store)
}

#[tokio::test]
async fn root_and_health() {
    let app = app_with_restaurant();

    let root = app.get("/").await;
    assert_eq!(root.status(), StatusCode::OK);
    let text = to_bytes(root.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&text[..], b"PolyBites Backend is running!");

    assert_eq!(app.get("/health").await.status(), StatusCode::NO_CONTENT);

    app.store.set_down(true);
    assert_eq!(
        app.get("/health").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app_with_restaurant();
    let response = app.get("/api/restaurants").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn missing_entities_are_404_with_error_body() {
    let app = app_with_restaurant();

    let cases = [
        ("/api/restaurants/999", "Restaurant not found"),
        ("/api/foods/999", "Food not found"),
        ("/api/food-reviews/999", "Food review not found"),
        ("/api/general-reviews/999", "General review not found"),
        ("/api/profiles/999", "Profile not found"),
        ("/api/messages/999", "Message not found"),
    ];

    for (uri, message) in cases {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(cache_header(&response), None, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "not_found", "{uri}");
        assert_eq!(body["error"]["message"], message, "{uri}");
    }
    assert!(app.cache.is_empty());
}

#[tokio::test]
async fn invalid_input_is_400() {
    let app = app_with_restaurant();

    let empty = app.send(Method::POST, "/api/food-reviews", None).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    let body = json_body(empty).await;
    assert_eq!(body["error"]["message"], "User ID is required");

    let no_food = app
        .send(
            Method::POST,
            "/api/food-reviews",
            Some(json!({ "user_id": Uuid::new_v4(), "rating": 3 })),
        )
        .await;
    assert_eq!(no_food.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(no_food).await["error"]["message"], "Food ID is required");

    let bad_user = app
        .send(
            Method::POST,
            "/api/general-reviews",
            Some(json!({ "user_id": "nope", "restaurant_id": 1, "rating": 3 })),
        )
        .await;
    assert_eq!(bad_user.status(), StatusCode::BAD_REQUEST);

    let bad_rating = app
        .send(
            Method::POST,
            "/api/general-reviews",
            Some(json!({ "user_id": Uuid::new_v4(), "restaurant_id": 1, "rating": 0 })),
        )
        .await;
    assert_eq!(bad_rating.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(bad_rating).await["error"]["message"],
        "Rating must be between 1 and 5"
    );
}

#[tokio::test]
async fn store_failures_are_opaque_500s() {
    let app = app_with_restaurant();
    app.store.set_fail_writes(true);

    let response = app
        .send(
            Method::POST,
            "/api/general-reviews",
            Some(json!({ "user_id": Uuid::new_v4(), "restaurant_id": 1, "rating": 4 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["message"], "Internal server error");
}

#[tokio::test]
async fn restaurants_are_paginated() {
    let store = MemoryStore::new();
    for id in 1..=5 {
        store.add_restaurant(id, &format!("Place {id}"));
    }
    let app = TestApp::new(store);

    let page = json_body(app.get("/api/restaurants?page=2&limit=2").await).await;
    assert_eq!(page["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["data"][0]["id"], 3);
    assert_eq!(page["pagination"]["totalCount"], 5);
    assert_eq!(page["pagination"]["totalPages"], 3);
    assert_eq!(page["pagination"]["hasNextPage"], true);
    assert_eq!(page["pagination"]["hasPrevPage"], true);

    let fallback = json_body(app.get("/api/restaurants?page=abc&limit=-1").await).await;
    assert_eq!(fallback["pagination"]["page"], 1);
    assert_eq!(fallback["pagination"]["limit"], 20);
}

#[tokio::test]
async fn restaurant_search_matches_description() {
    let app = app_with_restaurant();

    let hits = json_body(app.get("/api/restaurants/search?q=KITCHEN").await).await;
    let hits = hits.as_array().expect("search hits");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Taco Stand");
    assert_eq!(hits[0]["menu_item_count"], 1);
    assert_eq!(hits[0]["review_count"], 0);

    let none = json_body(app.get("/api/restaurants/search?q=sushi").await).await;
    assert_eq!(none.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn food_search_within_a_restaurant() {
    let store = MemoryStore::new();
    store.add_restaurant(1, "Taco Stand");
    store.add_food(10, 1, "Carnitas Taco", Some(4.0));
    store.add_food(11, 1, "Horchata", Some(2.0));
    store.add_food(12, 2, "Fish Taco", Some(5.0));
    let app = TestApp::new(store);

    let found = json_body(app.get("/api/foods/restaurant/1/search?q=taco").await).await;
    let names: Vec<&str> = found
        .as_array()
        .expect("foods")
        .iter()
        .filter_map(|food| food["name"].as_str())
        .collect();
    assert_eq!(names, ["Carnitas Taco"]);

    let everything = json_body(app.get("/api/foods/restaurant/1/search?q=").await).await;
    assert_eq!(everything.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn profile_lifecycle() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    store.add_auth_user(user, "Diner@Example.com");
    let app = TestApp::new(store);

    let missing = app
        .send(Method::POST, "/api/profiles", Some(json!({ "name": "Dana" })))
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(missing).await["error"]["message"],
        "Name and auth_id are required"
    );

    let unknown = app
        .send(
            Method::POST,
            "/api/profiles",
            Some(json!({ "name": "Dana", "auth_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let created = app
        .send(
            Method::POST,
            "/api/profiles",
            Some(json!({ "name": "Dana", "auth_id": user })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = app
        .send(
            Method::POST,
            "/api/profiles",
            Some(json!({ "name": "Dana again", "auth_id": user })),
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let check = json_body(app.get("/api/profiles/check-user?email=diner@example.com").await).await;
    assert_eq!(check["exists"], true);

    let auth_uri = format!("/api/profiles/auth/{user}");
    let renamed = app
        .send(Method::PUT, &auth_uri, Some(json!({ "name": "Dee" })))
        .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let renamed = json_body(renamed).await;
    assert_eq!(renamed["name"], "Dee");
    assert_eq!(renamed["name_change"], 0);

    let second = app
        .send(Method::PUT, &auth_uri, Some(json!({ "name": "Dot" })))
        .await;
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(second).await["error"]["message"],
        "You can only change your name once."
    );

    let stranger = app
        .send(
            Method::DELETE,
            &auth_uri,
            Some(json!({ "user_id": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    let deleted = app
        .send(Method::DELETE, &auth_uri, Some(json!({ "user_id": user })))
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(app.get(&auth_uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn identity_failure_surfaces_after_local_cleanup() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    store.add_profile(user, "Dana");
    let identity = Arc::new(RecordingIdentity {
        fail: true,
        ..RecordingIdentity::default()
    });
    let app = TestApp::with_identity(store, identity);

    let response = app
        .send(
            Method::DELETE,
            &format!("/api/profiles/auth/{user}"),
            Some(json!({ "user_id": user })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        app.get(&format!("/api/profiles/auth/{user}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn general_review_reports_and_likes() {
    let store = MemoryStore::new();
    store.add_restaurant(1, "Taco Stand");
    let author = Uuid::new_v4();
    let review = store.add_general_review(author, 1, 4);
    let app = TestApp::new(store);

    let missing_id = app
        .send(Method::POST, "/api/general-reviews/report", Some(json!({})))
        .await;
    assert_eq!(missing_id.status(), StatusCode::BAD_REQUEST);

    let reporter = Uuid::new_v4();
    let report = app
        .send(
            Method::POST,
            "/api/general-reviews/report",
            Some(json!({ "general_review_id": review, "reason": "spam", "user_id": reporter })),
        )
        .await;
    assert_eq!(report.status(), StatusCode::CREATED);
    let report = json_body(report).await;
    assert_eq!(report["report"]["general_review_id"], review);

    let toggle_uri = format!("/api/general-reviews/{review}/toggle-like");
    let liked = json_body(
        app.send(Method::POST, &toggle_uri, Some(json!({ "user_id": reporter })))
            .await,
    )
    .await;
    assert_eq!(liked["likes"], 1);
    assert_eq!(liked["liked"], true);

    let exists = json_body(
        app.get(&format!("/api/general-reviews/{review}/like/{reporter}"))
            .await,
    )
    .await;
    assert_eq!(exists["exists"], true);

    let unliked = json_body(
        app.send(Method::POST, &toggle_uri, Some(json!({ "user_id": reporter })))
            .await,
    )
    .await;
    assert_eq!(unliked["likes"], 0);
    assert_eq!(unliked["liked"], false);
}

#[tokio::test]
async fn contact_messages() {
    let store = MemoryStore::new();
    let profile = store.add_profile(Uuid::new_v4(), "Dana");
    let app = TestApp::new(store);

    let blank = app
        .send(
            Method::POST,
            "/api/messages",
            Some(json!({ "subject": " ", "message": "hi" })),
        )
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let created = app
        .send(
            Method::POST,
            "/api/messages",
            Some(json!({ "profile_id": profile, "subject": "Hours", "message": "Open late?" })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    assert_eq!(created["success"], true);

    let list = app.get("/api/messages").await;
    assert_eq!(cache_header(&list), None);
    let list = json_body(list).await;
    assert_eq!(list[0]["user_name"], "Dana");
    assert_eq!(list[0]["subject"], "Hours");
}
