use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{TestClient, TestStateBuilder, TestUser, dates, db, jwt};

#[tokio::test]
async fn test_sign_in_loads_scores() {
    let state = TestStateBuilder::new().build().await.unwrap();
    let user = TestUser::new(&state);
    let client = TestClient::new(state.clone());

    db::set_score(&state.pool, user.id, "lesson1", 4).await.unwrap();
    db::set_score(&state.pool, user.id, "lesson2", 1).await.unwrap();

    let response = client.post_with_auth("/v1/session", &user.token).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["user_id"], user.id.to_string());
    assert_eq!(body["scores_loaded"], 2);
    assert!(state.sessions.get(user.id).await.is_some());
}

#[tokio::test]
async fn test_sign_out_discards_cached_plan() {
    let state = TestStateBuilder::new().build().await.unwrap();
    let user = TestUser::new(&state);
    let client = TestClient::new(state.clone());

    db::set_range(&state.pool, user.id, dates::today(), dates::days_from_today(30))
        .await
        .unwrap();
    client
        .get_with_auth("/v1/plan", &user.token)
        .await
        .assert_status(StatusCode::OK);

    let response = client.delete_with_auth("/v1/session", &user.token).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(state.sessions.get(user.id).await.is_none());

    let cached: Value = client.get_with_auth("/v1/plan/cached", &user.token).await.json();
    assert!(cached["status"].is_null());
    assert_eq!(cached["calendar"], serde_json::json!({}));

    // Signing out twice is fine
    client
        .delete_with_auth("/v1/session", &user.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_sessions_are_per_user() {
    let state = TestStateBuilder::new().build().await.unwrap();
    let alice = TestUser::new(&state);
    let bob = TestUser::new(&state);
    let client = TestClient::new(state.clone());

    db::set_score(&state.pool, alice.id, "lesson1", 4).await.unwrap();

    let alice_scores: Value = client.get_with_auth("/v1/scores", &alice.token).await.json();
    let bob_scores: Value = client.get_with_auth("/v1/scores", &bob.token).await.json();

    assert_eq!(alice_scores["lesson1"], 4);
    assert!(bob_scores.get("lesson1").is_none());
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    let state = TestStateBuilder::new().build().await.unwrap();
    let client = TestClient::new(state);

    let response = client.post_with_auth("/v1/session", "not-a-token").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let foreign = jwt::create_test_token(
        uuid::Uuid::new_v4(),
        "x@example.com",
        "another_secret_that_is_long_enough_1234",
    );
    let response = client.get_with_auth("/v1/scores", &foreign).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_and_fallback() {
    let state = TestStateBuilder::new().build().await.unwrap();
    let client = TestClient::new(state);

    let response = client.get("/health").await;
    response.assert_status(StatusCode::OK);
    assert!(response.headers.get("x-request-id").is_some());
    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );

    client.get("/v1/nope").await.assert_status(StatusCode::NOT_FOUND);
}
