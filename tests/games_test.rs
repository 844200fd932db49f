//! Integration tests for the archive proxy endpoints.
//!
//! The app is served on an ephemeral port against an in-process fake of the
//! Chess.com public API.

mod common;

use serde_json::Value;

async fn get(base: &str, path: &str) -> reqwest::Response {
    common::client()
        .get(format!("{base}{path}"))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn latest_archive_games_are_returned_unmodified() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games?username=threegames").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["cache-control"],
        "no-cache, no-store, must-revalidate"
    );

    let body: Value = resp.json().await.unwrap();
    let games = body.as_array().expect("Should return an array");
    assert_eq!(games.len(), 3, "Only the latest month is returned");
    assert_eq!(games[0]["black"]["username"], "alice");
    assert_eq!(games[1]["white"]["username"], "bob");
    // Fields the proxy doesn't model are passed through.
    assert_eq!(games[2]["time_class"], "blitz");
}

#[tokio::test]
async fn user_without_archives_is_not_found() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games?username=noarchives").await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_latest_month_is_an_empty_list() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games?username=quietmonth").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));

    let resp = get(&base, "/game?username=quietmonth&gameIndex=0").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games?username=ghost").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn missing_username_is_bad_request() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games").await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Username"));
}

#[tokio::test]
async fn upstream_failure_is_server_error() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/games?username=broken").await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unreachable_upstream_is_server_error() {
    // Nothing listens on port 9 of localhost.
    let config = common::test_config("http://127.0.0.1:9", common::ANSWERING_ENGINE, 5_000);
    let base = common::spawn_app_with(config).await;

    let resp = get(&base, "/games?username=threegames").await;
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn single_game_by_index() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/game?username=threegames&gameIndex=1").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["white"]["username"], "bob");

    let resp = get(&base, "/game?username=threegames&gameIndex=3").await;
    assert_eq!(resp.status(), 404);

    let resp = get(&base, "/game?username=threegames&gameIndex=abc").await;
    assert_eq!(resp.status(), 400);

    let resp = get(&base, "/game?username=threegames").await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn legacy_paths_are_served() {
    let base = common::spawn_app(common::ANSWERING_ENGINE, 5_000).await;

    let resp = get(&base, "/chesscom-games?username=threegames").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);

    let resp = get(&base, "/chesscom-game?username=threegames&gameIndex=0").await;
    assert_eq!(resp.status(), 200);
}
