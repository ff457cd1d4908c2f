mod test_helpers;

use rps_server::config::Config;
use rps_types::{GameResultResponse, Move, Outcome, RecentGamesResponse, StatsResponse};
use std::sync::Arc;
use test_helpers::*;

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&app.routes)
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "OK");
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let app = create_test_app().await;
    let user = register(&app.routes, "alice").await;
    assert_eq!(user.username, "alice");

    let (status, body) = get_json(&app.routes, "/api/users/alice").await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["id"], user.id);
    assert_eq!(body["user"]["username"], "alice");
    // Password hashes never leave the server
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let app = create_test_app().await;
    register(&app.routes, "bob").await;

    let (status, body) = post_json(
        &app.routes,
        "/api/users",
        serde_json::json!({ "username": "bob", "password": "another" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, serde_json::json!({ "error": "Username already exists" }));
}

#[tokio::test]
async fn test_invalid_user_data() {
    let app = create_test_app().await;

    for body in [
        serde_json::json!({ "username": "carol" }),
        serde_json::json!({ "username": "", "password": "pw" }),
        serde_json::json!({ "username": "has space", "password": "pw" }),
        serde_json::json!({ "username": "dave", "password": "" }),
        serde_json::json!("not an object"),
    ] {
        let (status, body) = post_json(&app.routes, "/api/users", body).await;
        assert_eq!(status, 400);
        assert_eq!(error_of(body), "Invalid user data");
    }
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = create_test_app().await;
    let (status, body) = get_json(&app.routes, "/api/users/ghost").await;
    assert_eq!(status, 404);
    assert_eq!(error_of(body), "User not found");
}

#[tokio::test]
async fn test_missing_stats_is_404() {
    let app = create_test_app().await;
    let (status, body) = get_json(&app.routes, "/api/users/999/stats").await;
    assert_eq!(status, 404);
    assert_eq!(body, serde_json::json!({ "error": "User stats not found" }));
}

#[tokio::test]
async fn test_new_user_has_zeroed_stats() {
    let app = create_test_app().await;
    let user = register(&app.routes, "erin").await;

    let (status, body) = get_json(&app.routes, &format!("/api/users/{}/stats", user.id)).await;
    assert_eq!(status, 200);
    let stats = serde_json::from_value::<StatsResponse>(body).unwrap().stats;
    assert_eq!(stats.user_id, user.id);
    assert_eq!(stats.total_games, 0);
    assert_eq!(stats.best_streak, 0);
}

#[tokio::test]
async fn test_game_result_updates_stats() {
    let app = create_test_app().await;
    let user = register(&app.routes, "frank").await;

    let rounds = [
        (Move::Rock, Move::Scissors, Outcome::Win),
        (Move::Scissors, Move::Paper, Outcome::Win),
        (Move::Paper, Move::Rock, Outcome::Win),
        (Move::Rock, Move::Paper, Outcome::Lose),
        (Move::Paper, Move::Paper, Outcome::Draw),
    ];
    for (player, computer, result) in rounds {
        let (status, body) = post_json(
            &app.routes,
            "/api/game-results",
            game_body(Some(user.id), player, computer, result),
        )
        .await;
        assert_eq!(status, 200, "{}", body);
        let record = serde_json::from_value::<GameResultResponse>(body)
            .unwrap()
            .game_result;
        assert_eq!(record.user_id, Some(user.id));
        assert_eq!(record.result, result);
    }

    let (_, body) = get_json(&app.routes, &format!("/api/users/{}/stats", user.id)).await;
    let stats = serde_json::from_value::<StatsResponse>(body).unwrap().stats;
    assert_eq!(stats.total_games, 5);
    assert_eq!(stats.wins, 3);
    assert_eq!(stats.losses, 1);
    assert_eq!(stats.draws, 1);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.best_streak, 3);
}

#[tokio::test]
async fn test_anonymous_game_result() {
    let app = create_test_app().await;
    let (status, body) = post_json(
        &app.routes,
        "/api/game-results",
        game_body(None, Move::Rock, Move::Rock, Outcome::Draw),
    )
    .await;
    assert_eq!(status, 200);
    assert!(body["gameResult"]["userId"].is_null());
}

#[tokio::test]
async fn test_invalid_game_data() {
    let app = create_test_app().await;
    let user = register(&app.routes, "gina").await;

    let cases = [
        // result contradicts the moves
        game_body(Some(user.id), Move::Rock, Move::Paper, Outcome::Win),
        // no such user
        game_body(Some(user.id + 1000), Move::Rock, Move::Paper, Outcome::Lose),
        serde_json::json!({ "playerChoice": "lizard", "computerChoice": "rock", "result": "win" }),
        serde_json::json!({ "playerChoice": "rock" }),
    ];
    for body in cases {
        let (status, body) = post_json(&app.routes, "/api/game-results", body).await;
        assert_eq!(status, 400);
        assert_eq!(error_of(body), "Invalid game data");
    }

    let (_, body) = get_json(&app.routes, &format!("/api/users/{}/stats", user.id)).await;
    assert_eq!(body["stats"]["totalGames"], 0);
}

#[tokio::test]
async fn test_stats_write_failure_is_internal_error() {
    let gateway = Arc::new(StatsOutageGateway {
        inner: migrated_gateway().await,
    });
    let app = create_test_app_over(
        gateway,
        Config {
            static_dir: "./does-not-exist".to_string(),
            ..Config::default()
        },
    );
    let user = register(&app.routes, "hank").await;

    let (status, body) = post_json(
        &app.routes,
        "/api/game-results",
        game_body(Some(user.id), Move::Rock, Move::Scissors, Outcome::Win),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(error_of(body), "Internal server error");
}

#[tokio::test]
async fn test_recent_games_newest_first_and_limited() {
    let app = create_test_app().await;
    let user = register(&app.routes, "hank").await;

    for player in [Move::Rock, Move::Paper, Move::Scissors] {
        post_json(
            &app.routes,
            "/api/game-results",
            game_body(Some(user.id), player, player, Outcome::Draw),
        )
        .await;
    }

    let (status, body) = get_json(
        &app.routes,
        &format!("/api/users/{}/recent-games?limit=2", user.id),
    )
    .await;
    assert_eq!(status, 200);
    let games = serde_json::from_value::<RecentGamesResponse>(body)
        .unwrap()
        .recent_games;
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].player_choice, Move::Scissors);
    assert_eq!(games[1].player_choice, Move::Paper);

    let (_, body) = get_json(&app.routes, &format!("/api/users/{}/recent-games", user.id)).await;
    assert_eq!(body["recentGames"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recent_games_limit_is_capped() {
    let app = create_test_app_with_config(Config {
        static_dir: "./does-not-exist".to_string(),
        recent_games_max_limit: 2,
        ..Config::default()
    })
    .await;
    let user = register(&app.routes, "ivy").await;

    for _ in 0..4 {
        post_json(
            &app.routes,
            "/api/game-results",
            game_body(Some(user.id), Move::Rock, Move::Scissors, Outcome::Win),
        )
        .await;
    }

    let (_, body) = get_json(
        &app.routes,
        &format!("/api/users/{}/recent-games?limit=500", user.id),
    )
    .await;
    assert_eq!(body["recentGames"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recent_games_bad_user_id() {
    let app = create_test_app().await;
    let (status, body) = get_json(&app.routes, "/api/users/abc/recent-games").await;
    assert_eq!(status, 400);
    assert_eq!(error_of(body), "Invalid user ID format");
}

#[tokio::test]
async fn test_recent_games_for_unknown_user_is_empty() {
    let app = create_test_app().await;
    let (status, body) = get_json(&app.routes, "/api/users/4242/recent-games").await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "recentGames": [] }));
}

#[tokio::test]
async fn test_static_files_with_spa_fallback() {
    let dir = static_fixture("spa");
    let app = create_test_app_with_config(Config {
        static_dir: dir.to_string_lossy().into_owned(),
        ..Config::default()
    })
    .await;

    let response = warp::test::request()
        .method("GET")
        .path("/app.js")
        .reply(&app.routes)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "console.log('rps');");

    // Client-side routes get the shell
    let response = warp::test::request()
        .method("GET")
        .path("/leaderboard/week")
        .reply(&app.routes)
        .await;
    assert_eq!(response.status(), 200);
    assert!(String::from_utf8_lossy(response.body()).contains("RPS Arena"));

    let _ = std::fs::remove_dir_all(dir);
}
