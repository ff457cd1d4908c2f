use regex::Regex;
use rps_persistence::{PersistenceError, PersistenceGateway};
use rps_types::{
    ApiErrorKind, CreateUserRequest, ErrorResponse, GameResultResponse, NewGameResult,
    RecentGamesResponse, StatsResponse, UserId, UserResponse,
};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use warp::Filter;
use warp::http::StatusCode;

use crate::config::Config;
use crate::results::{RecordError, ResultRecorder};
use crate::websocket::ConnectionManager;

pub mod config;
pub mod results;
pub mod session;
pub mod websocket;

const MAX_BODY_BYTES: u64 = 16 * 1024;

static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s/]{1,64}$").expect("username pattern is valid")
});

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    gateway: Arc<dyn PersistenceGateway>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let recorder = Arc::new(ResultRecorder::new(gateway.clone()));

    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let gateway_filter = warp::any().map({
        let gateway = gateway.clone();
        move || gateway.clone()
    });

    let recorder_filter = warp::any().map({
        let recorder = recorder.clone();
        move || recorder.clone()
    });

    let config_filter = warp::any().map({
        let config = config.clone();
        move || config.clone()
    });

    // WebSocket play session
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter.clone())
        .and(gateway_filter.clone())
        .and(recorder_filter.clone())
        .and(config_filter.clone())
        .map(
            |ws: warp::ws::Ws,
             conn_mgr,
             gateway,
             recorder,
             config: Arc<Config>| {
                let timings = config.round_timings;
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, conn_mgr, gateway, recorder, timings)
                })
            },
        );

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_user = warp::path!("api" / "users")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(gateway_filter.clone())
        .and_then(handle_create_user);

    let user_stats = warp::path!("api" / "users" / String / "stats")
        .and(warp::get())
        .and(gateway_filter.clone())
        .and_then(handle_user_stats);

    let recent_games = warp::path!("api" / "users" / String / "recent-games")
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(gateway_filter.clone())
        .and(config_filter.clone())
        .and_then(handle_recent_games);

    let user_by_name = warp::path!("api" / "users" / String)
        .and(warp::get())
        .and(gateway_filter.clone())
        .and_then(handle_get_user);

    let record_result = warp::path!("api" / "game-results")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(recorder_filter.clone())
        .and_then(handle_record_result);

    // Static client with SPA fallback
    let index = format!("{}/index.html", config.static_dir.trim_end_matches('/'));
    let static_files = warp::get()
        .and(warp::fs::dir(config.static_dir.clone()))
        .or(warp::get().and(warp::fs::file(index)));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    websocket
        .or(health)
        .or(create_user)
        .or(user_stats)
        .or(recent_games)
        .or(user_by_name)
        .or(record_result)
        .or(static_files)
        .with(cors)
        .with(warp::log("rps_arena"))
}

fn json_reply<T: serde::Serialize>(body: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(kind: ApiErrorKind, message: &str) -> JsonReply {
    let status =
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_reply(&ErrorResponse::new(message), status)
}

fn internal_error(context: &str, err: impl std::fmt::Display) -> JsonReply {
    tracing::error!("{}: {}", context, err);
    error_reply(ApiErrorKind::InternalError, "Internal server error")
}

fn parse_create_user(body: &[u8]) -> Option<CreateUserRequest> {
    let request: CreateUserRequest = serde_json::from_slice(body).ok()?;
    if !USERNAME_PATTERN.is_match(&request.username) || request.password.is_empty() {
        return None;
    }
    Some(request)
}

fn parse_user_id(raw: &str) -> Option<UserId> {
    raw.parse::<UserId>().ok().filter(|id| *id > 0)
}

async fn handle_create_user(
    body: warp::hyper::body::Bytes,
    gateway: Arc<dyn PersistenceGateway>,
) -> Result<JsonReply, warp::Rejection> {
    let Some(request) = parse_create_user(&body) else {
        return Ok(error_reply(ApiErrorKind::InvalidInput, "Invalid user data"));
    };

    match gateway
        .create_user(&request.username, &request.password)
        .await
    {
        Ok(user) => Ok(json_reply(&UserResponse { user }, StatusCode::OK)),
        Err(PersistenceError::DuplicateUsername { .. }) => Ok(error_reply(
            ApiErrorKind::DuplicateUsername,
            "Username already exists",
        )),
        Err(err) => {
            tracing::error!("Failed to create user {}: {}", request.username, err);
            Ok(error_reply(ApiErrorKind::InvalidInput, "Invalid user data"))
        }
    }
}

async fn handle_get_user(
    username: String,
    gateway: Arc<dyn PersistenceGateway>,
) -> Result<JsonReply, warp::Rejection> {
    match gateway.find_user_by_username(&username).await {
        Ok(Some(user)) => Ok(json_reply(&UserResponse { user }, StatusCode::OK)),
        Ok(None) => Ok(error_reply(ApiErrorKind::NotFound, "User not found")),
        Err(err) => Ok(internal_error("Failed to fetch user", err)),
    }
}

async fn handle_record_result(
    body: warp::hyper::body::Bytes,
    recorder: Arc<ResultRecorder>,
) -> Result<JsonReply, warp::Rejection> {
    let Ok(result) = serde_json::from_slice::<NewGameResult>(&body) else {
        return Ok(error_reply(ApiErrorKind::InvalidInput, "Invalid game data"));
    };

    match recorder.record(result).await {
        Ok(game_result) => Ok(json_reply(&GameResultResponse { game_result }, StatusCode::OK)),
        Err(
            err @ (RecordError::InconsistentOutcome { .. }
            | RecordError::Persistence(PersistenceError::UserNotFound { .. })),
        ) => {
            tracing::debug!("Rejected game result: {}", err);
            Ok(error_reply(ApiErrorKind::InvalidInput, "Invalid game data"))
        }
        Err(err) => Ok(internal_error("Failed to record game result", err)),
    }
}

async fn handle_user_stats(
    user_id: String,
    gateway: Arc<dyn PersistenceGateway>,
) -> Result<JsonReply, warp::Rejection> {
    let Some(user_id) = parse_user_id(&user_id) else {
        return Ok(error_reply(ApiErrorKind::NotFound, "User stats not found"));
    };

    match gateway.get_user_stats(user_id).await {
        Ok(Some(stats)) => Ok(json_reply(&StatsResponse { stats }, StatusCode::OK)),
        Ok(None) => Ok(error_reply(ApiErrorKind::NotFound, "User stats not found")),
        Err(err) => Ok(internal_error("Failed to fetch user stats", err)),
    }
}

async fn handle_recent_games(
    user_id: String,
    query: HashMap<String, String>,
    gateway: Arc<dyn PersistenceGateway>,
    config: Arc<Config>,
) -> Result<JsonReply, warp::Rejection> {
    let Some(user_id) = parse_user_id(&user_id) else {
        return Ok(error_reply(ApiErrorKind::InvalidInput, "Invalid user ID format"));
    };

    let limit = query
        .get("limit")
        .and_then(|limit| limit.parse::<u64>().ok())
        .unwrap_or(config.recent_games_default_limit)
        .clamp(1, config.recent_games_max_limit.max(1));

    match gateway.list_recent_games(user_id, limit).await {
        Ok(recent_games) => Ok(json_reply(
            &RecentGamesResponse { recent_games },
            StatusCode::OK,
        )),
        Err(err) => Ok(internal_error("Failed to fetch recent games", err)),
    }
}
