#![allow(dead_code)]

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use rps_persistence::{
    DatabaseGateway, PersistenceError, PersistenceGateway, connection::connect_to_memory_database,
};
use rps_server::config::Config;
use rps_server::create_routes;
use rps_server::websocket::ConnectionManager;
use rps_types::{
    ErrorResponse, GameRecord, Move, NewGameResult, Outcome, StatsUpdate, User, UserId,
    UserResponse, UserStats,
};
use sea_orm::DbErr;
use std::path::PathBuf;
use std::sync::Arc;
use warp::Filter;

/// Routes over a fresh in-memory database
pub struct TestApp<F> {
    pub routes: F,
    pub gateway: Arc<dyn PersistenceGateway>,
}

pub async fn migrated_gateway() -> DatabaseGateway {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    DatabaseGateway::new(db)
}

pub fn create_test_app_over(
    gateway: Arc<dyn PersistenceGateway>,
    config: Config,
) -> TestApp<impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static> {
    let routes = create_routes(
        Arc::new(ConnectionManager::new()),
        gateway.clone(),
        Arc::new(config),
    );
    TestApp { routes, gateway }
}

pub async fn create_test_app_with_config(
    config: Config,
) -> TestApp<impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static> {
    let gateway: Arc<dyn PersistenceGateway> = Arc::new(migrated_gateway().await);
    create_test_app_over(gateway, config)
}

/// Real storage whose stats writes fail as if the database went away
pub struct StatsOutageGateway {
    pub inner: DatabaseGateway,
}

#[async_trait]
impl PersistenceGateway for StatsOutageGateway {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, PersistenceError> {
        self.inner.create_user(username, password).await
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError> {
        self.inner.find_user(user_id).await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PersistenceError> {
        self.inner.find_user_by_username(username).await
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        self.inner.verify_credentials(username, password).await
    }

    async fn record_game_result(
        &self,
        result: NewGameResult,
    ) -> Result<GameRecord, PersistenceError> {
        self.inner.record_game_result(result).await
    }

    async fn get_user_stats(&self, user_id: UserId) -> Result<Option<UserStats>, PersistenceError> {
        self.inner.get_user_stats(user_id).await
    }

    async fn update_user_stats(
        &self,
        _user_id: UserId,
        _update: StatsUpdate,
    ) -> Result<UserStats, PersistenceError> {
        Err(PersistenceError::Database(DbErr::Custom(
            "connection reset".to_string(),
        )))
    }

    async fn list_recent_games(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<GameRecord>, PersistenceError> {
        self.inner.list_recent_games(user_id, limit).await
    }
}

pub async fn create_test_app()
-> TestApp<impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone + 'static> {
    create_test_app_with_config(Config {
        static_dir: "./does-not-exist".to_string(),
        ..Config::default()
    })
    .await
}

pub async fn post_json<F>(routes: &F, path: &str, body: serde_json::Value) -> (u16, serde_json::Value)
where
    F: Filter + Clone + 'static,
    F::Extract: warp::Reply + Send,
{
    let response = warp::test::request()
        .method("POST")
        .path(path)
        .json(&body)
        .reply(routes)
        .await;
    let json = serde_json::from_slice(response.body()).unwrap_or(serde_json::Value::Null);
    (response.status().as_u16(), json)
}

pub async fn get_json<F>(routes: &F, path: &str) -> (u16, serde_json::Value)
where
    F: Filter + Clone + 'static,
    F::Extract: warp::Reply + Send,
{
    let response = warp::test::request()
        .method("GET")
        .path(path)
        .reply(routes)
        .await;
    let json = serde_json::from_slice(response.body()).unwrap_or(serde_json::Value::Null);
    (response.status().as_u16(), json)
}

pub async fn register<F>(routes: &F, username: &str) -> User
where
    F: Filter + Clone + 'static,
    F::Extract: warp::Reply + Send,
{
    let (status, body) = post_json(
        routes,
        "/api/users",
        serde_json::json!({ "username": username, "password": "password123" }),
    )
    .await;
    assert_eq!(status, 200, "registration failed: {}", body);
    serde_json::from_value::<UserResponse>(body).unwrap().user
}

pub fn game_body(user_id: Option<i32>, player: Move, computer: Move, result: Outcome) -> serde_json::Value {
    let mut body = serde_json::json!({
        "playerChoice": player,
        "computerChoice": computer,
        "result": result,
    });
    if let Some(user_id) = user_id {
        body["userId"] = serde_json::json!(user_id);
    }
    body
}

pub fn error_of(body: serde_json::Value) -> String {
    serde_json::from_value::<ErrorResponse>(body).unwrap().error
}

/// Scratch directory holding a minimal client build
pub fn static_fixture(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rps-arena-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<!doctype html><title>RPS Arena</title>").unwrap();
    std::fs::write(dir.join("app.js"), "console.log('rps');").unwrap();
    dir
}
