//! Startup sequence tests
//! Run with: cargo test --test bot_test

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use common::{ensure_init, fresh_context, shipped_config, Call, MockPlatform, GUILD};
use nyx_bot::application::context::BotContext;
use nyx_bot::application::errors::{BotError, StorageError};
use nyx_bot::bot::SMOKE_KEY;
use nyx_bot::domain::traits::Cache;
use nyx_bot::infrastructure::database::SqliteDatastore;
use nyx_bot::plugins::builtin_table;
use nyx_bot::plugins::schedules::heartbeat::HEARTBEAT_KEY;
use nyx_bot::Bot;

/// Accepts writes and forgets them
struct ForgetfulCache;

#[async_trait]
impl Cache for ForgetfulCache {
    async fn connect(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn location(&self) -> String {
        "forgetful://".to_string()
    }
}

async fn start(platform: Arc<MockPlatform>) -> Result<Bot, BotError> {
    ensure_init();
    let context = fresh_context(platform, shipped_config(), SqliteDatastore::new(":memory:"));
    Bot::start(context, &builtin_table()).await
}

#[tokio::test(start_paused = true)]
async fn test_start_builds_registries_and_connects_stores() {
    let platform = MockPlatform::new();

    let bot = start(platform.clone()).await.unwrap();

    assert_eq!(bot.commands().len(), 3);
    assert!(bot.commands().lookup("ping").is_some());
    assert_eq!(bot.schedules().names().collect::<Vec<_>>(), vec!["heartbeat"]);
    assert!(bot.context().datastore.is_connected());
    assert_eq!(bot.context().cache.get(SMOKE_KEY).await.unwrap().as_deref(), Some(SMOKE_KEY));

    let calls = platform.calls();
    assert_eq!(calls.first(), Some(&Call::Login));
    assert!(calls
        .iter()
        .any(|call| matches!(call, Call::Register { guild_id, commands } if guild_id == GUILD && commands.len() == 3)));

    bot.schedules().stop("heartbeat").await.unwrap();
    bot.shutdown().await.unwrap();
    assert!(!bot.context().datastore.is_connected());
}

#[tokio::test(start_paused = true)]
async fn test_run_on_load_schedule_sees_a_connected_cache() {
    let bot = start(MockPlatform::new()).await.unwrap();

    let heartbeat = bot.schedules().get("heartbeat").unwrap();
    assert_eq!(heartbeat.handle().runs(), 1, "the heartbeat ran once during startup");
    let beat = bot.context().cache.get(HEARTBEAT_KEY).await.unwrap();
    assert!(beat.is_some(), "the initial heartbeat reached the cache");

    bot.schedules().stop("heartbeat").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_login_failure_aborts_startup() {
    let platform = MockPlatform::new().failing_login();

    let result = start(platform.clone()).await;

    let Err(BotError::Startup(reason)) = result else {
        panic!("expected a startup error");
    };
    assert!(reason.starts_with("Login failed"), "{}", reason);
    assert_eq!(platform.calls(), vec![Call::Login], "nothing runs after a failed login");
}

#[tokio::test(start_paused = true)]
async fn test_datastore_failure_aborts_startup() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let datastore = SqliteDatastore::new(dir.path().join("missing").join("nyx.db"));
    let platform = MockPlatform::new();
    let context = fresh_context(platform.clone(), shipped_config(), datastore);

    let result = Bot::start(context, &builtin_table()).await;

    let Err(BotError::Startup(reason)) = result else {
        panic!("expected a startup error");
    };
    assert!(reason.starts_with("Datastore connection failed"), "{}", reason);
    assert!(!platform.calls().iter().any(|call| matches!(call, Call::Register { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_cache_that_loses_writes_aborts_startup() {
    ensure_init();
    let context = BotContext::new(
        shipped_config(),
        MockPlatform::new(),
        Arc::new(SqliteDatastore::new(":memory:")),
        Arc::new(ForgetfulCache),
    );

    let result = Bot::start(context, &builtin_table()).await;

    let Err(BotError::Startup(reason)) = result else {
        panic!("expected a startup error");
    };
    assert!(reason.starts_with("Cache smoke test failed"), "{}", reason);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_cache_url_aborts_startup() {
    ensure_init();
    let mut config = shipped_config();
    config.cache.url = "redis://localhost:6379".to_string();
    let context = fresh_context(MockPlatform::new(), config, SqliteDatastore::new(":memory:"));

    let result = Bot::start(context, &builtin_table()).await;

    assert!(matches!(result, Err(BotError::Startup(ref reason)) if reason.starts_with("Cache connection failed")));
}

#[tokio::test(start_paused = true)]
async fn test_failed_manifest_publish_does_not_abort_startup() {
    let platform = MockPlatform::new().failing_register();

    let bot = start(platform.clone()).await.unwrap();

    assert!(platform.calls().iter().any(|call| matches!(call, Call::Register { .. })));
    assert_eq!(bot.commands().len(), 3);
    assert!(bot.dispatcher().commands().lookup("help").is_some());

    bot.schedules().stop("heartbeat").await.unwrap();
}
