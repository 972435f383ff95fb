//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;

use nyx_bot::application::context::BotContext;
use nyx_bot::application::errors::BotError;
use nyx_bot::domain::entities::{
    AutocompleteChoice, Channel, Guild, Member, Payload, Permission, Role, SentMessage, User,
};
use nyx_bot::domain::traits::{BotInfo, Cache, InteractionRef, ManifestCommand, Platform};
use nyx_bot::infrastructure::config::Config;
use nyx_bot::infrastructure::database::SqliteDatastore;
use nyx_bot::infrastructure::logging::TemplateFormat;
use nyx_bot::infrastructure::storage::MemoryCache;

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .event_format(TemplateFormat::new("Nyx", "%H:%M"))
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    (result, output)
}

pub const GUILD: &str = "200000000000000000";
pub const CHANNEL: &str = "200000000000000001";

/// One call the bot made against the platform
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login,
    Send {
        channel_id: String,
        payload: Payload,
        reply_to: Option<String>,
    },
    Edit {
        id: String,
        payload: Payload,
    },
    Delete {
        id: String,
    },
    Defer {
        ephemeral: bool,
    },
    Reply {
        payload: Payload,
    },
    EditReply {
        payload: Payload,
    },
    Autocomplete {
        choices: Vec<String>,
    },
    Register {
        guild_id: String,
        commands: Vec<ManifestCommand>,
    },
}

/// Platform that records every call
#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    fail_login: AtomicBool,
    fail_register: AtomicBool,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_login(self: Arc<Self>) -> Arc<Self> {
        self.fail_login.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_register(self: Arc<Self>) -> Arc<Self> {
        self.fail_register.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every payload that reached the platform, in order
    pub fn payloads(&self) -> Vec<Payload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { payload, .. }
                | Call::Edit { payload, .. }
                | Call::Reply { payload }
                | Call::EditReply { payload } => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Delete { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn sent(&self, channel_id: &str) -> SentMessage {
        SentMessage {
            id: format!("m{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            channel_id: channel_id.to_string(),
        }
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn login(&self, _token: &str) -> Result<(), BotError> {
        self.record(Call::Login);
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(BotError::Platform("401: Unauthorized".to_string()));
        }
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: &str,
        payload: &Payload,
        reply_to: Option<&str>,
    ) -> Result<SentMessage, BotError> {
        self.record(Call::Send {
            channel_id: channel_id.to_string(),
            payload: payload.clone(),
            reply_to: reply_to.map(str::to_string),
        });
        Ok(self.sent(channel_id))
    }

    async fn edit_message(&self, message: &SentMessage, payload: &Payload) -> Result<SentMessage, BotError> {
        self.record(Call::Edit {
            id: message.id.clone(),
            payload: payload.clone(),
        });
        Ok(message.clone())
    }

    async fn delete_message(&self, message: &SentMessage) -> Result<(), BotError> {
        self.record(Call::Delete { id: message.id.clone() });
        Ok(())
    }

    async fn defer_interaction(&self, _interaction: &InteractionRef, ephemeral: bool) -> Result<(), BotError> {
        self.record(Call::Defer { ephemeral });
        Ok(())
    }

    async fn reply_interaction(&self, interaction: &InteractionRef, payload: &Payload) -> Result<SentMessage, BotError> {
        self.record(Call::Reply { payload: payload.clone() });
        Ok(self.sent(&interaction.channel_id))
    }

    async fn edit_interaction_reply(
        &self,
        interaction: &InteractionRef,
        payload: &Payload,
    ) -> Result<SentMessage, BotError> {
        self.record(Call::EditReply { payload: payload.clone() });
        Ok(self.sent(&interaction.channel_id))
    }

    async fn respond_autocomplete(
        &self,
        _interaction: &InteractionRef,
        choices: &[AutocompleteChoice],
    ) -> Result<(), BotError> {
        self.record(Call::Autocomplete {
            choices: choices.iter().map(|c| c.value.clone()).collect(),
        });
        Ok(())
    }

    async fn register_guild_commands(&self, guild_id: &str, commands: &[ManifestCommand]) -> Result<(), BotError> {
        self.record(Call::Register {
            guild_id: guild_id.to_string(),
            commands: commands.to_vec(),
        });
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(BotError::Platform("Missing Access".to_string()));
        }
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<User, BotError> {
        Err(BotError::NotFound(user_id.to_string()))
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, BotError> {
        Err(BotError::NotFound(guild_id.to_string()))
    }

    async fn fetch_member(&self, _guild_id: &str, user_id: &str) -> Result<Member, BotError> {
        Err(BotError::NotFound(user_id.to_string()))
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, BotError> {
        Err(BotError::NotFound(channel_id.to_string()))
    }

    async fn fetch_role(&self, _guild_id: &str, role_id: &str) -> Result<Role, BotError> {
        Err(BotError::NotFound(role_id.to_string()))
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "mock".to_string(),
            name: "Nyx".to_string(),
            username: "nyx".to_string(),
        }
    }
}

/// Bot context over `platform`, an in-memory datastore and a connected cache
pub async fn bot_context(platform: Arc<MockPlatform>) -> BotContext {
    let cache = Arc::new(MemoryCache::new("memory://"));
    cache.connect().await.unwrap();
    BotContext::new(
        Config::default(),
        platform,
        Arc::new(SqliteDatastore::new(":memory:")),
        cache,
    )
}

/// Config pointing at the plugin manifests shipped with the crate
pub fn shipped_config() -> Config {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("plugins");
    let mut config = Config::default();
    config.bot.guild_id = Some(GUILD.to_string());
    config.paths.commands = root.join("commands");
    config.paths.schedules = root.join("schedules");
    config.database.url = ":memory:".to_string();
    config
}

/// Bot context whose stores are left for `Bot::start` to connect
pub fn fresh_context(platform: Arc<MockPlatform>, config: Config, datastore: SqliteDatastore) -> BotContext {
    let cache = Arc::new(MemoryCache::new(config.cache.url.clone()));
    BotContext::new(config, platform, Arc::new(datastore), cache)
}

pub fn user(name: &str) -> User {
    User::new(format!("3000000000000000{:02}", name.len()), name)
}

pub fn member(name: &str, permissions: impl IntoIterator<Item = Permission>) -> Member {
    Member::new(user(name), GUILD).with_permissions(permissions)
}

/// Write a unit manifest, creating parent folders
pub fn write_unit(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}
