//! Dispatch integration tests: permission gate, hierarchy and outcomes
//! Run with: cargo test --test dispatch_test

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use common::{bot_context, ensure_init, member, user, Call, MockPlatform, CHANNEL, GUILD};
use nyx_bot::application::commands::{
    CommandContext, CommandHandler, CommandIndex, ExecutionPath, LeafCommand, Outcome, ParentCommand,
};
use nyx_bot::application::errors::BotError;
use nyx_bot::application::messaging::{DenialReason, DispatchOutcome, Dispatcher, TEMPORAL_DELETE_DELAY};
use nyx_bot::domain::entities::{
    AutocompleteRequest, CommandDescriptor, InboundEvent, Interaction, Message, OptionKind, OptionSpec, OptionValue,
    Payload, Permission, ResolvedOptions,
};

struct Echo;

#[async_trait]
impl CommandHandler for Echo {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        let text = format!("{} says hello", ctx.name());
        ctx.reply(text, Vec::new()).await?;
        Ok(())
    }
}

struct Silent;

#[async_trait]
impl CommandHandler for Silent {
    async fn execute(&self, _ctx: &mut CommandContext) -> Result<(), BotError> {
        Ok(())
    }
}

struct Fails;

#[async_trait]
impl CommandHandler for Fails {
    async fn execute(&self, _ctx: &mut CommandContext) -> Result<(), BotError> {
        Err(BotError::Platform("Unknown Channel".to_string()))
    }
}

struct FailsAfterReply;

#[async_trait]
impl CommandHandler for FailsAfterReply {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        ctx.reply("working on it", Vec::new()).await?;
        Err(BotError::Internal("lost the thread".to_string()))
    }
}

struct EditsFirst;

#[async_trait]
impl CommandHandler for EditsFirst {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        ctx.edit("too early", Vec::new()).await?;
        Ok(())
    }
}

struct Repeat;

#[async_trait]
impl CommandHandler for Repeat {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        let count = ctx.options().get_i64("count").unwrap_or(1) as usize;
        ctx.reply(vec!["again"; count].join(" "), Vec::new()).await?;
        Ok(())
    }

    fn options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("count", "How many times", OptionKind::Integer).required()]
    }
}

struct Suggests;

#[async_trait]
impl CommandHandler for Suggests {
    async fn execute(&self, _ctx: &mut CommandContext) -> Result<(), BotError> {
        Ok(())
    }

    fn autocomplete(
        &self,
        option: &str,
        _request: &AutocompleteRequest,
        _commands: &CommandIndex,
    ) -> Vec<String> {
        let mut values: Vec<String> = (0..30).rev().map(|i| format!("{}-{:02}", option, i)).collect();
        values.push("Other".to_string());
        values
    }
}

struct Counted {
    hits: Arc<AtomicUsize>,
}

#[async_trait]
impl CommandHandler for Counted {
    async fn execute(&self, ctx: &mut CommandContext) -> Result<(), BotError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let key = ctx.options().get_str("key").unwrap_or("-").to_string();
        ctx.reply(format!("{} {}", ctx.descriptor().canonical_name(), key), Vec::new()).await?;
        Ok(())
    }

    fn options(&self) -> Vec<OptionSpec> {
        vec![OptionSpec::new("key", "Key", OptionKind::String).required()]
    }
}

struct Fixture {
    platform: Arc<MockPlatform>,
    dispatcher: Dispatcher,
    get_hits: Arc<AtomicUsize>,
    set_hits: Arc<AtomicUsize>,
}

async fn fixture() -> Fixture {
    ensure_init();
    let platform = MockPlatform::new();
    let get_hits = Arc::new(AtomicUsize::new(0));
    let set_hits = Arc::new(AtomicUsize::new(0));

    let mut index = CommandIndex::new();
    index.register(
        "general",
        LeafCommand::new(CommandDescriptor::new("echo", "Say hello").with_alias("say"), Echo).into(),
    );
    index.register("general", LeafCommand::new(CommandDescriptor::new("silent", "Nothing"), Silent).into());
    index.register("general", LeafCommand::new(CommandDescriptor::new("fail", "Breaks"), Fails).into());
    index.register("general", LeafCommand::new(CommandDescriptor::new("flaky", "Breaks late"), FailsAfterReply).into());
    index.register("general", LeafCommand::new(CommandDescriptor::new("editor", "Edits"), EditsFirst).into());
    index.register(
        "general",
        LeafCommand::new(CommandDescriptor::new("repeat", "Repeat").with_usage("<count>"), Repeat).into(),
    );
    index.register("general", LeafCommand::new(CommandDescriptor::new("suggest", "Suggest"), Suggests).into());
    index.register(
        "moderation",
        LeafCommand::new(
            CommandDescriptor::new("purge", "Clean up")
                .with_permission(Permission::KickMembers)
                .with_permission(Permission::BanMembers)
                .with_permission(Permission::ManageMessages),
            Echo,
        )
        .into(),
    );
    index.register(
        "moderation",
        LeafCommand::new(CommandDescriptor::new("server", "Server info").guild_only(), Echo).into(),
    );
    index.register(
        "admin",
        ParentCommand::new(CommandDescriptor::new("admin", "Administration").with_alias("adm"))
            .subcommand(
                CommandDescriptor::new("get", "Read").with_alias("g"),
                Counted { hits: Arc::clone(&get_hits) },
            )
            .subcommand(
                CommandDescriptor::new("set", "Write"),
                Counted { hits: Arc::clone(&set_hits) },
            )
            .into(),
    );

    let bot = bot_context(Arc::clone(&platform)).await;
    Fixture {
        dispatcher: Dispatcher::new(bot, Arc::new(index)),
        platform,
        get_hits,
        set_hits,
    }
}

fn guild_message(content: &str) -> InboundEvent {
    let member = member("alice", [Permission::Administrator]);
    InboundEvent::Message(Message::new(CHANNEL, member.user.clone(), content).with_member(member))
}

fn usage_author(payload: &Payload) -> Option<&str> {
    payload.embeds.first().and_then(|e| e.author.as_deref())
}

#[tokio::test]
async fn test_parent_without_subcommand_shows_usage() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!admin")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            command: "admin".to_string(),
            path: ExecutionPath::Usage,
            outcome: Outcome::UsageShown,
        }
    );
    let payloads = f.platform.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(usage_author(&payloads[0]), Some("❔ Showing usage of !admin"));
    assert_eq!(payloads[0].embeds[0].field_value("Subcommands"), Some("`get`, `set`"));
    assert_eq!(f.get_hits.load(Ordering::SeqCst) + f.set_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_parent_with_unknown_subcommand_shows_usage() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!adm frobnicate key")).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Completed { path: ExecutionPath::Usage, .. }
    ));
    assert_eq!(f.platform.payloads().len(), 1);
    assert_eq!(f.get_hits.load(Ordering::SeqCst) + f.set_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_subcommand_aliases_are_not_matched() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!admin g key")).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Completed { path: ExecutionPath::Usage, .. }
    ));
    assert_eq!(f.get_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_parent_delegates_to_subcommand() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!admin get motd")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Completed {
            command: "admin".to_string(),
            path: ExecutionPath::Sub("get".to_string()),
            outcome: Outcome::Replied,
        }
    );
    assert_eq!(f.get_hits.load(Ordering::SeqCst), 1);
    assert_eq!(f.set_hits.load(Ordering::SeqCst), 0);
    assert_eq!(f.platform.payloads()[0].content.as_deref(), Some("get motd"));
}

#[tokio::test]
async fn test_interaction_delegates_with_slash_prefix() {
    let f = fixture().await;
    let member = member("bob", [Permission::Administrator]);

    let bare = Interaction::new(CHANNEL, member.user.clone(), "admin").with_member(member.clone());
    f.dispatcher.dispatch(InboundEvent::Interaction(bare)).await;
    assert_eq!(usage_author(&f.platform.payloads()[0]), Some("❔ Showing usage of /admin"));

    let options = ResolvedOptions::new()
        .with_subcommand("set")
        .with_value("key", OptionValue::String("motd".to_string()));
    let with_sub = Interaction::new(CHANNEL, member.user.clone(), "admin")
        .with_member(member)
        .with_options(options);
    let outcome = f.dispatcher.dispatch(InboundEvent::Interaction(with_sub)).await;

    assert!(matches!(outcome, DispatchOutcome::Completed { path: ExecutionPath::Sub(ref s), .. } if s == "set"));
    assert_eq!(f.set_hits.load(Ordering::SeqCst), 1);
    assert!(matches!(f.platform.calls().last(), Some(Call::Reply { .. })));
}

#[tokio::test]
async fn test_leaf_produces_exactly_one_reply() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!say")).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Completed { path: ExecutionPath::Leaf, outcome: Outcome::Replied, .. }
    ));
    let calls = f.platform.calls();
    assert_eq!(calls.len(), 1);
    let Call::Send { payload, reply_to, .. } = &calls[0] else {
        panic!("expected a reply, got {:?}", calls);
    };
    assert_eq!(payload.content.as_deref(), Some("say says hello"));
    assert!(reply_to.is_some());
    assert_eq!(payload.fail_if_not_exists, Some(false));
    assert_eq!(payload.mention_replied_user, Some(false));
}

#[tokio::test]
async fn test_silent_leaf_is_a_no_op() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!silent")).await;

    assert!(matches!(outcome, DispatchOutcome::Completed { outcome: Outcome::NoOp, .. }));
    assert!(f.platform.calls().is_empty());
}

#[tokio::test]
async fn test_non_commands_are_ignored() {
    let f = fixture().await;

    assert_eq!(f.dispatcher.dispatch(guild_message("hello there")).await, DispatchOutcome::Ignored);
    assert_eq!(f.dispatcher.dispatch(guild_message("!nope")).await, DispatchOutcome::Ignored);

    let mut bot_author = user("other-bot");
    bot_author.is_bot = true;
    let from_bot = Message::new(CHANNEL, bot_author, "!echo");
    assert_eq!(f.dispatcher.dispatch(InboundEvent::Message(from_bot)).await, DispatchOutcome::Ignored);

    assert!(f.platform.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_permissions_are_listed_in_declared_order() {
    let f = fixture().await;
    let moderator = member("carol", [Permission::BanMembers]);
    let message = Message::new(CHANNEL, moderator.user.clone(), "!purge").with_member(moderator.clone());

    let outcome = f.dispatcher.dispatch(InboundEvent::Message(message)).await;

    let DispatchOutcome::Rejected(check) = outcome else {
        panic!("expected a rejection, got {:?}", outcome);
    };
    assert!(!check.can_execute);
    assert_eq!(check.reason, Some(DenialReason::InsufficientPermissions));
    assert_eq!(check.missing, vec![Permission::KickMembers, Permission::ManageMessages]);

    let payloads = f.platform.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].content, Some(moderator.user.mention()));
    assert_eq!(
        payloads[0].embeds[0].field_value("Missing permissions"),
        Some("```KICK_MEMBERS, MANAGE_MESSAGES```")
    );

    assert_eq!(f.platform.deletes(), 0);
    tokio::time::sleep(TEMPORAL_DELETE_DELAY + Duration::from_millis(10)).await;
    assert_eq!(f.platform.deletes(), 1, "text rejections are removed after the delay");
}

#[tokio::test]
async fn test_guild_only_command_outside_guild_is_rejected() {
    let f = fixture().await;
    let direct = Message::new(CHANNEL, user("dave"), "!server");

    let outcome = f.dispatcher.dispatch(InboundEvent::Message(direct)).await;

    let DispatchOutcome::Rejected(check) = outcome else {
        panic!("expected a rejection, got {:?}", outcome);
    };
    assert_eq!(check.reason, Some(DenialReason::GuildRequired));
    assert!(check.missing.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interaction_rejection_is_not_deleted() {
    let f = fixture().await;
    let member = member("erin", []);
    let interaction = Interaction::new(CHANNEL, member.user.clone(), "purge").with_member(member);

    let outcome = f.dispatcher.dispatch(InboundEvent::Interaction(interaction)).await;
    assert!(matches!(outcome, DispatchOutcome::Rejected(_)));

    let calls = f.platform.calls();
    let Some(Call::Reply { payload }) = calls.first() else {
        panic!("expected an interaction reply, got {:?}", calls);
    };
    assert_eq!(payload.ephemeral, Some(true));

    tokio::time::sleep(TEMPORAL_DELETE_DELAY * 2).await;
    assert_eq!(f.platform.deletes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_command_error_becomes_internal_error_response() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!fail")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Failed {
            command: "fail".to_string(),
            error: "Platform error: Unknown Channel".to_string(),
        }
    );
    let payloads = f.platform.payloads();
    assert_eq!(payloads.len(), 1);
    let embed = &payloads[0].embeds[0];
    assert_eq!(embed.title.as_deref(), Some("❌ Error"));
    assert_eq!(embed.field_value("Message"), Some("```Platform error: Unknown Channel```"));

    tokio::time::sleep(TEMPORAL_DELETE_DELAY + Duration::from_millis(10)).await;
    assert_eq!(f.platform.deletes(), 1);
}

#[tokio::test]
async fn test_error_after_reply_edits_the_response() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!flaky")).await;

    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    let calls = f.platform.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Send { .. }));
    let Call::Edit { id, payload } = &calls[1] else {
        panic!("expected an edit, got {:?}", calls[1]);
    };
    assert_eq!(id, "m0");
    assert_eq!(payload.embeds[0].title.as_deref(), Some("❌ Error"));
}

#[tokio::test]
async fn test_edit_before_reply_is_missing_response_target() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!editor")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Failed {
            command: "editor".to_string(),
            error: "There's no response to edit".to_string(),
        }
    );
    assert_eq!(f.platform.payloads().len(), 1);
}

#[tokio::test]
async fn test_unparseable_arguments_show_usage() {
    let f = fixture().await;

    let outcome = f.dispatcher.dispatch(guild_message("!repeat many")).await;
    assert_eq!(outcome, DispatchOutcome::ArgumentsRejected);
    assert_eq!(usage_author(&f.platform.payloads()[0]), Some("❔ Showing usage of !repeat"));

    let outcome = f.dispatcher.dispatch(guild_message("!repeat 3")).await;
    assert!(matches!(outcome, DispatchOutcome::Completed { .. }));
    assert_eq!(f.platform.payloads()[1].content.as_deref(), Some("again again again"));
}

#[tokio::test]
async fn test_autocomplete_filters_truncates_and_sorts() {
    let f = fixture().await;
    let request = AutocompleteRequest {
        interaction_id: "i1".to_string(),
        token: "t1".to_string(),
        channel_id: CHANNEL.to_string(),
        user: user("frank"),
        guild_id: Some(GUILD.to_string()),
        command_name: "suggest".to_string(),
        subcommand: None,
        focused_option: "item".to_string(),
        focused_value: "IT".to_string(),
    };

    let outcome = f.dispatcher.dispatch(InboundEvent::Autocomplete(request)).await;
    assert_eq!(outcome, DispatchOutcome::Autocompleted { choices: 24 });

    let calls = f.platform.calls();
    let Some(Call::Autocomplete { choices }) = calls.first() else {
        panic!("expected autocomplete choices, got {:?}", calls);
    };
    assert_eq!(choices.len(), 24);
    assert!(choices.iter().all(|c| c.starts_with("item-")));
    let mut sorted = choices.clone();
    sorted.sort();
    assert_eq!(choices, &sorted);
}
