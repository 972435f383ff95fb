use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use nyx_bot::application::context::BotContext;
use nyx_bot::application::errors::BotError;
use nyx_bot::domain::entities::InboundEvent;
use nyx_bot::infrastructure::adapters::ConsoleAdapter;
use nyx_bot::infrastructure::config::Config;
use nyx_bot::infrastructure::database::SqliteDatastore;
use nyx_bot::infrastructure::logging;
use nyx_bot::infrastructure::storage::MemoryCache;
use nyx_bot::plugins::builtin_table;
use nyx_bot::Bot;

#[derive(Parser)]
#[command(name = "nyx-bot")]
#[command(about = "A plugin-driven chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("nyx-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(token) = token_override {
        config.bot.token = Some(token);
    }
    logging::init(&config.bot.name, &config.logging);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| BotError::Startup(e.to_string()))?;
    runtime.block_on(async move {
        let console = Arc::new(ConsoleAdapter::new(config.bot.name.clone()));
        let datastore = Arc::new(SqliteDatastore::new(&config.database.url));
        let cache = Arc::new(MemoryCache::new(config.cache.url.clone()));
        let context = BotContext::new(config, console.clone(), datastore, cache);

        let bot = Bot::start(context, &builtin_table()).await?;
        println!("Type a command (e.g. !help), Ctrl+D to quit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.map_err(|e| BotError::Internal(e.to_string()))? else {
                        break;
                    };
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let dispatcher = Arc::clone(bot.dispatcher());
                    let event = InboundEvent::Message(console.message(line));
                    tokio::spawn(async move {
                        let outcome = dispatcher.dispatch(event).await;
                        tracing::debug!("Dispatch finished: {:?}", outcome);
                    });
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        bot.shutdown().await
    })
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
