//! Log output - `[time] <bot name> | LEVEL | message`

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LoggingConfig;

/// Event format rendering every line through the bot's log template
#[derive(Debug, Clone)]
pub struct TemplateFormat {
    title: String,
    date_format: String,
}

impl TemplateFormat {
    pub fn new(title: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date_format: date_format.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let now = chrono::Local::now();
        write!(
            writer,
            "[{}] {} | {} | ",
            now.format(&self.date_format),
            self.title,
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Severity names accepted in config. `log` is an alias for `info`.
fn level_directive(level: &str) -> &str {
    if level.eq_ignore_ascii_case("log") {
        "info"
    } else {
        level
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
/// Calling this twice keeps the first subscriber.
pub fn init(title: &str, logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(&logging.level)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(TemplateFormat::new(title, &logging.date_format))
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging was already initialised");
    }
}
