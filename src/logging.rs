// Logging setup: human-readable console output, optional JSON file output,
// and a timing layer for spans marked with `on_close = true`.
use eyre::{Result, WrapErr};
use std::env;
use std::fs;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::field::{Field, Visit};
use tracing::{Id, Subscriber, debug, span};
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Context, Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(format!(
        "warn,ai_finance_dashboard={lvl},tower_http={lvl}",
        lvl = level
    ))
    .unwrap_or_else(|_| EnvFilter::new("warn,ai_finance_dashboard=info"))
}

/// Installs the global subscriber. `bin_name` prefixes the log file name.
pub fn init_logging(bin_name: &str) -> Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_to_file = env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false);

    let console_layer = fmt::Layer::new()
        .pretty()
        .with_filter(filter_for(&console_log_level));

    let file_layer = if log_to_file {
        let log_dir = std::path::Path::new("logs");
        fs::create_dir_all(log_dir).wrap_err("Failed to create log directory")?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = format!("{}_{}.log", bin_name, timestamp);

        let (non_blocking, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));
        FILE_GUARD.set(guard).ok();

        Some(
            fmt::Layer::new()
                .json()
                .with_writer(non_blocking)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(filter_for(&file_log_level)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(SpanTimingLayer)
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;

    Ok(())
}

/// Reports busy and idle time for spans that opt in with `on_close = true`.
struct SpanTimingLayer;

struct SpanTimings {
    started: Instant,
    last_transition: Instant,
    busy: Duration,
    idle: Duration,
}

impl SpanTimings {
    fn new() -> Self {
        let now = Instant::now();
        Self { started: now, last_transition: now, busy: Duration::ZERO, idle: Duration::ZERO }
    }

    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_transition);
        self.last_transition = now;
        elapsed
    }
}

#[derive(Default)]
struct OnCloseFlag(bool);

impl Visit for OnCloseFlag {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "on_close" {
            self.0 = value;
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> Layer<S> for SpanTimingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut flag = OnCloseFlag::default();
        attrs.record(&mut flag);
        if !flag.0 {
            return;
        }
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanTimings::new());
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(timings) = span.extensions_mut().get_mut::<SpanTimings>() {
                let idle = timings.lap();
                timings.idle += idle;
            }
        }
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(timings) = span.extensions_mut().get_mut::<SpanTimings>() {
                let busy = timings.lap();
                timings.busy += busy;
            }
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else { return };
        let Some(timings) = span.extensions_mut().remove::<SpanTimings>() else { return };
        debug!(
            span = span.name(),
            busy_time = ?timings.busy,
            idle_time = ?timings.idle,
            total_time = ?timings.started.elapsed(),
            "span closed"
        );
    }
}
