/*!
 * Structured Tracing
 * Subscriber setup and timed spans around simulation commands
 *
 * Logs always go to stderr; stdout is reserved for simulation output.
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Set to `1` or `true` for JSON log lines
pub const TRACE_JSON_ENV: &str = "FRAGSIM_TRACE_JSON";

/// Commands slower than this are reported at warn level
const SLOW_COMMAND_MICROS: u128 = 1_000;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FRAGSIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Tracing initialized");
    }
}

/// Timed span around one simulation command
pub struct CommandSpan {
    span: tracing::Span,
    start: Instant,
    command: &'static str,
}

impl CommandSpan {
    pub fn new(command: &'static str, variant: Option<&str>) -> Self {
        let span = span!(
            Level::DEBUG,
            "command",
            command = command,
            variant = variant,
            result = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            command,
        }
    }

    pub fn record_result(&self, result: &'static str) {
        self.span.record("result", result);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CommandSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_micros();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration);

        if duration > SLOW_COMMAND_MICROS {
            warn!(command = self.command, duration_us = duration, slow = true, "slow command");
        } else {
            debug!(command = self.command, duration_us = duration, "command completed");
        }
    }
}

#[inline]
pub fn span_command(command: &'static str, variant: Option<&str>) -> CommandSpan {
    CommandSpan::new(command, variant)
}
