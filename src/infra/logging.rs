//! # Logging Module / 日志模块
//!
//! Diagnostics go through `tracing` to stderr so they never interleave with the
//! report printed on stdout. The level is taken from `HARNESS_REPORTER_LOG`
//! (`warn` when unset).
//!
//! 诊断信息通过 `tracing` 输出到 stderr，不会与 stdout 上的报告交错。
//! 日志级别取自 `HARNESS_REPORTER_LOG`（未设置时为 `warn`）。

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub const LOG_ENV: &str = "HARNESS_REPORTER_LOG";

/// `LEVEL [HH:MM:SS]: message fields`
pub struct CompactFormatter;

impl<S, N> FormatEvent<S, N> for CompactFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = event.metadata().level();
        let timestamp = Local::now().format("%H:%M:%S");

        write!(writer, "{:>5} [{}]: ", level.as_str(), timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global subscriber. Calling it again is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(CompactFormatter)
        .try_init();
}
