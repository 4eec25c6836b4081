//! # Console Reporting Module / 控制台报告模块
//!
//! The reporter pipeline. [`ConsoleReporter`] listens to the runner's lifecycle
//! events, keeps the [`Tracker`] up to date, prints progressive per-module and
//! per-test output, and decides how the run ends.
//!
//! Tests that started but never signaled completion take priority over
//! everything else: as soon as the run's final signal is seen with tests still
//! pending, they are listed and the run ends immediately with the number of
//! unfinished tests as its status, whatever the assertion results were.
//!
//! 报告器管道。[`ConsoleReporter`] 监听运行器的生命周期事件，维护 [`Tracker`]，
//! 逐步打印每个模块和每个测试的输出，并决定运行如何结束。
//!
//! 已开始但从未发出完成信号的测试优先于其他一切：一旦在仍有挂起测试时
//! 收到运行的最终信号，就会列出这些测试，并立即以未完成测试的数量作为状态结束运行。

use anyhow::{Result, bail};
use std::io::Write;
use std::time::Instant;

use crate::core::{
    events::EventListener,
    models::{AssertionResults, RunSummary},
    tracker::Tracker,
};
use crate::infra::{shutdown::ExitDecision, t};
use crate::reporting::formatter::Formatter;

pub struct ConsoleReporter<W: Write> {
    out: W,
    formatter: Formatter,
    tracker: Tracker,
    summary: RunSummary,
    started: Instant,
    locale: String,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, formatter: Formatter, locale: &str) -> Self {
        Self {
            out,
            formatter,
            tracker: Tracker::new(),
            summary: RunSummary::default(),
            started: Instant::now(),
            locale: locale.to_string(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Totals accumulated from the `testDone` events seen so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Fires the tracker's exit hook. Returns an immediate exit when tests are still pending.
    ///
    /// 触发跟踪器的退出钩子。如果仍有挂起的测试，则返回立即退出。
    fn watchdog(&mut self) -> Result<Option<ExitDecision>> {
        let out = &mut self.out;
        let fmt = &self.formatter;
        let locale = self.locale.as_str();

        let fired = self.tracker.on_exit(|tracker| -> std::io::Result<Option<ExitDecision>> {
            if tracker.unfinished() == 0 {
                return Ok(None);
            }
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                fmt.error(&fmt.bold(&t!("tracker.undone_header", locale = locale)))
            )?;
            for name in tracker.names() {
                writeln!(out, "- {name}")?;
            }
            writeln!(out)?;
            writeln!(out, "{}", t!("tracker.undone_hint", locale = locale))?;
            out.flush()?;
            Ok(Some(ExitDecision::Immediate {
                code: tracker.unfinished(),
            }))
        });

        Ok(fired.transpose()?.flatten())
    }
}

impl<W: Write> EventListener for ConsoleReporter<W> {
    fn module_start(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "\n{}", self.formatter.bold(name))?;
        Ok(())
    }

    fn test_start(&mut self, name: &str) -> Result<()> {
        if let Err(e) = self.tracker.put(name) {
            tracing::warn!(error = %e, "ignoring repeated start event");
        }
        Ok(())
    }

    fn test_done(&mut self, name: &str, outcome: &AssertionResults) -> Result<()> {
        self.tracker.remove(name);
        self.summary.record(outcome);

        if outcome.failures() == 0 {
            writeln!(self.out, "✔ {name}")?;
            return Ok(());
        }

        writeln!(self.out, "{}\n", self.formatter.error(&format!("✖ {name}")))?;
        for assertion in outcome.failed() {
            if let Some(message) = assertion.assertion_message() {
                writeln!(
                    self.out,
                    "{}{}",
                    t!("report.assertion_message", locale = self.locale.as_str()),
                    self.formatter.assertion_message(message)
                )?;
            }
            let detail = assertion.error.as_ref().map(|e| e.detail()).unwrap_or_default();
            writeln!(self.out, "{detail}\n")?;
        }
        Ok(())
    }

    fn done(&mut self, summary: Option<&AssertionResults>) -> Result<ExitDecision> {
        if let Some(decision) = self.watchdog()? {
            return Ok(decision);
        }

        let elapsed = self.started.elapsed();
        let (total, failures, duration) = match summary {
            Some(s) => (s.len(), s.failures(), s.duration().unwrap_or(elapsed)),
            None => (self.summary.assertions, self.summary.failures, elapsed),
        };
        tracing::debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            accumulated_failures = self.summary.failures,
            "run finished"
        );

        let locale = self.locale.as_str();
        let ms = duration.as_millis();
        if failures > 0 {
            writeln!(
                self.out,
                "\n{}{}",
                self.formatter
                    .bold(&self.formatter.error(&t!("report.failures_label", locale = locale))),
                t!(
                    "report.failures_summary",
                    locale = locale,
                    failures = failures,
                    total = total,
                    duration = ms
                )
            )?;
        } else {
            writeln!(
                self.out,
                "\n{}{}",
                self.formatter
                    .bold(&self.formatter.ok(&t!("report.ok_label", locale = locale))),
                t!("report.ok_summary", locale = locale, total = total, duration = ms)
            )?;
        }
        self.out.flush()?;

        Ok(ExitDecision::Graceful { code: failures })
    }

    fn stream_closed(&mut self) -> Result<ExitDecision> {
        if let Some(decision) = self.watchdog()? {
            return Ok(decision);
        }
        self.out.flush()?;
        bail!("{}", t!("report.no_summary", locale = self.locale.as_str()))
    }
}
