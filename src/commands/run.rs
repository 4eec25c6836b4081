//! # Run Command Module / 运行命令模块
//!
//! Implements `run`: reads lifecycle events either from stdin or from a spawned
//! runner, reports them on the console, and once the run ends gracefully
//! aggregates coverage before handing the exit status back to `main`.
//!
//! 实现 `run` 命令：从标准输入或启动的运行器读取生命周期事件，在控制台报告，
//! 运行正常结束后汇总覆盖率，然后将退出状态交还给 `main`。

use anyhow::{Context, Result};
use colored::*;
use std::{
    env, io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::process::{Child, Command};

use crate::{
    core::{
        config::{CoverageOptions, resolve_config},
        events::{EventReceiver, dispatch, spawn_reader},
    },
    infra::{
        fs::resolve_inputs,
        shutdown::{self, ExitDecision},
        t,
    },
    reporting::{
        console::ConsoleReporter,
        coverage::{CoverageSnapshot, aggregate, write_report, write_summary},
        formatter::Formatter,
    },
    resolve_locale,
};

/// How long a runner may keep running after it reported `done`.
const RUNNER_GRACE: Duration = Duration::from_secs(2);

/// Arguments of the `run` command.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub files: Vec<PathBuf>,
    pub runner: Option<String>,
    pub config: Option<PathBuf>,
    pub coverage: Option<PathBuf>,
    pub no_color: bool,
    /// Language requested on the command line. Wins over the configured one.
    pub lang: Option<String>,
}

/// Executes the run command and returns the process status.
///
/// Unfinished tests end the process from inside this function; every other
/// outcome returns normally.
///
/// 执行运行命令并返回进程状态。
/// 未完成的测试会在此函数内部直接结束进程；其他结果均正常返回。
pub async fn execute(args: RunArgs) -> Result<u8> {
    let cwd = env::current_dir().context("Failed to determine the working directory")?;
    let config = resolve_config(args.config.as_deref(), &cwd)?;
    let locale = resolve_locale(args.lang.as_deref().or(config.language.as_deref()));
    rust_i18n::set_locale(&locale);

    if args.no_color {
        colored::control::set_override(false);
    }
    // Honors NO_COLOR, CLICOLOR and CLICOLOR_FORCE as well as the terminal check.
    let format = if colored::control::SHOULD_COLORIZE.should_colorize() {
        config.format.clone()
    } else {
        config.format.clone().without_color()
    };

    let inputs = resolve_inputs(&args.files, &cwd);
    let (events, mut runner) = open_event_source(args.runner.as_deref(), &inputs, &locale)?;

    let mut reporter = ConsoleReporter::new(io::stdout(), Formatter::new(format), &locale);
    let decision = dispatch(events, &mut reporter).await?;
    tracing::debug!(?decision, "reporting finished");

    if let (ExitDecision::Immediate { .. }, Some(child)) = (decision, runner.as_mut()) {
        // The process exits without running destructors, so kill_on_drop never fires.
        let _ = child.start_kill();
    }

    let coverage = args.coverage;
    let status = shutdown::execute(decision, move || async move {
        if let Some(mut child) = runner {
            wait_for_runner(&mut child).await;
        }
        if let Some(snapshot) = coverage {
            report_coverage(&snapshot, &config.coverage, &cwd, &locale);
        }
    })
    .await;

    Ok(status)
}

/// Opens the event stream: the runner's stdout when a runner command is given, stdin otherwise.
///
/// 打开事件流：指定了运行器命令时为其 stdout，否则为标准输入。
fn open_event_source(
    runner: Option<&str>,
    inputs: &[PathBuf],
    locale: &str,
) -> Result<(EventReceiver, Option<Child>)> {
    let Some(command) = runner else {
        if !inputs.is_empty() {
            tracing::warn!("{}", t!("run.inputs_ignored", locale = locale));
        }
        return Ok((spawn_reader(tokio::io::stdin()), None));
    };

    let mut child = spawn_runner(command, inputs, locale)?;
    let stdout = child
        .stdout
        .take()
        .context("Runner stdout was not captured")?;
    Ok((spawn_reader(stdout), Some(child)))
}

/// Spawns the runner with the resolved inputs appended to its own arguments.
fn spawn_runner(command: &str, inputs: &[PathBuf], locale: &str) -> Result<Child> {
    let parts = shlex::split(command).unwrap_or_default();
    let (program, program_args) = parts
        .split_first()
        .with_context(|| t!("run.runner_invalid", locale = locale, command = command).to_string())?;

    tracing::debug!(program = %program, inputs = inputs.len(), "spawning runner");

    Command::new(program)
        .args(program_args)
        .args(inputs)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| t!("run.runner_failed", locale = locale, command = command).to_string())
}

/// Gives the runner [`RUNNER_GRACE`] to exit on its own, then kills it.
async fn wait_for_runner(child: &mut Child) {
    match tokio::time::timeout(RUNNER_GRACE, child.wait()).await {
        Ok(Ok(status)) => tracing::debug!(%status, "runner exited"),
        Ok(Err(e)) => tracing::warn!(error = %e, "failed to wait for runner"),
        Err(_) => {
            tracing::warn!("runner still alive after reporting done, killing it");
            let _ = child.start_kill();
        }
    }
}

/// Aggregates the coverage snapshot, writes the HTML report and prints the total.
/// A failure here is reported but never changes the exit status.
///
/// 汇总覆盖率快照，写入 HTML 报告并打印总计。此处的失败会被报告，但不会改变退出状态。
fn report_coverage(snapshot: &Path, options: &CoverageOptions, cwd: &Path, locale: &str) {
    let snapshot_path = cwd.join(snapshot);
    if !snapshot_path.is_file() {
        tracing::warn!(
            "{}",
            t!("coverage.snapshot_missing", locale = locale, path = snapshot_path.display())
        );
        return;
    }

    let result = CoverageSnapshot::load(&snapshot_path).and_then(|snapshot| {
        let report = aggregate(&snapshot, cwd, &options.exclude_dirs);
        let written = write_report(&report, options, cwd)?;
        write_summary(&mut io::stdout().lock(), &report, locale)?;
        Ok(written)
    });

    match result {
        Ok(written) => tracing::info!(
            "{}",
            t!("coverage.written", locale = locale, path = written.display())
        ),
        Err(e) => eprintln!("{} {:#}", t!("coverage.failed", locale = locale).red(), e),
    }
}
