//! # Shutdown Module / 关闭模块
//!
//! The reporter ends a run in one of two ways. A graceful exit waits a short,
//! fixed delay so buffered output can drain, runs the post-run work (coverage)
//! and returns the status to `main`. An immediate exit terminates the process
//! on the spot and is reserved for tests that never finished.
//!
//! 报告器以两种方式之一结束运行。优雅退出会等待一个短暂的固定延迟，
//! 让缓冲输出刷新，然后执行运行后的工作（覆盖率）并将状态返回给 `main`。
//! 立即退出会当场终止进程，仅用于从未完成的测试。

use std::future::Future;
use std::io::Write;
use std::time::Duration;

/// Delay before a graceful exit, giving piped stdout time to drain.
///
/// 优雅退出前的延迟。
pub const FLUSH_DELAY: Duration = Duration::from_millis(10);

/// Largest status a process can report on every platform we run on.
const MAX_EXIT_STATUS: usize = 255;

/// How a run must end and with which code.
/// 运行必须以何种方式结束以及使用哪个退出码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Normal completion. `code` is the failed-assertion count.
    /// 正常完成。`code` 为失败断言的数量。
    Graceful { code: usize },
    /// Unfinished tests were detected. `code` is the unfinished-test count.
    /// 检测到未完成的测试。`code` 为未完成测试的数量。
    Immediate { code: usize },
}

impl ExitDecision {
    pub fn code(&self) -> usize {
        match self {
            ExitDecision::Graceful { code } | ExitDecision::Immediate { code } => *code,
        }
    }
}

/// Converts a count into a process status.
///
/// Counts above 255 saturate instead of wrapping, so that 256 failures can never
/// be reported as status 0.
///
/// 将计数转换为进程状态。超过 255 的计数会饱和而不是回绕。
pub fn exit_status(count: usize) -> u8 {
    count.min(MAX_EXIT_STATUS) as u8
}

/// Terminates the process right away, skipping the flush delay and any post-run work.
///
/// 立即终止进程，跳过刷新延迟和所有运行后的工作。
pub fn terminate_now(code: usize) -> ! {
    let _ = std::io::stdout().flush();
    std::process::exit(i32::from(exit_status(code)))
}

/// Waits [`FLUSH_DELAY`] once, runs `after_delay`, then hands back the process status for `main`.
///
/// 等待一次 [`FLUSH_DELAY`]，运行 `after_delay`，然后返回 `main` 使用的状态。
pub async fn graceful<F, Fut>(code: usize, after_delay: F) -> u8
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::time::sleep(FLUSH_DELAY).await;
    after_delay().await;
    exit_status(code)
}

/// Carries out `decision`. Only returns for graceful exits.
pub async fn execute<F, Fut>(decision: ExitDecision, after_delay: F) -> u8
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    match decision {
        ExitDecision::Immediate { code } => terminate_now(code),
        ExitDecision::Graceful { code } => graceful(code, after_delay).await,
    }
}
