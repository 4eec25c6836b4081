//! # Lifecycle Events Module / 生命周期事件模块
//!
//! The runner reports its progress as four lifecycle events. They arrive as JSON
//! lines, are parsed on a reader task and handed over a channel to a single
//! consumer, [`dispatch`], which drives an [`EventListener`] strictly in order.
//!
//! 运行器通过四种生命周期事件报告进度。事件以 JSON 行的形式到达，
//! 在读取任务中解析后通过通道交给唯一的消费者 [`dispatch`]，
//! 由它严格按顺序驱动 [`EventListener`]。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use crate::core::models::AssertionResults;
use crate::infra::shutdown::ExitDecision;

/// How many parsed events may queue up ahead of the consumer.
const EVENT_BUFFER: usize = 256;

/// One event emitted by the runner.
/// 运行器发出的一个事件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// A test module is about to run. Precedes every test event of that module.
    /// 测试模块即将运行。先于该模块的所有测试事件。
    ModuleStart { name: String },
    /// A test started and may now complete at any later point.
    /// 测试已开始，之后随时可能完成。
    TestStart { name: String },
    /// A test signaled completion.
    /// 测试发出了完成信号。
    TestDone {
        name: String,
        #[serde(default)]
        outcome: AssertionResults,
    },
    /// Every scheduled test has reported. `summary` may be left out, in which case
    /// the reporter falls back to what it accumulated itself.
    /// 所有计划的测试都已报告。`summary` 可以省略，此时报告器使用自己累计的结果。
    Done {
        #[serde(default)]
        summary: Option<AssertionResults>,
    },
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read runner events: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventReceiver = mpsc::Receiver<Result<LifecycleEvent, EventError>>;

/// Receives lifecycle events, one call per event, in arrival order.
///
/// `done` and `stream_closed` are terminal: after either returns, no further
/// method is invoked.
///
/// 按到达顺序接收生命周期事件，每个事件调用一次。
/// `done` 和 `stream_closed` 是终止调用：任一返回后不再调用其他方法。
pub trait EventListener {
    fn module_start(&mut self, name: &str) -> Result<()>;

    fn test_start(&mut self, name: &str) -> Result<()>;

    fn test_done(&mut self, name: &str, outcome: &AssertionResults) -> Result<()>;

    /// Final event of a normal run.
    fn done(&mut self, summary: Option<&AssertionResults>) -> Result<ExitDecision>;

    /// The runner went away without sending `done`.
    fn stream_closed(&mut self) -> Result<ExitDecision>;
}

/// Parses JSON lines from `reader` on a background task.
///
/// Blank lines are skipped. The first malformed line or read error is sent as an
/// `Err` and ends the stream.
///
/// 在后台任务中从 `reader` 解析 JSON 行。跳过空行。
/// 第一个格式错误的行或读取错误会作为 `Err` 发送并结束事件流。
pub fn spawn_reader<R>(reader: R) -> EventReceiver
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut line_no = 0;

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(EventError::Io(e))).await;
                    break;
                }
            };
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<LifecycleEvent>(&line)
                .map_err(|source| EventError::Malformed { line: line_no, source });
            let failed = parsed.is_err();
            if tx.send(parsed).await.is_err() || failed {
                break;
            }
        }
        tracing::debug!(lines = line_no, "runner event stream ended");
    });

    rx
}

/// Feeds every received event to `listener` until `done` or the end of the stream.
///
/// 将收到的每个事件交给 `listener`，直到 `done` 或事件流结束。
pub async fn dispatch<L: EventListener>(
    mut events: EventReceiver,
    listener: &mut L,
) -> Result<ExitDecision> {
    while let Some(event) = events.recv().await {
        match event? {
            LifecycleEvent::ModuleStart { name } => listener.module_start(&name)?,
            LifecycleEvent::TestStart { name } => listener.test_start(&name)?,
            LifecycleEvent::TestDone { name, outcome } => listener.test_done(&name, &outcome)?,
            LifecycleEvent::Done { summary } => return listener.done(summary.as_ref()),
        }
    }
    listener.stream_closed()
}
