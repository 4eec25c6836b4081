//! # Tracker Module / 跟踪器模块
//!
//! Keeps the set of tests that have started but not yet signaled completion.
//! Asynchronous tests may overlap freely, so the tracker is a set keyed by test
//! name that remembers insertion order, not a stack.
//!
//! 记录已开始但尚未发出完成信号的测试集合。
//! 异步测试可以任意重叠，因此跟踪器是一个按测试名称索引并保留插入顺序的集合，而不是栈。

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("test '{0}' is already pending")]
    AlreadyPending(String),
}

/// The pending-test set.
///
/// Every name maps to a monotonically increasing sequence number so that
/// [`Tracker::names`] can report in insertion order regardless of how removals interleave.
///
/// 待完成测试集合。每个名称映射到一个单调递增的序号，
/// 以便 [`Tracker::names`] 能按插入顺序报告。
#[derive(Debug, Default)]
pub struct Tracker {
    pending: HashMap<String, u64>,
    order: BTreeMap<u64, String>,
    next_seq: u64,
    exited: bool,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as pending.
    ///
    /// # Errors
    /// Returns [`TrackerError::AlreadyPending`] if the name is already pending;
    /// the existing registration is left untouched.
    pub fn put(&mut self, name: &str) -> Result<(), TrackerError> {
        if self.pending.contains_key(name) {
            return Err(TrackerError::AlreadyPending(name.to_string()));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(name.to_string(), seq);
        self.order.insert(seq, name.to_string());
        tracing::debug!(test = name, pending = self.pending.len(), "test started");
        Ok(())
    }

    /// Marks `name` as completed. Removing a name that is not pending is a no-op.
    /// Returns whether the name was pending.
    ///
    /// 将 `name` 标记为已完成。移除未挂起的名称不做任何操作。
    pub fn remove(&mut self, name: &str) -> bool {
        match self.pending.remove(name) {
            Some(seq) => {
                self.order.remove(&seq);
                tracing::debug!(test = name, pending = self.pending.len(), "test finished");
                true
            }
            None => {
                tracing::debug!(test = name, "completion for a test that was not pending");
                false
            }
        }
    }

    /// Number of tests still pending.
    pub fn unfinished(&self) -> usize {
        self.pending.len()
    }

    /// Pending names in the order they were registered.
    pub fn names(&self) -> Vec<&str> {
        self.order.values().map(String::as_str).collect()
    }

    /// Runs the exit hook against the current state.
    ///
    /// The hook fires at most once per tracker: the first call runs it and returns
    /// its value, every later call returns `None` without running anything.
    ///
    /// 针对当前状态运行退出钩子。每个跟踪器最多触发一次：
    /// 第一次调用运行钩子并返回其值，之后的调用返回 `None`。
    pub fn on_exit<T>(&mut self, hook: impl FnOnce(&Tracker) -> T) -> Option<T> {
        if self.exited {
            return None;
        }
        self.exited = true;
        Some(hook(self))
    }
}

/// Exit hook for embedders that do not render their own report.
/// Prints the pending names and returns the unfinished count, `None` when every test finished.
///
/// 供不渲染自身报告的嵌入者使用的退出钩子。
///
/// ```
/// use harness_reporter::tracker::{Tracker, default_exit_hook};
///
/// let mut tracker = Tracker::new();
/// tracker.put("db.connects").unwrap();
/// tracker.put("db.queries").unwrap();
/// tracker.remove("db.connects");
///
/// // Prints "db.queries" under the undone header.
/// let unfinished = tracker.on_exit(default_exit_hook).flatten();
/// assert_eq!(unfinished, Some(1));
/// ```
pub fn default_exit_hook(tracker: &Tracker) -> Option<usize> {
    if tracker.unfinished() == 0 {
        return None;
    }
    println!();
    println!("Undone tests (or their setups/teardowns): ");
    for name in tracker.names() {
        println!("{name}");
    }
    Some(tracker.unfinished())
}
