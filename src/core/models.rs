//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures that flow from the test runner into
//! the reporter: individual assertion results, the outcome of one test, and the
//! summary accumulated over a whole run.
//!
//! 此模块定义了从测试运行器流入报告器的数据结构：
//! 单个断言结果、单个测试的结果以及整个运行期间累计的摘要。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classifies a failed assertion.
/// The classification is decided where the error is captured, never by looking
/// at the message text at report time.
///
/// 对失败的断言进行分类。
/// 分类在捕获错误时确定，而不是在报告时通过消息文本判断。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ErrorKind {
    /// An expected-vs-actual mismatch recorded by the assertion library.
    /// 断言库记录的预期值与实际值不匹配。
    Assertion {
        /// The human message attached to the assertion, if any.
        /// 附加在断言上的可读消息（如果有）。
        #[serde(default)]
        message: Option<String>,
        /// The compared values, when the assertion library reported them.
        /// 断言库报告的比较值（如果有）。
        #[serde(flatten)]
        comparison: Option<Comparison>,
    },
    /// An uncaught error raised while the test was running.
    /// 测试运行期间抛出的未捕获错误。
    Generic,
}

/// The operands of a failed comparison, as rendered by the assertion library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub actual: String,
    pub expected: String,
    #[serde(default = "default_operator")]
    pub operator: String,
}

fn default_operator() -> String {
    "==".to_string()
}

/// The error attached to a failed assertion.
/// 附加在失败断言上的错误。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    /// Stack trace or other detail text. The first line is the error headline.
    /// 堆栈跟踪或其他详细文本。第一行是错误标题。
    #[serde(default)]
    pub trace: String,
}

impl TestError {
    pub fn assertion(message: Option<&str>, trace: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Assertion {
                message: message.map(str::to_string),
                comparison: None,
            },
            trace: trace.into(),
        }
    }

    pub fn generic(trace: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Generic,
            trace: trace.into(),
        }
    }

    /// Attaches the compared operands to an assertion failure. Generic errors are returned unchanged.
    pub fn with_comparison(mut self, actual: &str, operator: &str, expected: &str) -> Self {
        if let ErrorKind::Assertion { comparison, .. } = &mut self.kind {
            *comparison = Some(Comparison {
                actual: actual.to_string(),
                expected: expected.to_string(),
                operator: operator.to_string(),
            });
        }
        self
    }

    /// Returns the assertion message, but only for assertion failures.
    /// Generic errors never expose a message here, even if their trace has one.
    ///
    /// 返回断言消息，但仅限断言失败。
    pub fn assertion_message(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Assertion { message, .. } => message.as_deref(),
            ErrorKind::Generic => None,
        }
    }

    /// Renders the detail text shown under a failed test.
    ///
    /// When the compared operands are known the headline of the trace is replaced by
    /// `AssertionError: <actual> <operator> <expected>`; operands that span several
    /// lines are put on lines of their own so they stay readable.
    ///
    /// 渲染失败测试下方显示的详细文本。
    /// 如果已知比较的操作数，则将跟踪的标题行替换为
    /// `AssertionError: <actual> <operator> <expected>`。
    pub fn detail(&self) -> String {
        let ErrorKind::Assertion {
            comparison: Some(cmp),
            ..
        } = &self.kind
        else {
            return self.trace.clone();
        };

        let multiline = cmp.actual.contains('\n') || cmp.expected.contains('\n');
        let spacing = if multiline { "\n" } else { " " };
        let headline = format!(
            "AssertionError:{spacing}{}{spacing}{}{spacing}{}",
            cmp.actual, cmp.operator, cmp.expected
        );

        let rest: Vec<&str> = self.trace.lines().skip(1).collect();
        if rest.is_empty() {
            headline
        } else {
            format!("{headline}\n{}", rest.join("\n"))
        }
    }
}

/// A single pass/fail check recorded by a test.
/// 测试记录的单个通过/失败检查。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// Optional label the test gave this assertion.
    #[serde(default)]
    pub message: Option<String>,
    /// Present only when the assertion failed.
    /// 仅在断言失败时存在。
    #[serde(default)]
    pub error: Option<TestError>,
}

impl AssertionResult {
    pub fn passed() -> Self {
        Self::default()
    }

    pub fn failed_with(error: TestError) -> Self {
        Self {
            message: error.assertion_message().map(str::to_string),
            error: Some(error),
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// The message to show for an assertion failure. Falls back to the assertion's
    /// own label when the error carries none. Always `None` for generic errors.
    ///
    /// 断言失败时显示的消息。通用错误始终返回 `None`。
    pub fn assertion_message(&self) -> Option<&str> {
        match &self.error {
            Some(TestError {
                kind: ErrorKind::Assertion { message, .. },
                ..
            }) => message.as_deref().or(self.message.as_deref()),
            _ => None,
        }
    }
}

/// An ordered list of assertion results together with the time they took.
/// This is both the outcome of one test and the summary of a whole run.
///
/// 有序的断言结果列表及其耗时。
/// 它既是单个测试的结果，也是整个运行的摘要。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResults {
    #[serde(default)]
    assertions: Vec<AssertionResult>,
    #[serde(default)]
    duration_ms: Option<u64>,
}

impl AssertionResults {
    pub fn new(assertions: Vec<AssertionResult>, duration: Duration) -> Self {
        Self {
            assertions,
            duration_ms: Some(duration.as_millis() as u64),
        }
    }

    /// Number of failed assertions.
    /// 失败断言的数量。
    pub fn failures(&self) -> usize {
        self.assertions.iter().filter(|a| a.failed()).count()
    }

    /// Total number of assertions.
    pub fn len(&self) -> usize {
        self.assertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Duration reported by the runner. `None` when the runner did not measure it.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter()
    }

    /// Iterates over the failed assertions only.
    pub fn failed(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| a.failed())
    }
}

impl<'a> IntoIterator for &'a AssertionResults {
    type Item = &'a AssertionResult;
    type IntoIter = std::slice::Iter<'a, AssertionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.assertions.iter()
    }
}

/// Totals accumulated across every test outcome observed in a run.
/// Only ever grows while the run is in progress.
///
/// 在一次运行中观察到的所有测试结果的累计总数。
/// 在运行期间只会增长。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub assertions: usize,
    pub failures: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &AssertionResults) {
        self.assertions += outcome.len();
        self.failures += outcome.failures();
    }
}
