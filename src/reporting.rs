//! # Reporting Module / 报告模块
//!
//! Turns lifecycle events into console output and coverage data into an HTML
//! report plus a one-line total.
//!
//! 将生命周期事件转换为控制台输出，并将覆盖率数据转换为 HTML 报告和一行总计。

pub mod console;
pub mod coverage;
pub mod formatter;

pub use console::ConsoleReporter;
pub use formatter::Formatter;
