//! # Infrastructure Module / 基础设施模块
//!
//! Logging, process shutdown, file system helpers and i18n re-exports.
//!
//! 日志、进程关闭、文件系统辅助以及国际化再导出。

pub mod fs;
pub mod logging;
pub mod shutdown;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
