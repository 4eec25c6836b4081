//! # Core Module / 核心模块
//!
//! Result models, the completion tracker, the lifecycle event stream and the
//! reporter configuration.
//!
//! 结果模型、完成跟踪器、生命周期事件流和报告器配置。

pub mod config;
pub mod events;
pub mod models;
pub mod tracker;

pub use config::ReporterConfig;
pub use events::{EventListener, LifecycleEvent};
pub use models::{AssertionResult, AssertionResults, TestError};
pub use tracker::Tracker;
