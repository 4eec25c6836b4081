//! # Harness Reporter Library / Harness Reporter 库
//!
//! The result-reporting side of a test harness. A runner emits lifecycle events;
//! this library tracks which tests are still pending, prints progressive
//! console output, decides the exit status, and aggregates line coverage.
//!
//! 测试框架的结果报告部分。运行器发出生命周期事件；
//! 此库跟踪仍在挂起的测试，逐步打印控制台输出，决定退出状态，并汇总行覆盖率。
//!
//! ## Modules / 模块
//!
//! - `core` - Result models, the completion tracker, lifecycle events, configuration
//! - `infra` - Logging, shutdown handling and file system helpers
//! - `reporting` - Output formatting, the console reporter and coverage
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 结果模型、完成跟踪器、生命周期事件、配置
//! - `infra` - 日志、关闭处理和文件系统辅助
//! - `reporting` - 输出格式化、控制台报告器和覆盖率
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

pub use core::{config, models, tracker};

/// Picks the language used for messages.
///
/// An explicit request wins, otherwise the system locale is used. The full
/// locale (e.g. "zh-CN") is tried first, then its language part (e.g. "en" from
/// "en-US"), and finally the default language ("en").
///
/// 选择消息使用的语言。显式请求优先，否则使用系统语言环境。
/// 先尝试完整语言环境，然后是语言部分，最后回退到默认语言（"en"）。
pub fn resolve_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

rust_i18n::i18n!("locales", fallback = "en");
