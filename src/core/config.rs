//! # Configuration Module / 配置模块
//!
//! Loads the reporter configuration. The main file is `Reporter.toml`; a `.json`
//! path is read as a flat object of the eight decoration options instead.
//!
//! 加载报告器配置。主配置文件为 `Reporter.toml`；
//! `.json` 路径则按包含八个装饰选项的扁平对象读取。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Reporter.toml";

/// Prefix/suffix pairs wrapped around decorated output.
/// Any option left out of the configuration falls back to [`FormatOptions::ansi`].
///
/// 包裹在装饰输出周围的前缀/后缀对。
/// 配置中未提供的选项回退到 [`FormatOptions::ansi`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub error_prefix: String,
    pub error_suffix: String,
    pub ok_prefix: String,
    pub ok_suffix: String,
    pub bold_prefix: String,
    pub bold_suffix: String,
    pub assertion_prefix: String,
    pub assertion_suffix: String,
}

impl FormatOptions {
    /// Terminal colors: red errors, green ok, bold, magenta assertion messages.
    pub fn ansi() -> Self {
        Self {
            error_prefix: "\u{1b}[31m".to_string(),
            error_suffix: "\u{1b}[39m".to_string(),
            ok_prefix: "\u{1b}[32m".to_string(),
            ok_suffix: "\u{1b}[39m".to_string(),
            bold_prefix: "\u{1b}[1m".to_string(),
            bold_suffix: "\u{1b}[22m".to_string(),
            assertion_prefix: "\u{1b}[35m".to_string(),
            assertion_suffix: "\u{1b}[39m".to_string(),
        }
    }

    /// No decoration at all.
    pub fn plain() -> Self {
        Self {
            error_prefix: String::new(),
            error_suffix: String::new(),
            ok_prefix: String::new(),
            ok_suffix: String::new(),
            bold_prefix: String::new(),
            bold_suffix: String::new(),
            assertion_prefix: String::new(),
            assertion_suffix: String::new(),
        }
    }
}

impl FormatOptions {
    /// Blanks every option still holding its ANSI default, keeping explicit
    /// (e.g. HTML) decorations. Used when color output is disabled.
    ///
    /// 将仍为 ANSI 默认值的选项置空，保留显式配置的装饰（例如 HTML）。
    pub fn without_color(self) -> Self {
        let ansi = Self::ansi();
        let keep = |value: String, default: &str| {
            if value == default { String::new() } else { value }
        };
        Self {
            error_prefix: keep(self.error_prefix, &ansi.error_prefix),
            error_suffix: keep(self.error_suffix, &ansi.error_suffix),
            ok_prefix: keep(self.ok_prefix, &ansi.ok_prefix),
            ok_suffix: keep(self.ok_suffix, &ansi.ok_suffix),
            bold_prefix: keep(self.bold_prefix, &ansi.bold_prefix),
            bold_suffix: keep(self.bold_suffix, &ansi.bold_suffix),
            assertion_prefix: keep(self.assertion_prefix, &ansi.assertion_prefix),
            assertion_suffix: keep(self.assertion_suffix, &ansi.assertion_suffix),
        }
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Settings for the coverage report.
/// 覆盖率报告的设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageOptions {
    /// Where the HTML artifact is written, relative to the working directory.
    /// HTML 报告的写入位置，相对于工作目录。
    pub output: PathBuf,
    /// A custom template containing the `{{FILES}}` token. The built-in template is used when unset.
    /// 包含 `{{FILES}}` 标记的自定义模板。未设置时使用内置模板。
    pub template: Option<PathBuf>,
    /// Directory names whose contents are never reported (dependency trees).
    /// 其内容永不报告的目录名（依赖目录树）。
    pub exclude_dirs: Vec<String>,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from("coverage.html"),
            template: None,
            exclude_dirs: vec!["node_modules".to_string()],
        }
    }
}

/// The complete reporter configuration.
/// 完整的报告器配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Language for messages (e.g. "en", "zh-CN"). Detected from the system when unset.
    /// 消息语言（例如 "en", "zh-CN"）。未设置时从系统检测。
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub format: FormatOptions,
    #[serde(default)]
    pub coverage: CoverageOptions,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            language: None,
            format: FormatOptions::default(),
            coverage: CoverageOptions::default(),
        }
    }
}

/// Loads the configuration at `path`.
///
/// Paths ending in `.json` are parsed as a bare [`FormatOptions`] object, anything
/// else as a TOML [`ReporterConfig`].
///
/// 加载 `path` 处的配置。以 `.json` 结尾的路径按 [`FormatOptions`] 对象解析，
/// 其他路径按 TOML 格式的 [`ReporterConfig`] 解析。
pub fn load_config(path: &Path) -> Result<ReporterConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let format: FormatOptions = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON options: {}", path.display()))?;
        return Ok(ReporterConfig {
            format,
            ..ReporterConfig::default()
        });
    }

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}

/// Loads `path` if given, otherwise `Reporter.toml` when it exists in `cwd`,
/// otherwise the defaults.
pub fn resolve_config(path: Option<&Path>, cwd: &Path) -> Result<ReporterConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = cwd.join(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                load_config(&default_path)
            } else {
                Ok(ReporterConfig::default())
            }
        }
    }
}
