//! # Init Command Module / 初始化命令模块
//!
//! Implements `init`, which writes a `Reporter.toml` holding every default
//! so it can be edited in place.
//!
//! 实现 `init` 命令，写入包含所有默认值的 `Reporter.toml`，便于直接编辑。

use anyhow::{Context, Result, bail};
use colored::*;
use std::path::{Path, PathBuf};

use crate::{
    core::config::{DEFAULT_CONFIG_FILE, ReporterConfig},
    infra::{fs::write_artifact, t},
};

const HEADER: &str = "# Reporter configuration / 报告器配置\n\n";

/// Writes the default configuration into `dir`. Refuses to overwrite unless `force` is set.
///
/// 将默认配置写入 `dir`。除非设置了 `force`，否则拒绝覆盖。
pub fn execute(dir: &Path, force: bool, locale: &str) -> Result<PathBuf> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    if path.exists() && !force {
        bail!("{}", t!("init.exists", locale = locale, path = path.display()));
    }

    let config = ReporterConfig {
        language: Some(locale.to_string()),
        ..ReporterConfig::default()
    };
    let body = toml::to_string_pretty(&config).context("Failed to serialize default configuration")?;
    write_artifact(&path, &format!("{HEADER}{body}"))?;

    println!(
        "{}",
        t!("init.created", locale = locale, path = path.display()).green()
    );
    Ok(path)
}
