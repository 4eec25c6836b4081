//! # File System Operations Module / 文件系统操作模块
//!
//! Path resolution for the runner's input files and writing of report artifacts.
//!
//! 运行器输入文件的路径解析以及报告文件的写入。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves every input path against `cwd`. Absolute paths are kept as they are.
/// The paths are not checked for existence; the runner decides what they mean.
///
/// 将每个输入路径相对于 `cwd` 解析。绝对路径保持不变。
/// 不检查路径是否存在；由运行器决定其含义。
pub fn resolve_inputs(files: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    files.iter().map(|p| cwd.join(p)).collect()
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_inputs_joins_relative_paths() {
        let cwd = Path::new("/work/project");
        let inputs = vec![PathBuf::from("test/a.js"), PathBuf::from("/abs/b.js")];
        let resolved = resolve_inputs(&inputs, cwd);
        assert_eq!(
            resolved,
            vec![
                PathBuf::from("/work/project/test/a.js"),
                PathBuf::from("/abs/b.js")
            ]
        );
    }

    #[test]
    fn test_write_artifact_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/report.html");
        write_artifact(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
