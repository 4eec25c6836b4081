//! # Coverage Reporting Module / 覆盖率报告模块
//!
//! Aggregates per-line hit counters collected by an external instrumentation
//! tool into per-file and total coverage, and renders an HTML report with a
//! collapsible source listing per file.
//!
//! "Executable" lines are estimated with a heuristic: a line counts when its
//! trimmed text ends with `;`. This is a coarse approximation of what the
//! instrumentation actually tracks and is kept as such.
//!
//! 将外部插桩工具收集的逐行命中计数汇总为每个文件和总体的覆盖率，
//! 并渲染一个 HTML 报告，每个文件带有可折叠的源代码列表。
//!
//! “可执行”行通过启发式方法估算：去除首尾空白后以 `;` 结尾的行计入。
//! 这是对插桩实际跟踪内容的粗略近似，并按原样保留。

use anyhow::{Context, Result, bail};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::core::config::CoverageOptions;
use crate::infra::{fs::write_artifact, t};

/// Token in the template that is replaced with the per-file markup.
pub const TEMPLATE_PLACEHOLDER: &str = "{{FILES}}";

/// Built-in report template.
const DEFAULT_TEMPLATE: &str = include_str!("assets/coverage.html");

/// Files with this many executable lines or fewer are counted in the totals but not rendered.
const MIN_RENDERED_LINES: usize = 1;

/// Hit counters captured at the end of a run: file path, then 1-based line number, then hit count.
///
/// 运行结束时捕获的命中计数：文件路径 → 从 1 开始的行号 → 命中次数。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageSnapshot {
    files: BTreeMap<PathBuf, BTreeMap<u32, u64>>,
}

impl CoverageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read coverage snapshot: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse coverage snapshot: {}", path.display()))
    }

    pub fn record(&mut self, file: impl Into<PathBuf>, line: u32, hits: u64) {
        self.files.entry(file.into()).or_default().insert(line, hits);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &BTreeMap<u32, u64>)> {
        self.files.iter()
    }
}

/// Coverage of one source file.
/// 单个源文件的覆盖率。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    /// Path relative to the working directory.
    pub name: String,
    /// Anchor id derived from `name`.
    pub id: String,
    pub executable: usize,
    /// Never larger than `executable`.
    pub covered: usize,
    pub total_lines: usize,
    html: String,
}

impl FileCoverage {
    pub fn percentage(&self) -> u32 {
        percentage(self.covered, self.executable)
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Coverage of every file considered in a run.
/// 一次运行中考虑的所有文件的覆盖率。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub files: Vec<FileCoverage>,
}

impl CoverageReport {
    pub fn total_executable(&self) -> usize {
        self.files.iter().map(|f| f.executable).sum()
    }

    pub fn total_covered(&self) -> usize {
        self.files.iter().map(|f| f.covered).sum()
    }

    pub fn total_percentage(&self) -> u32 {
        percentage(self.total_covered(), self.total_executable())
    }

    /// Files that get a section in the HTML report, largest first.
    pub fn rendered_files(&self) -> Vec<&FileCoverage> {
        let mut files: Vec<&FileCoverage> = self
            .files
            .iter()
            .filter(|f| f.executable > MIN_RENDERED_LINES)
            .collect();
        files.sort_by(|a, b| b.executable.cmp(&a.executable));
        files
    }
}

/// `round(covered / executable * 100)`, clamped to 100 and defined as 100 when
/// there is nothing to cover.
///
/// 覆盖率百分比，上限为 100；没有可覆盖的行时定义为 100。
pub fn percentage(covered: usize, executable: usize) -> u32 {
    if executable == 0 {
        return 100;
    }
    let covered = covered.min(executable);
    ((covered as f64 / executable as f64) * 100.0).round() as u32
}

pub fn is_executable(line: &str) -> bool {
    line.trim().ends_with(';')
}

/// Turns a relative path into an anchor id: runs of non-alphanumeric characters
/// become a single `-`, and leading or trailing `-` are dropped.
///
/// 将相对路径转换为锚点 id。
pub fn display_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            id.push(c);
            in_separator = false;
        } else if !in_separator {
            id.push('-');
            in_separator = true;
        }
    }
    id.trim_matches('-').to_string()
}

/// Returns the path of `file` relative to `cwd`, or `None` when the file lies
/// outside `cwd` or inside one of the excluded dependency directories.
///
/// `..` components are resolved lexically, so `../x.js` or `lib/../../x.js`
/// never count as inside `cwd`.
fn reportable_path(file: &Path, cwd: &Path, exclude_dirs: &[String]) -> Option<PathBuf> {
    let absolute = cwd.join(file);
    let mut relative = PathBuf::new();
    for component in absolute.strip_prefix(cwd).ok()?.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let excluded = relative.components().any(|c| match c {
        Component::Normal(part) => exclude_dirs.iter().any(|d| part == d.as_str()),
        _ => false,
    });
    if excluded || relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

/// Computes the coverage of a single file from its source text and hit counters.
///
/// 根据源代码文本和命中计数计算单个文件的覆盖率。
pub fn analyze_file(name: &str, source: &str, hits: &BTreeMap<u32, u64>) -> FileCoverage {
    let lines: Vec<&str> = source.lines().collect();
    let executable = lines.iter().filter(|l| is_executable(l)).count();
    let covered = hits.values().filter(|&&h| h > 0).count().min(executable);

    let mut file = FileCoverage {
        name: name.to_string(),
        id: display_id(name),
        executable,
        covered,
        total_lines: lines.len(),
        html: String::new(),
    };
    file.html = render_file(&file, &lines, hits).into_string();
    file
}

fn line_class(line_no: u32, text: &str, hits: &BTreeMap<u32, u64>) -> &'static str {
    if hits.get(&line_no).is_some_and(|&h| h > 0) {
        "covered"
    } else if is_executable(text) {
        "uncovered"
    } else {
        ""
    }
}

fn render_file(file: &FileCoverage, lines: &[&str], hits: &BTreeMap<u32, u64>) -> Markup {
    let pct = file.percentage();
    let toggle = format!(
        "var el = document.getElementById('{}'); el.style.display = el.style.display ? '' : 'none';",
        file.id
    );
    html! {
        div.file {
            a.filename href={ "#" (file.id) } name=(file.id) onclick=(toggle) { (file.name) }
            " "
            div.gauge style={ "width: " (pct * 3) "px" } {
                strong { (pct) "%" }
                " [" (file.executable) " to cover, " (file.total_lines) " total]"
            }
        }
        div id=(file.id) style="display:none;" {
            @for (i, text) in lines.iter().enumerate() {
                pre class=(line_class(i as u32 + 1, text, hits)) { (text) }
            }
        }
    }
}

/// Builds the report for every file of `snapshot` that lies inside `cwd`.
/// Files that cannot be read are skipped with a warning.
///
/// 为 `snapshot` 中位于 `cwd` 内的每个文件构建报告。无法读取的文件会被跳过并发出警告。
pub fn aggregate(snapshot: &CoverageSnapshot, cwd: &Path, exclude_dirs: &[String]) -> CoverageReport {
    let mut files = Vec::new();

    for (path, hits) in snapshot.files() {
        let Some(relative) = reportable_path(path, cwd, exclude_dirs) else {
            tracing::debug!(file = %path.display(), "skipping file outside the project");
            continue;
        };

        let source = match fs::read_to_string(cwd.join(&relative)) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(file = %relative.display(), error = %e, "cannot read instrumented source");
                continue;
            }
        };

        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(analyze_file(&name, &source, hits));
    }

    CoverageReport { files }
}

/// Substitutes the rendered files into `template`.
pub fn render_report(report: &CoverageReport, template: &str) -> Result<String> {
    if !template.contains(TEMPLATE_PLACEHOLDER) {
        bail!("Coverage template has no {} placeholder", TEMPLATE_PLACEHOLDER);
    }
    let body = report
        .rendered_files()
        .iter()
        .map(|f| f.html())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(template.replacen(TEMPLATE_PLACEHOLDER, &body, 1))
}

/// Renders the report with the configured template and writes it below `cwd`.
/// Returns the path that was written.
///
/// 使用配置的模板渲染报告并写入 `cwd` 下。返回写入的路径。
pub fn write_report(report: &CoverageReport, options: &CoverageOptions, cwd: &Path) -> Result<PathBuf> {
    let template = match &options.template {
        Some(path) => fs::read_to_string(cwd.join(path))
            .with_context(|| format!("Failed to read coverage template: {}", path.display()))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    let html = render_report(report, &template)?;
    let output = cwd.join(&options.output);
    write_artifact(&output, &html)?;
    Ok(output)
}

/// Prints the closing coverage line.
pub fn write_summary<W: Write>(
    out: &mut W,
    report: &CoverageReport,
    locale: &str,
) -> std::io::Result<()> {
    writeln!(out, "====================")?;
    writeln!(
        out,
        "{}",
        t!("coverage.total", locale = locale, percent = report.total_percentage())
    )
}
