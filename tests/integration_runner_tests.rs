//! Spawned runner commands. These use `sh`, so they only run on Unix.
#![cfg(unix)]

use predicates::prelude::*;

mod common;
use common::*;

/// The runner receives the resolved inputs as extra arguments and its stdout
/// is reported like stdin would be.
///
/// 运行器将解析后的输入作为额外参数接收，其 stdout 的报告方式与标准输入相同。
#[test]
fn test_runner_receives_inputs() {
    let dir = workspace();
    let script = r#"
for f in "$@"; do
  name=$(basename "$f")
  printf '{"event":"moduleStart","name":"%s"}\n' "$name"
  printf '{"event":"testStart","name":"%s.t"}\n' "$name"
  printf '{"event":"testDone","name":"%s.t","outcome":{"assertions":[{}]}}\n' "$name"
done
printf '{"event":"done","summary":{"assertions":[{},{}],"duration_ms":3}}\n'
"#;
    write_file(dir.path(), "runner.sh", script);

    reporter(dir.path())
        .args(["--runner", "sh runner.sh", "test/one.js", "test/two.js"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\none.js\n✔ one.js.t\n"))
        .stdout(predicate::str::contains("\ntwo.js\n✔ two.js.t\n"))
        .stdout(predicate::str::contains("OK: 2 assertions (3ms)"));
}

/// A runner that hangs after starting a test is killed once the watchdog fires.
#[test]
fn test_hanging_runner_reports_unfinished() {
    let dir = workspace();
    write_file(
        dir.path(),
        "runner.sh",
        "printf '{\"event\":\"testStart\",\"name\":\"stuck\"}\\n'\nexec 1>&- 2>&-\nsleep 30\n",
    );

    reporter(dir.path())
        .args(["--runner", "sh runner.sh"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("- stuck"));
}

/// A runner that keeps its stdout open after `done` is killed after a short
/// grace period instead of holding the run open.
#[test]
fn test_lingering_runner_does_not_block_exit() {
    let dir = workspace();
    write_file(
        dir.path(),
        "runner.sh",
        "printf '{\"event\":\"testStart\",\"name\":\"t\"}\\n'\n\
         printf '{\"event\":\"testDone\",\"name\":\"t\",\"outcome\":{\"assertions\":[{}]}}\\n'\n\
         printf '{\"event\":\"done\"}\\n'\n\
         exec sleep 30\n",
    );

    reporter(dir.path())
        .args(["--runner", "sh runner.sh"])
        .timeout(std::time::Duration::from_secs(15))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("OK: 1 assertions ("));
}

#[test]
fn test_missing_runner_program_is_an_error() {
    let dir = workspace();

    reporter(dir.path())
        .args(["--runner", "definitely-not-a-real-runner-binary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to start runner command"));
}

#[test]
fn test_empty_runner_command_is_an_error() {
    let dir = workspace();

    reporter(dir.path())
        .args(["--runner", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("runner command is empty"));
}
