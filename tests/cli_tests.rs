use assert_cmd::Command;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

mod common;
use common::*;

/// Two passing tests and a final summary of five assertions end with the
/// OK line and status 0.
///
/// 两个通过的测试和包含五个断言的最终摘要以 OK 行和状态 0 结束。
#[test]
fn test_successful_run() {
    let dir = workspace();
    let events = stream(&[
        module_start("suite"),
        test_start("suite.first"),
        test_start("suite.second"),
        test_done("suite.second", vec![pass(), pass()]),
        test_done("suite.first", vec![pass(), pass(), pass()]),
        done(vec![pass(); 5], 12),
    ]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\nsuite\n✔ suite.second\n✔ suite.first\n"))
        .stdout(predicate::str::contains("OK: 5 assertions (12ms)"))
        .stdout(predicate::str::contains("FAILURES").not());
}

/// A failed assertion prints its message and detail, and the status is the
/// number of failed assertions.
///
/// 失败的断言会打印其消息和详细信息，状态为失败断言的数量。
#[test]
fn test_failed_assertion() {
    let dir = workspace();
    let failure = assertion_failure("expected true", "AssertionError: false == true\n    at t.js:3:7");
    let events = stream(&[
        module_start("checks"),
        test_start("checks.truthy"),
        test_done("checks.truthy", vec![pass(), failure.clone()]),
        done(vec![pass(), failure], 4),
    ]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✖ checks.truthy\n\n"))
        .stdout(predicate::str::contains("Assertion Message: expected true\n"))
        .stdout(predicate::str::contains("AssertionError: false == true\n    at t.js:3:7\n\n"))
        .stdout(predicate::str::contains("FAILURES: 1/2 assertions failed (4ms)"));
}

/// Generic errors print their detail but never an assertion message.
#[test]
fn test_generic_error_has_no_assertion_message() {
    let dir = workspace();
    let failure = generic_failure("TypeError: x is undefined\n    at t.js:9:1");
    let events = stream(&[
        test_start("crash"),
        test_done("crash", vec![failure.clone()]),
        done(vec![failure], 0),
    ]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("TypeError: x is undefined"))
        .stdout(predicate::str::contains("Assertion Message").not());
}

/// A test that never completes is listed and the status is the number of
/// unfinished tests, even though other tests failed.
///
/// 从未完成的测试会被列出，状态为未完成测试的数量，即使其他测试失败了。
#[test]
fn test_unfinished_tests_take_priority() {
    let dir = workspace();
    let failures = vec![
        generic_failure("Error: a"),
        generic_failure("Error: b"),
        generic_failure("Error: c"),
    ];
    let events = stream(&[
        module_start("m"),
        test_start("m.hangs"),
        test_start("m.broken"),
        test_done("m.broken", failures.clone()),
        done(failures, 3),
    ]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAILURES: Undone tests (or their setups/teardowns): \n- m.hangs\n",
        ))
        .stdout(predicate::str::contains("assertions failed").not());
}

/// A runner that stops mid-test is treated like an unfinished test.
#[test]
fn test_stream_ends_with_pending_test() {
    let dir = workspace();
    let events = stream(&[module_start("m"), test_start("m.a"), test_start("m.b")]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("- m.a\n- m.b\n"));
}

#[test]
fn test_stream_ends_without_summary() {
    let dir = workspace();
    let events = stream(&[test_start("a"), test_done("a", vec![pass()])]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("runner ended without a final summary"));
}

#[test]
fn test_malformed_event_is_an_error() {
    let dir = workspace();
    let events = format!("{}\nnot json\n", module_start("m"));

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed event on line 2"));
}

/// Done without a summary falls back to the totals of every `testDone`.
#[test]
fn test_done_without_summary_uses_accumulated_totals() {
    let dir = workspace();
    let events = stream(&[
        test_start("a"),
        test_done("a", vec![pass(), generic_failure("Error: x")]),
        test_start("b"),
        test_done("b", vec![pass()]),
        serde_json::json!({"event": "done"}),
    ]);

    reporter(dir.path())
        .write_stdin(events)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILURES: 1/3 assertions failed"));
}

#[test]
fn test_localized_output() {
    let dir = workspace();
    let events = stream(&[test_start("t"), test_done("t", vec![pass()]), done(vec![pass()], 2)]);

    let mut cmd = Command::cargo_bin("harness-reporter").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "--no-color", "--lang", "zh-CN"])
        .write_stdin(events)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("成功: 1 个断言 (2ms)"));
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("harness-reporter").unwrap();
    cmd.args(["--lang", "en", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("init"));
}

/// The run ends after `done` even when the writer keeps stdin open.
///
/// 即使写入方保持标准输入打开，运行也会在 `done` 之后结束。
#[test]
fn test_exits_after_done_while_stdin_stays_open() {
    let dir = workspace();
    let mut child = std::process::Command::cargo_bin("harness-reporter")
        .unwrap()
        .current_dir(dir.path())
        .args(["--lang", "en", "run", "--no-color"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    let events = stream(&[test_start("a"), test_done("a", vec![pass()]), done(vec![pass()], 1)]);
    stdin.write_all(events.as_bytes()).unwrap();
    stdin.flush().unwrap();

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if started.elapsed() > Duration::from_secs(10) {
            break None;
        }
        thread::sleep(Duration::from_millis(20));
    };
    drop(stdin);

    let Some(status) = status else {
        child.kill().unwrap();
        panic!("reporter still running 10s after done");
    };
    assert_eq!(status.code(), Some(0));

    let mut out = String::new();
    child.stdout.take().unwrap().read_to_string(&mut out).unwrap();
    assert!(out.contains("OK: 1 assertions (1ms)"), "unexpected output: {out}");
}
