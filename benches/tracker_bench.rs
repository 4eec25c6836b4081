use criterion::{Criterion, criterion_group, criterion_main};
use harness_reporter::core::config::FormatOptions;
use harness_reporter::core::events::EventListener;
use harness_reporter::models::{AssertionResult, AssertionResults, TestError};
use harness_reporter::reporting::{ConsoleReporter, Formatter};
use harness_reporter::tracker::Tracker;
use std::hint::black_box;
use std::time::Duration;

const TESTS: usize = 1_000;

fn bench_tracker(c: &mut Criterion) {
    let names: Vec<String> = (0..TESTS).map(|i| format!("module.test_{i}")).collect();

    c.bench_function("tracker_put_remove", |b| {
        b.iter(|| {
            let mut tracker = Tracker::new();
            for name in &names {
                let _ = tracker.put(name);
            }
            for name in names.iter().rev() {
                tracker.remove(name);
            }
            black_box(tracker.unfinished())
        });
    });
}

fn bench_console_reporter(c: &mut Criterion) {
    let names: Vec<String> = (0..TESTS).map(|i| format!("module.test_{i}")).collect();
    let outcome = AssertionResults::new(
        vec![
            AssertionResult::passed(),
            AssertionResult::failed_with(TestError::assertion(
                Some("expected true"),
                "AssertionError: false == true\n    at t.js:1:1",
            )),
        ],
        Duration::from_millis(1),
    );

    c.bench_function("console_reporter_run", |b| {
        b.iter(|| {
            let mut reporter =
                ConsoleReporter::new(Vec::new(), Formatter::new(FormatOptions::ansi()), "en");
            for name in &names {
                let _ = reporter.test_start(name);
                let _ = reporter.test_done(name, &outcome);
            }
            let _ = reporter.done(None);
            black_box(reporter.into_inner().len())
        });
    });
}

criterion_group!(benches, bench_tracker, bench_console_reporter);
criterion_main!(benches);
