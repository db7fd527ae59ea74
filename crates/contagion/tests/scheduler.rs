//! Ordering, cancellation and failure behaviour of the window scheduler.

use contagion::monitor::RunMonitor;
use contagion::{
    ConnectednessConfig, EngineError, ReturnPanel, RunOutcome, Schedule, WindowScheduler, compute,
};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Cancels once `after` results have been accepted
struct CancelAfter {
    after: usize,
    accepted: Cell<usize>,
}

impl CancelAfter {
    fn new(after: usize) -> Self {
        Self {
            after,
            accepted: Cell::new(0),
        }
    }
}

impl RunMonitor for CancelAfter {
    fn on_progress(&self, _fraction: f64) {
        self.accepted.set(self.accepted.get() + 1);
    }

    fn is_cancelled(&self) -> bool {
        self.accepted.get() >= self.after
    }
}

/// Records every progress fraction
#[derive(Default)]
struct Recorder {
    fractions: RefCell<Vec<f64>>,
}

impl RunMonitor for Recorder {
    fn on_progress(&self, fraction: f64) {
        self.fractions.borrow_mut().push(fraction);
    }
}

fn shuffled_delays(n: usize, seed: u64) -> Vec<u64> {
    let mut delays: Vec<u64> = (0..n as u64).map(|k| k % 7).collect();
    delays.shuffle(&mut StdRng::seed_from_u64(seed));
    delays
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn test_slot_order_ignores_completion_order(#[case] seed: u64) {
    let delays = shuffled_delays(24, seed);
    let scheduler = WindowScheduler::new(Some(4)).unwrap();
    let outcome = scheduler
        .run(
            24,
            |k| {
                thread::sleep(Duration::from_millis(delays[k]));
                Ok::<_, String>(k * 10)
            },
            &Recorder::default(),
        )
        .unwrap();

    let Schedule::Completed(slots) = outcome else {
        panic!("run was cancelled");
    };
    let values: Vec<usize> = slots.into_iter().map(|slot| slot.unwrap()).collect();
    assert_eq!(values, (0..24).map(|k| k * 10).collect::<Vec<_>>());
}

#[test]
fn test_cancellation_after_every_count() {
    let n_tasks = 8;
    let scheduler = WindowScheduler::new(Some(3)).unwrap();

    for after in 0..n_tasks {
        let monitor = CancelAfter::new(after);
        let outcome = scheduler
            .run(
                n_tasks,
                |k| {
                    thread::sleep(Duration::from_millis(1));
                    Ok::<_, String>(k)
                },
                &monitor,
            )
            .unwrap();

        assert!(matches!(outcome, Schedule::Cancelled), "after {}", after);
        assert_eq!(monitor.accepted.get(), after);
    }
}

#[test]
fn test_single_failure_surfaces() {
    let delays = shuffled_delays(16, 9);
    let scheduler = WindowScheduler::new(Some(4)).unwrap();
    let result = scheduler.run(
        16,
        |k| {
            thread::sleep(Duration::from_millis(delays[k]));
            if k == 5 {
                Err(format!("window {} diverged", k))
            } else {
                Ok(k)
            }
        },
        &Recorder::default(),
    );

    match result {
        Err(EngineError::TaskFailure { window, message }) => {
            assert_eq!(window, 5);
            assert_eq!(message, "window 5 diverged");
        }
        other => panic!("expected task failure, got {:?}", other),
    }
}

#[test]
fn test_failure_stops_queued_tasks() {
    let executed = AtomicUsize::new(0);
    let scheduler = WindowScheduler::new(Some(1)).unwrap();
    let result = scheduler.run(
        40,
        |k| {
            executed.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            if k == 0 { Err("first window failed") } else { Ok(k) }
        },
        &Recorder::default(),
    );

    assert!(matches!(result, Err(EngineError::TaskFailure { window: 0, .. })));
    assert!(executed.load(Ordering::SeqCst) < 40);
}

#[test]
fn test_progress_is_monotonic() {
    let delays = shuffled_delays(30, 4);
    let monitor = Recorder::default();
    let scheduler = WindowScheduler::new(Some(4)).unwrap();
    scheduler
        .run(
            30,
            |k| {
                thread::sleep(Duration::from_millis(delays[k]));
                Ok::<_, String>(())
            },
            &monitor,
        )
        .unwrap();

    let fractions = monitor.fractions.borrow();
    assert_eq!(fractions.len(), 30);
    assert!(fractions.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(fractions.iter().all(|&f| f > 0.0 && f <= 1.0));
    assert_eq!(fractions.last().copied(), Some(1.0));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(10)]
fn test_engine_cancellation_yields_no_dataset(#[case] after: usize) {
    let returns = Array2::from_shape_fn((60, 3), |(t, i)| {
        (((t * 13 + i * 7) % 17) as f64 - 8.0) / 500.0
    });
    let panel = ReturnPanel::from_returns(returns).unwrap();
    let config = ConnectednessConfig {
        bandwidth: 30,
        threads: Some(2),
        ..Default::default()
    };

    let outcome = compute(&panel, &config, &CancelAfter::new(after)).unwrap();
    assert!(matches!(outcome, RunOutcome::Cancelled));
}
