use framepump_scheduler::{MainLoopScheduler, ManualClock, MonotonicClock, Scheduler};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const PRODUCERS: usize = 8;
const PER_PRODUCER: usize = 250;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_scheduler_is_send_and_sync() {
    assert_send_sync::<MainLoopScheduler<MonotonicClock>>();
    assert_send_sync::<MainLoopScheduler<ManualClock>>();
    assert_send_sync::<framepump_scheduler::Disposable>();
}

#[test]
fn test_concurrent_scheduling_runs_everything_once() {
    let scheduler = MainLoopScheduler::with_clock(ManualClock::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    thread::scope(|scope| {
        for producer in 0..PRODUCERS {
            let scheduler = &scheduler;
            let seen = seen.clone();
            scope.spawn(move || {
                for index in 0..PER_PRODUCER {
                    scheduler.schedule((seen.clone(), (producer, index)), |_, (seen, id)| {
                        seen.lock().unwrap().push(id);
                        Ok(None)
                    });
                }
            });
        }
    });

    scheduler.drain().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), PRODUCERS * PER_PRODUCER);

    // Each producer's entries share a due time, so they keep their own order.
    for producer in 0..PRODUCERS {
        let order: Vec<usize> = seen
            .iter()
            .filter(|(p, _)| *p == producer)
            .map(|(_, index)| *index)
            .collect();
        assert_eq!(order, (0..PER_PRODUCER).collect::<Vec<_>>());
    }
}

#[test]
fn test_drain_while_other_threads_schedule() {
    let scheduler = Arc::new(MainLoopScheduler::new());
    let count = Arc::new(AtomicUsize::new(0));
    let total = PRODUCERS * PER_PRODUCER;

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|_| {
            let scheduler = scheduler.clone();
            let count = count.clone();
            thread::spawn(move || {
                for _ in 0..PER_PRODUCER {
                    scheduler.schedule(count.clone(), |_, count| {
                        count.fetch_add(1, Ordering::SeqCst);
                        Ok(None)
                    });
                }
            })
        })
        .collect();

    let deadline = Instant::now() + Duration::from_secs(30);
    while count.load(Ordering::SeqCst) < total && Instant::now() < deadline {
        scheduler.drain().unwrap();
        thread::yield_now();
    }

    for producer in producers {
        producer.join().unwrap();
    }
    scheduler.drain().unwrap();

    assert_eq!(count.load(Ordering::SeqCst), total);
    assert!(scheduler.is_idle());
}

#[test]
fn test_cancellation_from_another_thread() {
    let scheduler = MainLoopScheduler::with_clock(ManualClock::new());
    let count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            scheduler.schedule(count.clone(), |_, count| {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
        })
        .collect();

    thread::scope(|scope| {
        for chunk in handles.chunks(25).step_by(2) {
            scope.spawn(move || {
                for handle in chunk {
                    handle.dispose();
                }
            });
        }
    });

    let report = scheduler.drain().unwrap();
    assert_eq!(report.invoked, 50);
    assert_eq!(report.skipped, 50);
    assert_eq!(count.load(Ordering::SeqCst), 50);
}
