//! Sink toggling while engine threads log concurrently

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use vlc_bridge::{Instance, LogLevel, StubEmitter, StubEngine};

fn spawn_emitters(
    emitter: &StubEmitter,
    count: usize,
    stop: &Arc<AtomicBool>,
) -> Vec<thread::JoinHandle<usize>> {
    (0..count)
        .map(|thread_id| {
            let emitter = emitter.clone();
            let stop = Arc::clone(stop);
            thread::spawn(move || {
                let mut sent = 0;
                while !stop.load(Ordering::Relaxed) {
                    emitter.emit(
                        LogLevel::Debug,
                        "worker",
                        &format!("thread {} message {}", thread_id, sent),
                    );
                    sent += 1;
                }
                sent
            })
        })
        .collect()
}

#[test]
fn test_no_delivery_after_handler_removed() {
    let mut instance = Instance::<StubEngine>::new().unwrap();
    let emitter = StubEngine::emitter(&instance);
    let stop = Arc::new(AtomicBool::new(false));
    let late_deliveries = Arc::new(AtomicUsize::new(0));
    let delivered = Arc::new(AtomicUsize::new(0));

    let workers = spawn_emitters(&emitter, 4, &stop);

    for round in 0..300 {
        let retired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&retired);
        let late = Arc::clone(&late_deliveries);
        let count = Arc::clone(&delivered);
        instance.on_log(move |_| {
            if flag.load(Ordering::SeqCst) {
                late.fetch_add(1, Ordering::SeqCst);
            }
            count.fetch_add(1, Ordering::Relaxed);
        });

        if round % 2 == 0 {
            instance.set_log_callback(None);
        } else {
            instance.on_log(|_| {});
        }
        retired.store(true, Ordering::SeqCst);
    }
    instance.disable_logging();

    stop.store(true, Ordering::Relaxed);
    let sent: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();

    assert!(sent > 0);
    assert_eq!(late_deliveries.load(Ordering::SeqCst), 0);
}

#[test]
fn test_toggle_between_all_modes_under_load() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("stress.log");

    let mut instance = Instance::<StubEngine>::new().unwrap();
    let emitter = StubEngine::emitter(&instance);
    let stop = Arc::new(AtomicBool::new(false));
    let callback_hits = Arc::new(AtomicUsize::new(0));

    let workers = spawn_emitters(&emitter, 6, &stop);

    for round in 0..200 {
        match round % 4 {
            0 => {
                let hits = Arc::clone(&callback_hits);
                instance.on_log(move |record| {
                    assert!(record.message.is_some());
                    hits.fetch_add(1, Ordering::Relaxed);
                });
            }
            1 => instance.log_to_file(&log_path).unwrap(),
            2 => instance.disable_logging(),
            _ => instance.log_to_tracing(),
        }
    }

    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.join().unwrap();
    }
    drop(instance);

    assert!(emitter.is_released());
    assert!(log_path.exists());
}

#[test]
fn test_drop_while_emitting() {
    for _ in 0..20 {
        let mut instance = Instance::<StubEngine>::new().unwrap();
        let emitter = StubEngine::emitter(&instance);
        let stop = Arc::new(AtomicBool::new(false));
        instance.on_log(|_| {});

        let workers = spawn_emitters(&emitter, 3, &stop);
        thread::yield_now();
        drop(instance);

        stop.store(true, Ordering::Relaxed);
        for worker in workers {
            worker.join().unwrap();
        }
        assert!(emitter.is_released());
        assert!(!emitter.emit(LogLevel::Debug, "core", "late"));
    }
}
