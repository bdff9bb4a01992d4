//! Pin monitor behavior through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use brick_commander::hal::MockPins;
use brick_commander::{HardwareError, MonitorError, PinMonitor};

const FAST: Duration = Duration::from_millis(1);

fn wait_for<F: Fn() -> bool>(cond: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "condition not met in time");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn k_high_sweeps_emit_exactly_k_events() {
    const K: usize = 5;

    let pins = MockPins::new();
    pins.queue_levels(18, &[true; K]);

    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let mut monitor = PinMonitor::new(pins.clone(), vec![12, 13, 18, 19], FAST);
    monitor
        .start(move |event| {
            assert_eq!(event.pin, 18);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    wait_for(|| count.load(Ordering::SeqCst) == K);
    // More sweeps pass with the pin back LOW; the count must hold.
    let reads = pins.read_count();
    wait_for(|| pins.read_count() > reads + 40);
    monitor.stop();
    assert_eq!(count.load(Ordering::SeqCst), K);
}

#[test]
fn low_pins_emit_zero_events() {
    let pins = MockPins::new();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let mut monitor = PinMonitor::new(pins.clone(), vec![12, 13, 18, 19], FAST);
    monitor
        .start(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    wait_for(|| pins.read_count() > 80);
    monitor.stop();
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn no_pulse_after_stop_returns() {
    let pins = MockPins::new();
    pins.set_level(12, true);

    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let mut monitor = PinMonitor::new(pins, vec![12], FAST);
    monitor
        .start(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    wait_for(|| count.load(Ordering::SeqCst) >= 3);
    monitor.stop();

    let at_stop = count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(count.load(Ordering::SeqCst), at_stop);
}

#[test]
fn failing_pin_does_not_stop_the_sweep_or_the_loop() {
    let pins = MockPins::new();
    // Pin 13 fails every read; pins 12 and 18 keep answering.
    pins.set_read_error(13, HardwareError::ReadFailed(13));
    pins.set_level(18, true);

    let (tx, rx) = mpsc::channel();
    let mut monitor = PinMonitor::new(pins.clone(), vec![12, 13, 18, 19], FAST);
    monitor
        .start(move |event| {
            let _ = tx.send(event.pin);
        })
        .unwrap();

    // Pulses from pin 18 keep arriving sweep after sweep.
    for _ in 0..5 {
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 18);
    }
    monitor.stop();

    // The failing pin was still attempted each sweep.
    assert!(pins.reads().iter().filter(|&&p| p == 13).count() >= 5);
}

#[test]
fn double_start_fails() {
    let pins = MockPins::new();
    let mut monitor = PinMonitor::new(pins, vec![12], FAST);
    monitor.start(|_| {}).unwrap();
    assert_eq!(monitor.start(|_| {}), Err(MonitorError::AlreadyRunning));
    monitor.stop();
}

#[test]
fn startup_failure_on_unopenable_pin_is_synchronous() {
    let pins = MockPins::new();
    pins.fail_open(18);

    let mut monitor = PinMonitor::new(pins.clone(), vec![12, 13, 18, 19], FAST);
    let err = monitor.start(|_| {}).unwrap_err();
    assert_eq!(
        err,
        MonitorError::Hardware(HardwareError::PinUnavailable(18))
    );
    // Nothing was ever sampled.
    assert_eq!(pins.read_count(), 0);
}

#[test]
fn stop_from_another_thread_is_safe() {
    let pins = MockPins::new();
    pins.set_level(12, true);

    let mut monitor = PinMonitor::new(pins, vec![12], FAST);
    monitor.start(|_| {}).unwrap();

    let handle = thread::spawn(move || {
        monitor.stop();
        monitor
    });
    let monitor = handle.join().unwrap();
    assert!(!monitor.is_running());
}
