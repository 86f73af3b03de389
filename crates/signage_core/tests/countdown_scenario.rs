mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::Sim;
use signage_core::{Countdown, CountdownFormat, ManualClock, Msg, WidgetDisplay, WidgetSpec};

#[test]
fn countdown_renders_and_completes_exactly_once() {
    common::init_logging();
    let manual = ManualClock::new(0);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut countdown = Countdown::new(2_000, CountdownFormat::MinutesSeconds, manual.clock())
        .with_on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    let tick = countdown.start();
    assert!(!tick.completed);
    assert_eq!(countdown.display(), "00:02");
    let mut token = tick.commands[0].token();

    manual.set(1_000);
    let tick = countdown.fire(token).expect("fresh token");
    assert_eq!(countdown.display(), "00:01");
    assert!(!tick.completed);
    token = tick.commands[0].token();

    manual.set(2_500);
    let tick = countdown.fire(token).expect("fresh token");
    assert_eq!(countdown.display(), "00:00");
    assert!(tick.completed);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    token = tick.commands[0].token();

    manual.set(10_000);
    let tick = countdown.fire(token).expect("fresh token");
    assert_eq!(countdown.display(), "00:00");
    assert!(!tick.completed);
    assert!(countdown.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn countdown_without_reaching_zero_never_completes() {
    let manual = ManualClock::new(0);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut countdown = Countdown::new(60_000, CountdownFormat::Human, manual.clock())
        .with_on_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    countdown.start();
    manual.set(59_999);
    assert_eq!(countdown.display(), "1s");
    countdown.stop();
    drop(countdown);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn retarget_into_future_rearms_completion() {
    let manual = ManualClock::new(5_000);
    let mut countdown = Countdown::new(1_000, CountdownFormat::MinutesSeconds, manual.clock());
    assert!(countdown.start().completed);
    assert!(!countdown.retarget(500));

    assert!(!countdown.retarget(65_000));
    assert!(!countdown.is_complete());
    assert_eq!(countdown.display(), "01:00");

    manual.set(65_000);
    assert!(countdown.retarget(65_000));
}

#[test]
fn board_countdown_emits_completion_effect_once() {
    let mut sim = Sim::new(0);
    sim.dispatch(Msg::Mount {
        widget: 7,
        spec: WidgetSpec::Countdown {
            target_epoch_ms: 2_000,
            format: CountdownFormat::MinutesSeconds,
            label: Some("Doors open".to_string()),
        },
    });
    assert_eq!(
        sim.display(7),
        WidgetDisplay::Countdown {
            label: Some("Doors open".to_string()),
            text: "00:02".to_string(),
            remaining_ms: 2_000,
            completed: false,
        }
    );

    sim.run_until(1_000);
    assert!(matches!(
        sim.display(7),
        WidgetDisplay::Countdown { ref text, .. } if text == "00:01"
    ));

    sim.run_until(10_000);
    assert_eq!(sim.completed, vec![7]);
    match sim.display(7) {
        WidgetDisplay::Countdown {
            text, completed, ..
        } => {
            assert_eq!(text, "00:00");
            assert!(completed);
        }
        other => panic!("unexpected display {other:?}"),
    }
    assert_eq!(sim.pending(7), 1);
}
