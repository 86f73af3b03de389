mod common;

use std::sync::Arc;

use common::Sim;
use pretty_assertions::assert_eq;
use signage_core::{
    ManualClock, Msg, Phase, ReducedMotionFlag, Rotator, RotatorConfig, TimerCommand, TimerLane,
    TransitionConfig, WidgetDisplay, WidgetSpec,
};

fn items(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn mount_rotator(sim: &mut Sim, names: &[&str], transition: TransitionConfig) {
    sim.dispatch(Msg::Mount {
        widget: 1,
        spec: WidgetSpec::Rotator {
            items: items(names),
            interval_ms: 1_000,
            paused: false,
            transition,
        },
    });
}

fn active(sim: &Sim) -> (Option<String>, usize) {
    match sim.display(1) {
        WidgetDisplay::Rotator { active, index, .. } => (active, index),
        other => panic!("unexpected display {other:?}"),
    }
}

#[test]
fn rotates_on_cadence_and_wraps() {
    let mut sim = Sim::new(0);
    mount_rotator(&mut sim, &["a", "b", "c"], TransitionConfig::none());
    assert_eq!(active(&sim), (Some("a".to_string()), 0));

    sim.run_until(1_000);
    assert_eq!(active(&sim), (Some("b".to_string()), 1));
    sim.run_until(3_000);
    assert_eq!(active(&sim), (Some("a".to_string()), 0));
}

#[test]
fn pause_freezes_and_resume_continues_from_frozen_index() {
    let mut sim = Sim::new(0);
    mount_rotator(&mut sim, &["a", "b", "c"], TransitionConfig::none());
    sim.run_until(1_000);

    sim.dispatch(Msg::SetPaused {
        widget: 1,
        paused: true,
    });
    assert_eq!(sim.pending(1), 0);
    sim.run_until(5_500);
    assert_eq!(active(&sim), (Some("b".to_string()), 1));

    sim.dispatch(Msg::SetPaused {
        widget: 1,
        paused: false,
    });
    sim.run_until(6_499);
    assert_eq!(active(&sim).1, 1);
    sim.run_until(6_500);
    assert_eq!(active(&sim), (Some("c".to_string()), 2));
}

#[test]
fn shrinking_clamps_immediately_and_empty_renders_nothing() {
    let mut sim = Sim::new(0);
    mount_rotator(&mut sim, &["a", "b", "c"], TransitionConfig::none());
    sim.run_until(2_000);
    assert_eq!(active(&sim).1, 2);

    sim.dispatch(Msg::ReplaceRotation {
        widget: 1,
        items: items(&["x", "y"]),
    });
    assert_eq!(active(&sim), (Some("y".to_string()), 1));

    sim.dispatch(Msg::ReplaceRotation {
        widget: 1,
        items: items(&["solo"]),
    });
    assert_eq!(active(&sim), (Some("solo".to_string()), 0));
    assert_eq!(sim.pending(1), 0);

    sim.dispatch(Msg::ReplaceRotation {
        widget: 1,
        items: Vec::new(),
    });
    assert_eq!(active(&sim), (None, 0));
    assert_eq!(sim.pending(1), 0);
}

#[test]
fn content_changes_go_through_transition() {
    let mut sim = Sim::new(0);
    mount_rotator(&mut sim, &["a", "b"], TransitionConfig::default());
    sim.run_until(1_000);

    assert_eq!(
        sim.rotator_layers(1),
        (Some("b".into()), Some("a".into()), Phase::Pre)
    );

    sim.run_until(1_016);
    assert_eq!(sim.rotator_layers(1).2, Phase::Animating);
    sim.run_until(1_416);
    assert_eq!(sim.rotator_layers(1), (Some("b".into()), None, Phase::Idle));
    assert_eq!(sim.pending(1), 1);
}

#[test]
fn index_stays_in_bounds_under_arbitrary_operations() {
    let manual = ManualClock::new(0);
    let mut rotator = Rotator::new(
        items(&["a", "b", "c"]),
        RotatorConfig {
            interval_ms: 100,
            paused: false,
            transition: TransitionConfig::none(),
        },
        Arc::new(ReducedMotionFlag::default()),
        manual.clock(),
    );
    let mut pending = rotator.start();

    let mut seed: u64 = 42;
    for _ in 0..2_000 {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let roll = (seed >> 33) % 10;
        let commands = match roll {
            0 => {
                let count = (seed >> 40) as usize % 6;
                let names = ["a", "b", "c", "d", "e"];
                rotator.set_items(items(&names[..count]))
            }
            1 => {
                let paused = !rotator.is_paused();
                let before = rotator.state().index;
                let commands = rotator.set_paused(paused);
                assert_eq!(rotator.state().index, before);
                commands
            }
            _ => {
                let token = pending.iter().rev().find_map(|command| match command {
                    TimerCommand::Schedule { token, .. } if token.lane == TimerLane::Tick => {
                        Some(*token)
                    }
                    _ => None,
                });
                manual.advance(100);
                let before = rotator.state().index;
                match token.and_then(|token| rotator.fire(token)) {
                    Some(commands) => commands,
                    None => {
                        assert_eq!(rotator.state().index, before);
                        Vec::new()
                    }
                }
            }
        };
        if commands
            .iter()
            .any(|command| matches!(command, TimerCommand::Schedule { .. }))
        {
            pending = commands;
        }

        let state = rotator.state();
        if state.item_count > 0 {
            assert!(state.index < state.item_count);
            assert!(rotator.active().is_some());
        } else {
            assert_eq!(state.index, 0);
            assert_eq!(rotator.active(), None);
        }
        if rotator.is_paused() {
            assert_eq!(rotator.pending_timers(), 0);
        }
    }
}
