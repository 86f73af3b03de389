use signage_logging::{signage_debug, signage_info, signage_trace, signage_warn};

use crate::widget::{Widget, WidgetId, WidgetOutput};
use crate::{BoardState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: BoardState, msg: Msg) -> (BoardState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mount { widget, spec } => {
            let mut effects = Vec::new();
            if let Some(mut previous) = state.remove(widget) {
                signage_debug!("re-creating {} widget {}", previous.kind(), widget);
                effects.extend(timer_effects(widget, previous.stop()));
            }
            let mut mounted = Widget::build(spec, state.clock().clone(), state.motion());
            let output = mounted.start();
            signage_info!("mounted {} widget {}", mounted.kind(), widget);
            state.insert(widget, mounted);
            state.mark_dirty();
            effects.extend(output_effects(widget, output));
            effects
        }
        Msg::Unmount { widget } => match state.remove(widget) {
            Some(mut unmounted) => {
                signage_info!("unmounted {} widget {}", unmounted.kind(), widget);
                state.mark_dirty();
                timer_effects(widget, unmounted.stop()).collect()
            }
            None => Vec::new(),
        },
        Msg::TimerFired { widget, token } => {
            let output = match state.widget_mut(widget) {
                Some(target) => target.fire(token),
                None => {
                    signage_trace!("timer {:?} fired for unmounted widget {}", token, widget);
                    None
                }
            };
            match output {
                Some(output) => {
                    state.mark_dirty();
                    output_effects(widget, output)
                }
                None => Vec::new(),
            }
        }
        Msg::SetPaused { widget, paused } => {
            apply_to(&mut state, widget, "pause", |target| match target {
                Widget::Rotator(rotator) => Some(rotator.set_paused(paused).into()),
                Widget::Pager(pager) => Some(pager.set_paused(paused).into()),
                _ => None,
            })
        }
        Msg::ReplaceRotation { widget, items } => {
            apply_to(&mut state, widget, "rotation update", |target| match target {
                Widget::Rotator(rotator) => Some(rotator.set_items(items).into()),
                _ => None,
            })
        }
        Msg::ReplaceList { widget, items } => {
            apply_to(&mut state, widget, "list update", |target| match target {
                Widget::Pager(pager) => Some(pager.set_items(items).into()),
                _ => None,
            })
        }
        Msg::DataRefreshed { widget, at } => {
            apply_to(&mut state, widget, "data refresh", |target| match target {
                Widget::Freshness(indicator) => {
                    indicator.mark_updated(at);
                    Some(WidgetOutput::default())
                }
                _ => None,
            })
        }
        Msg::RetargetCountdown { widget, target: at } => {
            apply_to(&mut state, widget, "retarget", |target| match target {
                Widget::Countdown { countdown, .. } => Some(WidgetOutput {
                    commands: Vec::new(),
                    countdown_completed: countdown.retarget(at),
                }),
                _ => None,
            })
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_to(
    state: &mut BoardState,
    widget: WidgetId,
    action: &str,
    apply: impl FnOnce(&mut Widget) -> Option<WidgetOutput>,
) -> Vec<Effect> {
    let Some(target) = state.widget_mut(widget) else {
        signage_debug!("{} for unknown widget {}", action, widget);
        return Vec::new();
    };
    let kind = target.kind();
    match apply(target) {
        Some(output) => {
            state.mark_dirty();
            output_effects(widget, output)
        }
        None => {
            signage_warn!("{} is not supported by {} widget {}", action, kind, widget);
            Vec::new()
        }
    }
}

fn timer_effects(
    widget: WidgetId,
    commands: Vec<crate::TimerCommand>,
) -> impl Iterator<Item = Effect> {
    commands
        .into_iter()
        .map(move |command| Effect::Timer { widget, command })
}

fn output_effects(widget: WidgetId, output: WidgetOutput) -> Vec<Effect> {
    let mut effects: Vec<Effect> = timer_effects(widget, output.commands).collect();
    if output.countdown_completed {
        effects.push(Effect::CountdownCompleted { widget });
    }
    effects
}
