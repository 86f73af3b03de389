use std::sync::Arc;
use std::time::Duration;

use signage_core::{
    update, BoardState, BoardViewModel, Clock, Effect, MotionPreference, Msg, TimerQueue, WidgetId,
};
use signage_logging::{set_clock_reading, signage_debug, signage_trace};

use crate::{RuntimeEvent, RuntimeSettings};

/// Synchronous host for one board: feeds messages through `update`, executes
/// the timer effects in a queue, and fires whatever is due on request.
///
/// The driver never sleeps. Callers ask [`Driver::next_delay`] how long they
/// may wait and call [`Driver::fire_due`] afterwards.
#[derive(Debug)]
pub struct Driver {
    /// Only `None` while a message is inside `update`.
    state: Option<BoardState>,
    queue: TimerQueue<WidgetId>,
    clock: Clock,
    settings: RuntimeSettings,
}

impl Driver {
    pub fn new(settings: RuntimeSettings, clock: Clock, motion: Arc<dyn MotionPreference>) -> Self {
        Self {
            state: Some(BoardState::new(clock.clone(), motion)),
            queue: TimerQueue::new(settings.frame_interval_ms),
            clock,
            settings,
        }
    }

    /// Applies one message. Returns completion events, then a view if the
    /// board changed.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        self.apply(msg, &mut events);
        self.publish_view(&mut events);
        events
    }

    /// Fires every timer due at the current clock reading, up to
    /// `max_batch`, and publishes at most one view for the whole batch.
    pub fn fire_due(&mut self) -> Vec<RuntimeEvent> {
        let now = self.clock.now();
        let mut events = Vec::new();
        let mut fired = 0;
        while fired < self.settings.max_batch {
            let Some((widget, token)) = self.queue.pop_due(now) else {
                break;
            };
            fired += 1;
            self.apply(Msg::TimerFired { widget, token }, &mut events);
        }
        if fired == self.settings.max_batch {
            signage_debug!("timer batch limit {} reached", fired);
        }
        self.publish_view(&mut events);
        events
    }

    /// Time until the earliest pending timer; zero if one is overdue and
    /// `None` when nothing is pending.
    pub fn next_delay(&self) -> Option<Duration> {
        let due = self.queue.next_due()?;
        let wait_ms = due.saturating_sub(self.clock.now()).max(0);
        Some(Duration::from_millis(wait_ms.unsigned_abs()))
    }

    pub fn pending_timers(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn view(&self) -> BoardViewModel {
        self.state
            .as_ref()
            .map(BoardState::view)
            .unwrap_or_default()
    }

    fn apply(&mut self, msg: Msg, events: &mut Vec<RuntimeEvent>) {
        let now = self.clock.now();
        set_clock_reading(now);
        let Some(state) = self.state.take() else {
            return;
        };
        let (state, effects) = update(state, msg);
        self.state = Some(state);
        for effect in effects {
            match effect {
                Effect::Timer { widget, command } => {
                    signage_trace!("widget {} timer {:?}", widget, command);
                    self.queue.apply(widget, command, now);
                }
                Effect::CountdownCompleted { widget } => {
                    events.push(RuntimeEvent::CountdownCompleted { widget });
                }
            }
        }
    }

    fn publish_view(&mut self, events: &mut Vec<RuntimeEvent>) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.consume_dirty() {
            events.push(RuntimeEvent::ViewChanged(state.view()));
        }
    }
}
