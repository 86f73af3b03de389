#![allow(dead_code)]

use std::sync::{Arc, Once};

use signage_core::{
    update, BoardState, BoardViewModel, Effect, EpochMillis, ManualClock, Msg, Phase,
    ReducedMotionFlag, TimerQueue, WidgetDisplay, WidgetId,
};

pub const FRAME_MS: u64 = 16;

/// 2024-01-15T00:00:00Z, a Monday.
pub const MONDAY_MIDNIGHT_UTC: EpochMillis = 1_705_276_800_000;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(signage_logging::initialize_for_tests);
}

/// Single-threaded event loop over a manual clock: timers fire exactly at
/// their due instant, in due order.
pub struct Sim {
    pub clock: ManualClock,
    pub motion: ReducedMotionFlag,
    pub queue: TimerQueue<WidgetId>,
    pub completed: Vec<WidgetId>,
    pub fired: Vec<(WidgetId, EpochMillis)>,
    state: Option<BoardState>,
}

impl Sim {
    pub fn new(start: EpochMillis) -> Self {
        init_logging();
        let clock = ManualClock::new(start);
        let motion = ReducedMotionFlag::default();
        let state = BoardState::new(clock.clock(), Arc::new(motion.clone()));
        Self {
            clock,
            motion,
            queue: TimerQueue::new(FRAME_MS),
            completed: Vec::new(),
            fired: Vec::new(),
            state: Some(state),
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = self.state.take().expect("state present");
        let (state, effects) = update(state, msg);
        self.state = Some(state);
        for effect in effects {
            match effect {
                Effect::Timer { widget, command } => {
                    self.queue.apply(widget, command, self.clock.now())
                }
                Effect::CountdownCompleted { widget } => self.completed.push(widget),
            }
        }
    }

    pub fn run_until(&mut self, until: EpochMillis) {
        while let Some(due) = self.queue.next_due().filter(|due| *due <= until) {
            self.clock.set(due.max(self.clock.now()));
            while let Some((widget, token)) = self.queue.pop_due(self.clock.now()) {
                self.fired.push((widget, self.clock.now()));
                self.dispatch(Msg::TimerFired { widget, token });
            }
        }
        self.clock.set(until.max(self.clock.now()));
    }

    pub fn view(&self) -> BoardViewModel {
        self.state.as_ref().expect("state present").view()
    }

    pub fn display(&self, widget: WidgetId) -> WidgetDisplay {
        self.view().widget(widget).cloned().expect("widget mounted")
    }

    /// Active payload, outgoing payload and transition phase of a rotator.
    pub fn rotator_layers(&self, widget: WidgetId) -> (Option<String>, Option<String>, Phase) {
        match self.display(widget) {
            WidgetDisplay::Rotator {
                active,
                outgoing,
                phase,
                ..
            } => (active, outgoing, phase),
            other => panic!("unexpected display {other:?}"),
        }
    }

    pub fn pending(&self, widget: WidgetId) -> usize {
        self.queue.pending_for(&widget)
    }

    pub fn fire_times(&self, widget: WidgetId) -> Vec<EpochMillis> {
        self.fired
            .iter()
            .filter(|(id, _)| *id == widget)
            .map(|(_, at)| *at)
            .collect()
    }
}
