use std::sync::Arc;

use serde::Serialize;
use signage_logging::signage_debug;

use crate::clock::Clock;
use crate::ticker::{Ticker, TickerConfig};
use crate::timer::{TimerCommand, TimerLane, TimerToken};
use crate::transition::{Layers, MotionPreference, Transition, TransitionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RotationState {
    pub index: usize,
    pub item_count: usize,
}

impl RotationState {
    pub fn advance(&mut self) {
        if self.item_count > 0 {
            self.index = (self.index + 1) % self.item_count;
        }
    }

    /// Keeps `index` in range for a new item count; an empty set resets to 0.
    pub fn resize(&mut self, item_count: usize) {
        self.item_count = item_count;
        if item_count == 0 {
            self.index = 0;
        } else if self.index >= item_count {
            self.index = item_count - 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatorConfig {
    pub interval_ms: i64,
    pub paused: bool,
    pub transition: TransitionConfig,
}

/// Shows one item of a list at a time, advancing on an unaligned ticker.
/// Every change of the active item goes through a [`Transition`].
#[derive(Debug)]
pub struct Rotator<T> {
    items: Vec<T>,
    state: RotationState,
    paused: bool,
    running: bool,
    ticker: Ticker,
    transition: Transition<Option<T>>,
}

impl<T: Clone + PartialEq> Rotator<T> {
    pub fn new(
        items: Vec<T>,
        config: RotatorConfig,
        motion: Arc<dyn MotionPreference>,
        clock: Clock,
    ) -> Self {
        let state = RotationState {
            index: 0,
            item_count: items.len(),
        };
        Self {
            transition: Transition::new(
                items.first().cloned(),
                config.transition,
                motion,
                clock.clone(),
            ),
            ticker: Ticker::new(TickerConfig::every(config.interval_ms, clock)),
            items,
            state,
            paused: config.paused,
            running: false,
        }
    }

    pub fn start(&mut self) -> Vec<TimerCommand> {
        self.running = true;
        self.sync_ticker()
    }

    pub fn stop(&mut self) -> Vec<TimerCommand> {
        self.running = false;
        let mut commands = self.ticker.stop();
        commands.extend(self.transition.cancel());
        commands
    }

    /// Freezes or resumes rotation. Resuming continues from the frozen index
    /// and re-anchors the cadence at the current clock reading.
    pub fn set_paused(&mut self, paused: bool) -> Vec<TimerCommand> {
        self.paused = paused;
        self.sync_ticker()
    }

    pub fn set_interval(&mut self, interval_ms: i64) -> Vec<TimerCommand> {
        let mut config = self.ticker.config().clone();
        config.interval_ms = interval_ms;
        self.apply_ticker_config(config)
    }

    /// Replaces the content set, clamping the index into range immediately.
    pub fn set_items(&mut self, items: Vec<T>) -> Vec<TimerCommand> {
        self.items = items;
        let before = self.state.index;
        self.state.resize(self.items.len());
        if before != self.state.index {
            signage_debug!(
                "rotation index clamped {} -> {} ({} items)",
                before,
                self.state.index,
                self.state.item_count
            );
        }
        let mut commands = self.sync_ticker();
        commands.extend(self.show_active());
        commands
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<Vec<TimerCommand>> {
        match token.lane {
            TimerLane::Tick => {
                let mut commands = self.ticker.fire(token)?;
                self.state.advance();
                commands.extend(self.show_active());
                Some(commands)
            }
            TimerLane::Transition => self.transition.fire(token),
        }
    }

    /// The committed item, or `None` when the list is empty.
    pub fn active(&self) -> Option<&T> {
        self.transition.current().as_ref()
    }

    pub fn layers(&self) -> Layers<'_, Option<T>> {
        self.transition.layers()
    }

    pub fn transition(&self) -> &Transition<Option<T>> {
        &self.transition
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_timers(&self) -> usize {
        usize::from(self.ticker.pending().is_some())
            + usize::from(self.transition.pending().is_some())
    }

    fn should_tick(&self) -> bool {
        self.running && !self.paused && self.items.len() > 1
    }

    fn sync_ticker(&mut self) -> Vec<TimerCommand> {
        let config = self.ticker.config().clone();
        self.apply_ticker_config(config)
    }

    fn apply_ticker_config(&mut self, config: TickerConfig) -> Vec<TimerCommand> {
        let enabled = self.should_tick();
        self.ticker.reconfigure(config.with_enabled(enabled))
    }

    fn show_active(&mut self) -> Vec<TimerCommand> {
        match self.items.get(self.state.index).cloned() {
            Some(item) => self.transition.commit(Some(item)),
            None => self.transition.replace_now(None),
        }
    }
}
