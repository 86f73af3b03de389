//! Drift-corrected, boundary-aligned re-render ticker.
//!
//! Unaligned tickers schedule from a fixed anchor: the k-th tick is due at
//! `anchor + k * interval` no matter how late earlier fires were delivered.
//! Aligned tickers always target the next wall-clock second or minute
//! boundary, so every aligned ticker sharing a clock fires on the same instant.

use serde::{Deserialize, Serialize};
use signage_logging::{signage_debug, signage_trace};

use crate::clock::{Clock, EpochMillis};
use crate::timer::{TimerCommand, TimerLane, TimerSlot, TimerToken};

pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    /// Anchor-based cadence of `interval_ms`.
    #[default]
    None,
    Second,
    Minute,
}

impl Alignment {
    pub fn base_ms(self) -> Option<i64> {
        match self {
            Alignment::None => None,
            Alignment::Second => Some(SECOND_MS),
            Alignment::Minute => Some(MINUTE_MS),
        }
    }
}

/// First multiple of `base` strictly after `now`.
pub fn next_boundary(now: EpochMillis, base: i64) -> EpochMillis {
    now.div_euclid(base) * base + base
}

#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Cadence for [`Alignment::None`]. Must be positive for the ticker to run
    /// in any mode.
    pub interval_ms: i64,
    pub alignment: Alignment,
    pub enabled: bool,
    pub clock: Clock,
}

impl TickerConfig {
    pub fn every(interval_ms: i64, clock: Clock) -> Self {
        Self {
            interval_ms,
            alignment: Alignment::None,
            enabled: true,
            clock,
        }
    }

    pub fn aligned(alignment: Alignment, clock: Clock) -> Self {
        Self {
            interval_ms: alignment.base_ms().unwrap_or(SECOND_MS),
            alignment,
            enabled: true,
            clock,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.interval_ms > 0
    }

    fn same_as(&self, other: &TickerConfig) -> bool {
        self.interval_ms == other.interval_ms
            && self.alignment == other.alignment
            && self.enabled == other.enabled
            && self.clock.same_source(&other.clock)
    }
}

#[derive(Debug, Clone)]
pub struct Ticker {
    config: TickerConfig,
    /// Instant the pending timer targets; `None` while stopped.
    anchor: Option<EpochMillis>,
    slot: TimerSlot,
    count: u64,
}

impl Ticker {
    pub fn new(config: TickerConfig) -> Self {
        Self {
            config,
            anchor: None,
            slot: TimerSlot::new(TimerLane::Tick),
            count: 0,
        }
    }

    /// Anchors from the current clock reading and arms the first timer.
    /// Does nothing when a timer is already pending.
    pub fn start(&mut self) -> Vec<TimerCommand> {
        if !self.config.is_active() {
            return self.stop();
        }
        if self.slot.pending().is_some() {
            return Vec::new();
        }
        let now = self.config.clock.now();
        let anchor = match self.config.alignment.base_ms() {
            Some(base) => next_boundary(now, base),
            None => now.saturating_add(self.config.interval_ms),
        };
        signage_trace!(
            "ticker anchored at {} ({:?}, interval {}ms)",
            anchor,
            self.config.alignment,
            self.config.interval_ms
        );
        self.schedule(anchor, now)
    }

    /// Cancels the pending timer and clears the anchor.
    pub fn stop(&mut self) -> Vec<TimerCommand> {
        self.anchor = None;
        self.slot.disarm().into_iter().collect()
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Vec<TimerCommand> {
        self.config.enabled = enabled;
        if enabled {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Replaces the configuration. Any change tears the schedule down and
    /// re-anchors from the current clock reading.
    pub fn reconfigure(&mut self, config: TickerConfig) -> Vec<TimerCommand> {
        if self.config.same_as(&config) {
            return self.start();
        }
        let mut commands = self.stop();
        self.config = config;
        commands.extend(self.start());
        commands
    }

    /// Handles a timer fire. Returns `None` for stale tokens; otherwise the
    /// tick counter has advanced and the returned commands arm the next tick.
    pub fn fire(&mut self, token: TimerToken) -> Option<Vec<TimerCommand>> {
        if !self.slot.accept(token) {
            signage_trace!("ticker ignored stale token {:?}", token);
            return None;
        }
        let anchor = self.anchor?;
        self.count += 1;
        let now = self.config.clock.now();
        let next = match self.config.alignment.base_ms() {
            // An early fire must not target the boundary it was meant for.
            Some(base) => next_boundary(now.max(anchor), base),
            None => {
                let interval = self.config.interval_ms;
                let mut next = anchor.saturating_add(interval);
                if next <= now {
                    let missed = (now - next) / interval + 1;
                    signage_debug!("ticker skipped {} missed tick(s)", missed);
                    next = next.saturating_add(missed.saturating_mul(interval));
                }
                next
            }
        };
        Some(self.schedule(next, now))
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn next_at(&self) -> Option<EpochMillis> {
        self.anchor
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.slot.pending()
    }

    pub fn is_active(&self) -> bool {
        self.config.is_active()
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn now(&self) -> EpochMillis {
        self.config.clock.now()
    }

    fn schedule(&mut self, at: EpochMillis, now: EpochMillis) -> Vec<TimerCommand> {
        self.anchor = Some(at);
        let delay = u64::try_from(at.saturating_sub(now).max(0)).unwrap_or(0);
        self.slot.arm(delay)
    }
}
