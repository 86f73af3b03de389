//! Two-slot crossfade/slide state machine.
//!
//! `Idle -> Pre -> Animating -> Idle`. A commit while `Idle` freezes the old
//! payload as `previous`, requests a frame (layout flush), starts animating on
//! that frame and settles after the effective duration. A commit arriving
//! mid-transition restarts from `Pre` with the interrupted incoming payload as
//! the new `previous`; the slot's single pending timer is replaced, never
//! stacked.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use signage_logging::signage_trace;

use crate::clock::{Clock, EpochMillis};
use crate::timer::{TimerCommand, TimerLane, TimerSlot, TimerToken};

/// Platform "prefers reduced motion" signal, read at the start of every
/// transition.
pub trait MotionPreference: fmt::Debug + Send + Sync {
    fn prefers_reduced_motion(&self) -> bool;
}

/// Shared flag a platform layer flips when the display preference changes.
#[derive(Debug, Clone, Default)]
pub struct ReducedMotionFlag(Arc<AtomicBool>);

impl ReducedMotionFlag {
    pub fn new(reduced: bool) -> Self {
        Self(Arc::new(AtomicBool::new(reduced)))
    }

    pub fn set(&self, reduced: bool) {
        self.0.store(reduced, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl MotionPreference for ReducedMotionFlag {
    fn prefers_reduced_motion(&self) -> bool {
        self.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideDirection {
    /// Incoming content enters from the right edge.
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl SlideDirection {
    fn unit(self) -> (f32, f32) {
        match self {
            SlideDirection::Left => (1.0, 0.0),
            SlideDirection::Right => (-1.0, 0.0),
            SlideDirection::Up => (0.0, 1.0),
            SlideDirection::Down => (0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionKind {
    None,
    #[default]
    Crossfade,
    Slide(SlideDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReducedMotionPolicy {
    /// Swap instantly.
    Disable,
    /// Cap the duration.
    Shorten { max_ms: u64 },
}

impl Default for ReducedMotionPolicy {
    fn default() -> Self {
        ReducedMotionPolicy::Shorten { max_ms: 150 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub kind: TransitionKind,
    pub duration_ms: u64,
    pub reduced_motion: ReducedMotionPolicy,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            kind: TransitionKind::Crossfade,
            duration_ms: 400,
            reduced_motion: ReducedMotionPolicy::default(),
        }
    }
}

impl TransitionConfig {
    /// Instant replacement.
    pub fn none() -> Self {
        Self {
            kind: TransitionKind::None,
            duration_ms: 0,
            reduced_motion: ReducedMotionPolicy::Disable,
        }
    }

    pub fn effective_duration_ms(&self, prefers_reduced_motion: bool) -> u64 {
        if self.kind == TransitionKind::None || self.duration_ms == 0 {
            return 0;
        }
        match (prefers_reduced_motion, self.reduced_motion) {
            (false, _) => self.duration_ms,
            (true, ReducedMotionPolicy::Disable) => 0,
            (true, ReducedMotionPolicy::Shorten { max_ms }) => self.duration_ms.min(max_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Pre,
    Animating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionState<T> {
    pub phase: Phase,
    pub current: T,
    /// Only set while `Pre` or `Animating`.
    pub previous: Option<T>,
}

/// One rendered slot with its linear animation style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer<'a, T> {
    pub payload: &'a T,
    pub opacity: f32,
    /// Offset as a fraction of the viewport, `(x, y)`.
    pub offset: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layers<'a, T> {
    pub phase: Phase,
    pub progress: f32,
    pub incoming: Layer<'a, T>,
    pub outgoing: Option<Layer<'a, T>>,
}

pub struct Transition<T> {
    config: TransitionConfig,
    state: TransitionState<T>,
    slot: TimerSlot,
    motion: Arc<dyn MotionPreference>,
    clock: Clock,
    started_at: Option<EpochMillis>,
    effective_ms: u64,
}

impl<T: Clone + PartialEq> Transition<T> {
    pub fn new(
        initial: T,
        config: TransitionConfig,
        motion: Arc<dyn MotionPreference>,
        clock: Clock,
    ) -> Self {
        Self {
            config,
            state: TransitionState {
                phase: Phase::Idle,
                current: initial,
                previous: None,
            },
            slot: TimerSlot::new(TimerLane::Transition),
            motion,
            clock,
            started_at: None,
            effective_ms: 0,
        }
    }

    /// Commits a new payload. Equal payloads are ignored.
    pub fn commit(&mut self, next: T) -> Vec<TimerCommand> {
        if next == self.state.current {
            return Vec::new();
        }
        let effective = self
            .config
            .effective_duration_ms(self.motion.prefers_reduced_motion());
        if effective == 0 {
            return self.replace_now(next);
        }
        if self.state.phase != Phase::Idle {
            signage_trace!("transition interrupted in {:?}", self.state.phase);
        }
        let outgoing = std::mem::replace(&mut self.state.current, next);
        self.state.previous = Some(outgoing);
        self.state.phase = Phase::Pre;
        self.started_at = None;
        self.effective_ms = effective;
        self.slot.arm_frame()
    }

    /// Swaps without animating, abandoning any transition in flight.
    pub fn replace_now(&mut self, next: T) -> Vec<TimerCommand> {
        let commands = self.cancel();
        self.state.current = next;
        commands
    }

    /// Settles immediately: drops `previous` and the pending timer.
    pub fn cancel(&mut self) -> Vec<TimerCommand> {
        self.state.phase = Phase::Idle;
        self.state.previous = None;
        self.started_at = None;
        self.slot.disarm().into_iter().collect()
    }

    /// Advances the phase on a fire of the pending token.
    pub fn fire(&mut self, token: TimerToken) -> Option<Vec<TimerCommand>> {
        if !self.slot.accept(token) {
            signage_trace!("transition ignored stale token {:?}", token);
            return None;
        }
        match self.state.phase {
            Phase::Pre => {
                self.state.phase = Phase::Animating;
                self.started_at = Some(self.clock.now());
                Some(self.slot.arm(self.effective_ms))
            }
            Phase::Animating => {
                self.state.phase = Phase::Idle;
                self.state.previous = None;
                self.started_at = None;
                Some(Vec::new())
            }
            Phase::Idle => None,
        }
    }

    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &TransitionState<T> {
        &self.state
    }

    pub fn current(&self) -> &T {
        &self.state.current
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.slot.pending()
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        match (self.state.phase, self.started_at) {
            (Phase::Idle, _) => 1.0,
            (Phase::Animating, Some(started_at)) if self.effective_ms > 0 => {
                let elapsed = self.clock.now().saturating_sub(started_at).max(0);
                (elapsed as f32 / self.effective_ms as f32).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn layers(&self) -> Layers<'_, T> {
        let progress = self.progress();
        let (incoming_style, outgoing_style) = match self.config.kind {
            TransitionKind::Crossfade => ((progress, (0.0, 0.0)), (1.0 - progress, (0.0, 0.0))),
            TransitionKind::Slide(direction) => {
                let (dx, dy) = direction.unit();
                let remaining = 1.0 - progress;
                (
                    (1.0, (dx * remaining, dy * remaining)),
                    (1.0, (-dx * progress, -dy * progress)),
                )
            }
            TransitionKind::None => ((1.0, (0.0, 0.0)), (0.0, (0.0, 0.0))),
        };
        Layers {
            phase: self.state.phase,
            progress,
            incoming: Layer {
                payload: &self.state.current,
                opacity: incoming_style.0,
                offset: incoming_style.1,
            },
            outgoing: self.state.previous.as_ref().map(|payload| Layer {
                payload,
                opacity: outgoing_style.0,
                offset: outgoing_style.1,
            }),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pending", &self.slot.pending())
            .field("started_at", &self.started_at)
            .field("effective_ms", &self.effective_ms)
            .finish()
    }
}
