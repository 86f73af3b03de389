//! Timer tokens, the single-pending-timer slot, and the host-side timer queue.
//!
//! The core never sleeps or spawns. Primitives describe the timers they need as
//! [`TimerCommand`]s; a host (the tokio runtime, or a test loop driven by a
//! manual clock) executes them and reports fires back with the token it was
//! given. A fire whose token is no longer pending is stale and gets ignored,
//! which is what makes cancellation deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::clock::EpochMillis;

/// Token sequence shared by every slot, so a re-created widget never reuses
/// a token its predecessor handed out.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Which sub-machine of a widget a timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum TimerLane {
    Tick,
    Transition,
}

/// Identity of one arming of one timer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct TimerToken {
    pub lane: TimerLane,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Fire `token` after `delay_ms`.
    Schedule { token: TimerToken, delay_ms: u64 },
    /// Fire `token` at the next paint opportunity.
    RequestFrame { token: TimerToken },
    Cancel { token: TimerToken },
}

impl TimerCommand {
    pub fn token(&self) -> TimerToken {
        match *self {
            TimerCommand::Schedule { token, .. }
            | TimerCommand::RequestFrame { token }
            | TimerCommand::Cancel { token } => token,
        }
    }
}

/// Owns at most one pending timer. Re-arming cancels the previous token first.
#[derive(Debug, Clone)]
pub struct TimerSlot {
    lane: TimerLane,
    pending: Option<TimerToken>,
}

impl TimerSlot {
    pub fn new(lane: TimerLane) -> Self {
        Self {
            lane,
            pending: None,
        }
    }

    pub fn arm(&mut self, delay_ms: u64) -> Vec<TimerCommand> {
        let mut commands: Vec<TimerCommand> = self.disarm().into_iter().collect();
        let token = self.next_token();
        commands.push(TimerCommand::Schedule { token, delay_ms });
        commands
    }

    pub fn arm_frame(&mut self) -> Vec<TimerCommand> {
        let mut commands: Vec<TimerCommand> = self.disarm().into_iter().collect();
        let token = self.next_token();
        commands.push(TimerCommand::RequestFrame { token });
        commands
    }

    pub fn disarm(&mut self) -> Option<TimerCommand> {
        self.pending
            .take()
            .map(|token| TimerCommand::Cancel { token })
    }

    /// Consumes `token` if it is the pending one. Returns false for stale fires.
    pub fn accept(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    fn next_token(&mut self) -> TimerToken {
        let token = TimerToken {
            lane: self.lane,
            seq: NEXT_SEQ.fetch_add(1, Ordering::Relaxed),
        };
        self.pending = Some(token);
        token
    }
}

#[derive(Debug, Clone)]
struct Entry<K> {
    due: EpochMillis,
    order: u64,
    owner: K,
    token: TimerToken,
}

/// Pending timers of many owners, ordered by due time then insertion order.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    order: u64,
    frame_interval_ms: u64,
}

impl<K: Clone + PartialEq> TimerQueue<K> {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            order: 0,
            frame_interval_ms,
        }
    }

    pub fn apply(&mut self, owner: K, command: TimerCommand, now: EpochMillis) {
        let delay_ms = match command {
            TimerCommand::Schedule { delay_ms, .. } => delay_ms,
            TimerCommand::RequestFrame { .. } => self.frame_interval_ms,
            TimerCommand::Cancel { token } => {
                self.entries
                    .retain(|entry| !(entry.owner == owner && entry.token == token));
                return;
            }
        };
        self.order += 1;
        self.entries.push(Entry {
            due: now.saturating_add(i64::try_from(delay_ms).unwrap_or(i64::MAX)),
            order: self.order,
            owner,
            token: command.token(),
        });
    }

    pub fn next_due(&self) -> Option<EpochMillis> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: EpochMillis) -> Option<(K, TimerToken)> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.order))
            .map(|(position, _)| position)?;
        let entry = self.entries.remove(position);
        Some((entry.owner, entry.token))
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    pub fn pending_for(&self, owner: &K) -> usize {
        self.entries
            .iter()
            .filter(|entry| &entry.owner == owner)
            .count()
    }

    /// Drops every timer of `owner`, returning how many were pending.
    pub fn clear_owner(&mut self, owner: &K) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.owner != owner);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_cancels_previous_token() {
        let mut slot = TimerSlot::new(TimerLane::Tick);
        let first = slot.arm(100);
        assert_eq!(first.len(), 1);
        let first_token = first[0].token();

        let second = slot.arm(50);
        assert_eq!(second[0], TimerCommand::Cancel { token: first_token });
        assert!(matches!(
            second[1],
            TimerCommand::Schedule { delay_ms: 50, .. }
        ));

        assert!(!slot.accept(first_token));
        assert!(slot.accept(second[1].token()));
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn queue_pops_in_due_then_insertion_order() {
        let mut queue = TimerQueue::new(16);
        let a = TimerToken {
            lane: TimerLane::Tick,
            seq: 1,
        };
        let b = TimerToken {
            lane: TimerLane::Tick,
            seq: 2,
        };
        let c = TimerToken {
            lane: TimerLane::Transition,
            seq: 1,
        };
        queue.apply(
            "late",
            TimerCommand::Schedule {
                token: a,
                delay_ms: 30,
            },
            0,
        );
        queue.apply(
            "first",
            TimerCommand::Schedule {
                token: b,
                delay_ms: 10,
            },
            0,
        );
        queue.apply("frame", TimerCommand::RequestFrame { token: c }, 0);

        assert_eq!(queue.next_due(), Some(10));
        assert_eq!(queue.pop_due(5), None);
        assert_eq!(queue.pop_due(40), Some(("first", b)));
        assert_eq!(queue.pop_due(40), Some(("frame", c)));
        assert_eq!(queue.pop_due(40), Some(("late", a)));
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn cancel_only_removes_matching_owner_and_token() {
        let mut queue = TimerQueue::new(16);
        let token = TimerToken {
            lane: TimerLane::Tick,
            seq: 1,
        };
        queue.apply(
            1,
            TimerCommand::Schedule {
                token,
                delay_ms: 10,
            },
            0,
        );
        queue.apply(
            2,
            TimerCommand::Schedule {
                token,
                delay_ms: 10,
            },
            0,
        );

        queue.apply(1, TimerCommand::Cancel { token }, 0);
        assert_eq!(queue.pending_for(&1), 0);
        assert_eq!(queue.pending_for(&2), 1);
        assert_eq!(queue.clear_owner(&2), 1);
        assert_eq!(queue.next_due(), None);
    }
}
