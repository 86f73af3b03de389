use serde::{Deserialize, Serialize};
use signage_logging::signage_warn;

use crate::clock::{Clock, EpochMillis};
use crate::ticker::{Alignment, Ticker, TickerConfig, MINUTE_MS};
use crate::timer::{TimerCommand, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    Fresh,
    Warning,
    Stale,
}

/// Age thresholds in milliseconds, always ordered `warn <= stale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessThresholds {
    warn_after_ms: i64,
    stale_after_ms: i64,
}

impl FreshnessThresholds {
    /// Inverted thresholds are swapped; equal thresholds leave no warning band.
    pub fn minutes(warn_after_min: u32, stale_after_min: u32) -> Self {
        let (mut warn, mut stale) = (warn_after_min, stale_after_min);
        if warn > stale {
            signage_warn!(
                "freshness thresholds inverted (warn {}m > stale {}m); swapping",
                warn,
                stale
            );
            std::mem::swap(&mut warn, &mut stale);
        }
        Self {
            warn_after_ms: i64::from(warn) * MINUTE_MS,
            stale_after_ms: i64::from(stale) * MINUTE_MS,
        }
    }

    pub fn classify(&self, age_ms: i64) -> Freshness {
        let age_ms = age_ms.max(0);
        if age_ms >= self.stale_after_ms {
            Freshness::Stale
        } else if age_ms >= self.warn_after_ms {
            Freshness::Warning
        } else {
            Freshness::Fresh
        }
    }
}

/// "just now" under a minute, otherwise floor-rounded "Nm ago".
pub fn age_label(age_ms: i64) -> String {
    let minutes = age_ms.max(0) / MINUTE_MS;
    if minutes == 0 {
        "just now".to_string()
    } else {
        format!("{minutes}m ago")
    }
}

/// Minute-aligned data-age badge.
#[derive(Debug, Clone)]
pub struct FreshnessIndicator {
    last_updated: EpochMillis,
    thresholds: FreshnessThresholds,
    ticker: Ticker,
}

impl FreshnessIndicator {
    pub fn new(last_updated: EpochMillis, thresholds: FreshnessThresholds, clock: Clock) -> Self {
        Self {
            last_updated,
            thresholds,
            ticker: Ticker::new(TickerConfig::aligned(Alignment::Minute, clock)),
        }
    }

    pub fn start(&mut self) -> Vec<TimerCommand> {
        self.ticker.start()
    }

    pub fn stop(&mut self) -> Vec<TimerCommand> {
        self.ticker.stop()
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<Vec<TimerCommand>> {
        self.ticker.fire(token)
    }

    pub fn mark_updated(&mut self, at: EpochMillis) {
        self.last_updated = at;
    }

    pub fn age_ms(&self) -> i64 {
        self.ticker.now().saturating_sub(self.last_updated).max(0)
    }

    pub fn level(&self) -> Freshness {
        self.thresholds.classify(self.age_ms())
    }

    pub fn label(&self) -> String {
        age_label(self.age_ms())
    }

    pub fn last_updated(&self) -> EpochMillis {
        self.last_updated
    }
}
