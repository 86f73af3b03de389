use std::fmt;

use serde::{Deserialize, Serialize};
use signage_logging::signage_info;

use crate::clock::{Clock, EpochMillis};
use crate::ticker::{Alignment, Ticker, TickerConfig};
use crate::timer::{TimerCommand, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountdownFormat {
    /// `mm:ss`, minutes unbounded.
    #[default]
    MinutesSeconds,
    /// `HH:MM:SS`, hours unbounded.
    HoursMinutesSeconds,
    /// `Xh Ym`, `Xm Ys` or `Xs`, whichever is the coarsest non-zero pair.
    Human,
}

/// Formats a remaining duration. Partial seconds round up, so `00:00` shows
/// exactly when nothing is left.
pub fn format_remaining(remaining_ms: i64, format: CountdownFormat) -> String {
    let total = remaining_ms.max(0).saturating_add(999) / 1_000;
    let (hours, minutes, seconds) = (total / 3_600, (total % 3_600) / 60, total % 60);
    match format {
        CountdownFormat::MinutesSeconds => format!("{:02}:{:02}", total / 60, seconds),
        CountdownFormat::HoursMinutesSeconds => {
            format!("{hours:02}:{minutes:02}:{seconds:02}")
        }
        CountdownFormat::Human if hours > 0 => format!("{hours}h {minutes}m"),
        CountdownFormat::Human if minutes > 0 => format!("{minutes}m {seconds}s"),
        CountdownFormat::Human => format!("{seconds}s"),
    }
}

/// Result of starting or ticking a countdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountdownTick {
    pub commands: Vec<TimerCommand>,
    /// True only for the evaluation at which remaining time first hit zero.
    pub completed: bool,
}

/// Second-aligned countdown to a fixed epoch instant.
pub struct Countdown {
    target: EpochMillis,
    format: CountdownFormat,
    ticker: Ticker,
    completed: bool,
    on_complete: Option<Box<dyn FnMut() + Send>>,
}

impl Countdown {
    pub fn new(target: EpochMillis, format: CountdownFormat, clock: Clock) -> Self {
        Self {
            target,
            format,
            ticker: Ticker::new(TickerConfig::aligned(Alignment::Second, clock)),
            completed: false,
            on_complete: None,
        }
    }

    /// Callback invoked exactly once, when remaining time first reaches zero.
    pub fn with_on_complete(mut self, on_complete: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    pub fn start(&mut self) -> CountdownTick {
        let commands = self.ticker.start();
        CountdownTick {
            commands,
            completed: self.check_completion(),
        }
    }

    pub fn stop(&mut self) -> Vec<TimerCommand> {
        self.ticker.stop()
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<CountdownTick> {
        let commands = self.ticker.fire(token)?;
        Some(CountdownTick {
            commands,
            completed: self.check_completion(),
        })
    }

    /// Moves the target. A target in the future re-arms completion.
    pub fn retarget(&mut self, target: EpochMillis) -> bool {
        self.target = target;
        if self.raw_remaining() > 0 {
            self.completed = false;
        }
        self.check_completion()
    }

    pub fn remaining_ms(&self) -> i64 {
        self.raw_remaining().max(0)
    }

    pub fn display(&self) -> String {
        format_remaining(self.remaining_ms(), self.format)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn target(&self) -> EpochMillis {
        self.target
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    fn raw_remaining(&self) -> i64 {
        self.target.saturating_sub(self.ticker.now())
    }

    fn check_completion(&mut self) -> bool {
        if self.completed || self.raw_remaining() > 0 {
            return false;
        }
        self.completed = true;
        signage_info!("countdown to {} completed", self.target);
        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete();
        }
        true
    }
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("target", &self.target)
            .field("format", &self.format)
            .field("ticker", &self.ticker)
            .field("completed", &self.completed)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}
