//! Recurring time-of-day windows and the minute-aligned gate built on them.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use signage_logging::signage_warn;
use thiserror::Error;

use crate::clock::{Clock, EpochMillis};
use crate::ticker::{Alignment, Ticker, TickerConfig};
use crate::timer::{TimerCommand, TimerToken};
use crate::zone::Zone;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("time of day {0:?} is not a 24-hour HH:MM value")]
    MalformedTime(String),
}

/// Minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| Self((hour * 60 + minute) as u16))
    }

    /// Parses `H:MM` or `HH:MM` on a 24-hour clock.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let malformed = || ScheduleError::MalformedTime(raw.to_string());
        let (hour, minute) = raw.trim().split_once(':').ok_or_else(malformed)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !(all_digits(hour) && all_digits(minute)) || hour.len() > 2 || minute.len() != 2 {
            return Err(malformed());
        }
        let hour: u32 = hour.parse().map_err(|_| malformed())?;
        let minute: u32 = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute).ok_or_else(malformed)
    }

    pub fn of(wall: &NaiveDateTime) -> Self {
        Self((wall.hour() * 60 + wall.minute()) as u16)
    }

    pub fn minutes_since_midnight(self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One recurring allowed interval, as written in board configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleWindow {
    /// `None` means every day.
    pub days: Option<Vec<Weekday>>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// IANA zone name; local time when absent.
    pub timezone: Option<String>,
}

impl ScheduleWindow {
    /// Resolves strings once. Malformed times become unbounded sides and
    /// unknown zones become local time, each with a warning.
    pub fn compile(&self) -> CompiledWindow {
        CompiledWindow {
            days: self.days.as_ref().map(|days| {
                days.iter()
                    .fold(0u8, |mask, day| mask | 1 << day.num_days_from_monday())
            }),
            start: compile_bound(self.start.as_deref(), "start"),
            end: compile_bound(self.end.as_deref(), "end"),
            zone: Zone::from_name(self.timezone.as_deref()),
        }
    }
}

fn compile_bound(raw: Option<&str>, side: &str) -> Option<TimeOfDay> {
    match TimeOfDay::parse(raw?) {
        Ok(time) => Some(time),
        Err(err) => {
            signage_warn!("schedule window {} ignored: {}", side, err);
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledWindow {
    /// Bit `n` set for the weekday `n` days from Monday.
    days: Option<u8>,
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    zone: Zone,
}

impl CompiledWindow {
    pub fn matches(&self, now: EpochMillis) -> bool {
        let wall = self.zone.project(now);
        self.matches_wall(wall.weekday(), TimeOfDay::of(&wall))
    }

    /// Matches an already projected weekday and time of day.
    pub fn matches_wall(&self, weekday: Weekday, time: TimeOfDay) -> bool {
        if let Some(mask) = self.days {
            if mask & (1 << weekday.num_days_from_monday()) == 0 {
                return false;
            }
        }
        match (self.start, self.end) {
            (None, None) => true,
            (Some(start), None) => time >= start,
            (None, Some(end)) => time < end,
            (Some(start), Some(end)) if start <= end => start <= time && time < end,
            // Overnight: wraps past midnight.
            (Some(start), Some(end)) => time >= start || time < end,
        }
    }
}

pub fn window_matches(window: &CompiledWindow, now: EpochMillis) -> bool {
    window.matches(now)
}

/// True if `now` falls in any window. An empty list places no restriction.
pub fn any_window_matches(windows: &[CompiledWindow], now: EpochMillis) -> bool {
    windows.is_empty() || windows.iter().any(|window| window_matches(window, now))
}

/// Admit/deny gate re-evaluated on every minute boundary.
#[derive(Debug, Clone)]
pub struct ScheduleGate {
    windows: Vec<CompiledWindow>,
    ticker: Ticker,
}

impl ScheduleGate {
    pub fn new(windows: &[ScheduleWindow], clock: Clock) -> Self {
        Self {
            windows: windows.iter().map(ScheduleWindow::compile).collect(),
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

    pub fn set_windows(&mut self, windows: &[ScheduleWindow]) {
        self.windows = windows.iter().map(ScheduleWindow::compile).collect();
    }

    pub fn is_open(&self) -> bool {
        any_window_matches(&self.windows, self.ticker.now())
    }

    /// `content` while open, otherwise the fallback (if any).
    pub fn select<'a, T: ?Sized>(&self, content: &'a T, fallback: Option<&'a T>) -> Option<&'a T> {
        if self.is_open() {
            Some(content)
        } else {
            fallback
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}
