use crate::clock::Clock;
use crate::ticker::{Alignment, Ticker, TickerConfig};
use crate::timer::{TimerCommand, TimerToken};
use crate::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockFaceConfig {
    pub show_seconds: bool,
    pub hour12: bool,
    pub zone: Zone,
}

impl ClockFaceConfig {
    fn pattern(&self) -> &'static str {
        match (self.hour12, self.show_seconds) {
            (false, false) => "%H:%M",
            (false, true) => "%H:%M:%S",
            (true, false) => "%I:%M %p",
            (true, true) => "%I:%M:%S %p",
        }
    }

    fn alignment(&self) -> Alignment {
        if self.show_seconds {
            Alignment::Second
        } else {
            Alignment::Minute
        }
    }
}

/// Wall clock display. Ticks on second boundaries when seconds are shown,
/// otherwise on minute boundaries.
#[derive(Debug, Clone)]
pub struct ClockFace {
    config: ClockFaceConfig,
    ticker: Ticker,
}

impl ClockFace {
    pub fn new(config: ClockFaceConfig, clock: Clock) -> Self {
        Self {
            ticker: Ticker::new(TickerConfig::aligned(config.alignment(), clock)),
            config,
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

    /// Current time, recomputed from the clock on every call.
    pub fn display(&self) -> String {
        self.config
            .zone
            .project(self.ticker.now())
            .format(self.config.pattern())
            .to_string()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}
