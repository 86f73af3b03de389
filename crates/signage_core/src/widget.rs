use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, EpochMillis};
use crate::clock_face::{ClockFace, ClockFaceConfig};
use crate::countdown::{Countdown, CountdownFormat};
use crate::freshness::{FreshnessIndicator, FreshnessThresholds};
use crate::paging::{Pager, PagerConfig};
use crate::rotation::{Rotator, RotatorConfig};
use crate::schedule::{ScheduleGate, ScheduleWindow};
use crate::timer::{TimerCommand, TimerToken};
use crate::transition::{MotionPreference, TransitionConfig};
use crate::view_model::WidgetDisplay;
use crate::zone::Zone;

pub type WidgetId = u64;

/// Row of an auto-paging list. `key` is its stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub key: String,
    pub text: String,
}

/// Declarative description of one mounted behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WidgetSpec {
    Clock {
        #[serde(default)]
        show_seconds: bool,
        #[serde(default)]
        hour12: bool,
        #[serde(default)]
        timezone: Option<String>,
    },
    Countdown {
        target_epoch_ms: EpochMillis,
        #[serde(default)]
        format: CountdownFormat,
        #[serde(default)]
        label: Option<String>,
    },
    Rotator {
        items: Vec<String>,
        interval_ms: i64,
        #[serde(default)]
        paused: bool,
        #[serde(default)]
        transition: TransitionConfig,
    },
    Pager {
        items: Vec<ListItem>,
        page_size: usize,
        dwell_ms: i64,
        #[serde(default)]
        paused: bool,
    },
    Gate {
        windows: Vec<ScheduleWindow>,
        content: String,
        #[serde(default)]
        fallback: Option<String>,
    },
    Freshness {
        last_updated_epoch_ms: EpochMillis,
        warn_after_min: u32,
        stale_after_min: u32,
    },
}

/// Outcome of starting or firing a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WidgetOutput {
    pub commands: Vec<TimerCommand>,
    pub countdown_completed: bool,
}

impl From<Vec<TimerCommand>> for WidgetOutput {
    fn from(commands: Vec<TimerCommand>) -> Self {
        Self {
            commands,
            countdown_completed: false,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Widget {
    Clock(ClockFace),
    Countdown {
        countdown: Countdown,
        label: Option<String>,
    },
    Rotator(Rotator<String>),
    Pager(Pager<ListItem, String>),
    Gate {
        gate: ScheduleGate,
        content: String,
        fallback: Option<String>,
    },
    Freshness(FreshnessIndicator),
}

impl Widget {
    pub fn build(spec: WidgetSpec, clock: Clock, motion: Arc<dyn MotionPreference>) -> Self {
        match spec {
            WidgetSpec::Clock {
                show_seconds,
                hour12,
                timezone,
            } => Widget::Clock(ClockFace::new(
                ClockFaceConfig {
                    show_seconds,
                    hour12,
                    zone: Zone::from_name(timezone.as_deref()),
                },
                clock,
            )),
            WidgetSpec::Countdown {
                target_epoch_ms,
                format,
                label,
            } => Widget::Countdown {
                countdown: Countdown::new(target_epoch_ms, format, clock),
                label,
            },
            WidgetSpec::Rotator {
                items,
                interval_ms,
                paused,
                transition,
            } => Widget::Rotator(Rotator::new(
                items,
                RotatorConfig {
                    interval_ms,
                    paused,
                    transition,
                },
                motion,
                clock,
            )),
            WidgetSpec::Pager {
                items,
                page_size,
                dwell_ms,
                paused,
            } => Widget::Pager(Pager::keyed(
                items,
                PagerConfig {
                    page_size,
                    dwell_ms,
                    paused,
                },
                |item: &ListItem| item.key.clone(),
                clock,
            )),
            WidgetSpec::Gate {
                windows,
                content,
                fallback,
            } => Widget::Gate {
                gate: ScheduleGate::new(&windows, clock),
                content,
                fallback,
            },
            WidgetSpec::Freshness {
                last_updated_epoch_ms,
                warn_after_min,
                stale_after_min,
            } => Widget::Freshness(FreshnessIndicator::new(
                last_updated_epoch_ms,
                FreshnessThresholds::minutes(warn_after_min, stale_after_min),
                clock,
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Clock(_) => "clock",
            Widget::Countdown { .. } => "countdown",
            Widget::Rotator(_) => "rotator",
            Widget::Pager(_) => "pager",
            Widget::Gate { .. } => "gate",
            Widget::Freshness(_) => "freshness",
        }
    }

    pub fn start(&mut self) -> WidgetOutput {
        match self {
            Widget::Clock(face) => face.start().into(),
            Widget::Countdown { countdown, .. } => {
                let tick = countdown.start();
                WidgetOutput {
                    commands: tick.commands,
                    countdown_completed: tick.completed,
                }
            }
            Widget::Rotator(rotator) => rotator.start().into(),
            Widget::Pager(pager) => pager.start().into(),
            Widget::Gate { gate, .. } => gate.start().into(),
            Widget::Freshness(indicator) => indicator.start().into(),
        }
    }

    pub fn stop(&mut self) -> Vec<TimerCommand> {
        match self {
            Widget::Clock(face) => face.stop(),
            Widget::Countdown { countdown, .. } => countdown.stop(),
            Widget::Rotator(rotator) => rotator.stop(),
            Widget::Pager(pager) => pager.stop(),
            Widget::Gate { gate, .. } => gate.stop(),
            Widget::Freshness(indicator) => indicator.stop(),
        }
    }

    /// `None` when the token was stale.
    pub fn fire(&mut self, token: TimerToken) -> Option<WidgetOutput> {
        match self {
            Widget::Clock(face) => face.fire(token).map(Into::into),
            Widget::Countdown { countdown, .. } => countdown.fire(token).map(|tick| WidgetOutput {
                commands: tick.commands,
                countdown_completed: tick.completed,
            }),
            Widget::Rotator(rotator) => rotator.fire(token).map(Into::into),
            Widget::Pager(pager) => pager.fire(token).map(Into::into),
            Widget::Gate { gate, .. } => gate.fire(token).map(Into::into),
            Widget::Freshness(indicator) => indicator.fire(token).map(Into::into),
        }
    }

    pub fn display(&self) -> WidgetDisplay {
        match self {
            Widget::Clock(face) => WidgetDisplay::Clock {
                text: face.display(),
            },
            Widget::Countdown { countdown, label } => WidgetDisplay::Countdown {
                label: label.clone(),
                text: countdown.display(),
                remaining_ms: countdown.remaining_ms(),
                completed: countdown.is_complete(),
            },
            Widget::Rotator(rotator) => {
                let layers = rotator.layers();
                let state = rotator.state();
                WidgetDisplay::Rotator {
                    active: layers.incoming.payload.clone(),
                    outgoing: layers.outgoing.and_then(|layer| layer.payload.clone()),
                    phase: layers.phase,
                    progress: layers.progress,
                    index: state.index,
                    item_count: state.item_count,
                    paused: rotator.is_paused(),
                }
            }
            Widget::Pager(pager) => WidgetDisplay::Pager {
                page_index: pager.page_index(),
                page_count: pager.page_count(),
                rows: pager
                    .visible()
                    .iter()
                    .map(|item| item.text.clone())
                    .collect(),
                paused: pager.is_paused(),
            },
            Widget::Gate {
                gate,
                content,
                fallback,
            } => WidgetDisplay::Gate {
                open: gate.is_open(),
                showing: gate
                    .select(content.as_str(), fallback.as_deref())
                    .map(str::to_string),
            },
            Widget::Freshness(indicator) => WidgetDisplay::Freshness {
                level: indicator.level(),
                label: indicator.label(),
            },
        }
    }
}
