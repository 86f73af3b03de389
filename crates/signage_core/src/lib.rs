//! Signage core: deterministic scheduling primitives and the board state machine.
//!
//! Nothing in this crate sleeps, spawns, or reads the wall clock directly.
//! Time comes from an injected [`Clock`]; timers are requested as
//! [`TimerCommand`]s for a host to run.
mod clock;
mod clock_face;
mod countdown;
mod effect;
mod freshness;
mod msg;
mod paging;
mod rotation;
mod schedule;
mod state;
mod ticker;
mod timer;
mod transition;
mod update;
mod view_model;
mod widget;
mod zone;

pub use clock::{Clock, EpochMillis, ManualClock};
pub use clock_face::{ClockFace, ClockFaceConfig};
pub use countdown::{format_remaining, Countdown, CountdownFormat, CountdownTick};
pub use effect::Effect;
pub use freshness::{age_label, Freshness, FreshnessIndicator, FreshnessThresholds};
pub use msg::Msg;
pub use paging::{ItemIdentity, PageAnchor, PageState, Pager, PagerConfig};
pub use rotation::{RotationState, Rotator, RotatorConfig};
pub use schedule::{
    any_window_matches, window_matches, CompiledWindow, ScheduleError, ScheduleGate, ScheduleWindow,
    TimeOfDay,
};
pub use state::BoardState;
pub use ticker::{next_boundary, Alignment, Ticker, TickerConfig, MINUTE_MS, SECOND_MS};
pub use timer::{TimerCommand, TimerLane, TimerQueue, TimerSlot, TimerToken};
pub use transition::{
    Layer, Layers, MotionPreference, Phase, ReducedMotionFlag, ReducedMotionPolicy, SlideDirection,
    Transition, TransitionConfig, TransitionKind, TransitionState,
};
pub use update::update;
pub use view_model::{BoardViewModel, WidgetDisplay, WidgetView};
pub use widget::{ListItem, WidgetId, WidgetSpec};
pub use zone::Zone;
