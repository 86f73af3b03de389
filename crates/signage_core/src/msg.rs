use crate::clock::EpochMillis;
use crate::timer::TimerToken;
use crate::widget::{ListItem, WidgetId, WidgetSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Instantiate a widget. An existing widget with the same id is torn down
    /// and re-created.
    Mount { widget: WidgetId, spec: WidgetSpec },
    /// Tear a widget down, cancelling its pending timers.
    Unmount { widget: WidgetId },
    /// A timer previously requested through [`crate::Effect::Timer`] fired.
    TimerFired { widget: WidgetId, token: TimerToken },
    /// Freeze or resume a rotator or pager.
    SetPaused { widget: WidgetId, paused: bool },
    /// New content set for a rotator.
    ReplaceRotation {
        widget: WidgetId,
        items: Vec<String>,
    },
    /// New rows for a pager.
    ReplaceList {
        widget: WidgetId,
        items: Vec<ListItem>,
    },
    /// The data behind a freshness badge was refreshed.
    DataRefreshed { widget: WidgetId, at: EpochMillis },
    /// Move a countdown's target.
    RetargetCountdown {
        widget: WidgetId,
        target: EpochMillis,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
