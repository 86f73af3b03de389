use crate::timer::TimerCommand;
use crate::widget::WidgetId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start or cancel a timer on behalf of a widget.
    Timer {
        widget: WidgetId,
        command: TimerCommand,
    },
    /// A countdown reached zero. Emitted once per arming.
    CountdownCompleted { widget: WidgetId },
}
