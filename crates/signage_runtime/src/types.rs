use signage_core::{BoardViewModel, WidgetId};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// The board changed and should be re-rendered.
    ViewChanged(BoardViewModel),
    CountdownCompleted { widget: WidgetId },
}
