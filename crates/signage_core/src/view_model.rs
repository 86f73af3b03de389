use serde::Serialize;

use crate::freshness::Freshness;
use crate::transition::Phase;
use crate::widget::WidgetId;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoardViewModel {
    pub widgets: Vec<WidgetView>,
    pub dirty: bool,
}

impl BoardViewModel {
    pub fn widget(&self, widget: WidgetId) -> Option<&WidgetDisplay> {
        self.widgets
            .iter()
            .find(|view| view.widget == widget)
            .map(|view| &view.display)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub widget: WidgetId,
    pub display: WidgetDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WidgetDisplay {
    Clock {
        text: String,
    },
    Countdown {
        label: Option<String>,
        text: String,
        remaining_ms: i64,
        completed: bool,
    },
    Rotator {
        active: Option<String>,
        outgoing: Option<String>,
        phase: Phase,
        progress: f32,
        index: usize,
        item_count: usize,
        paused: bool,
    },
    Pager {
        page_index: usize,
        page_count: usize,
        rows: Vec<String>,
        paused: bool,
    },
    Gate {
        open: bool,
        /// Content or fallback; `None` renders nothing.
        showing: Option<String>,
    },
    Freshness {
        level: Freshness,
        label: String,
    },
}
