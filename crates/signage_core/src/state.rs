use std::collections::BTreeMap;
use std::sync::Arc;

use crate::clock::Clock;
use crate::transition::MotionPreference;
use crate::view_model::{BoardViewModel, WidgetView};
use crate::widget::{Widget, WidgetId};

/// Every mounted widget of one screen, plus the shared read-only inputs they
/// were built with.
#[derive(Debug)]
pub struct BoardState {
    widgets: BTreeMap<WidgetId, Widget>,
    clock: Clock,
    motion: Arc<dyn MotionPreference>,
    dirty: bool,
}

impl BoardState {
    pub fn new(clock: Clock, motion: Arc<dyn MotionPreference>) -> Self {
        Self {
            widgets: BTreeMap::new(),
            clock,
            motion,
            dirty: false,
        }
    }

    pub fn view(&self) -> BoardViewModel {
        BoardViewModel {
            widgets: self
                .widgets
                .iter()
                .map(|(id, widget)| WidgetView {
                    widget: *id,
                    display: widget.display(),
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render was requested since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains_key(&widget)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub(crate) fn motion(&self) -> Arc<dyn MotionPreference> {
        self.motion.clone()
    }

    pub(crate) fn widget_mut(&mut self, widget: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(&widget)
    }

    pub(crate) fn insert(&mut self, id: WidgetId, widget: Widget) -> Option<Widget> {
        self.widgets.insert(id, widget)
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        self.widgets.remove(&id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
