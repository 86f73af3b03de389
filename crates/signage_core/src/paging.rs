//! Auto-paging list with viewport continuity under data mutation.
//!
//! When the item array is replaced, the pager re-locates the item that was
//! first visible before the change and shows the page that now contains it.
//! Identity is explicit: [`Pager::keyed`] follows items by a caller-supplied
//! key, while [`Pager::positional`] can only follow an index, so inserting or
//! removing rows before the current page shifts content under the viewer.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use signage_logging::{signage_debug, signage_warn};

use crate::clock::Clock;
use crate::ticker::{Ticker, TickerConfig};
use crate::timer::{TimerCommand, TimerToken};

/// How an item is re-identified after the array mutates.
pub enum ItemIdentity<T, K> {
    Key(Arc<dyn Fn(&T) -> K + Send + Sync>),
    /// Weaker: follows array positions, not items.
    Position,
}

impl<T, K> fmt::Debug for ItemIdentity<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemIdentity::Key(_) => f.write_str("Key(..)"),
            ItemIdentity::Position => f.write_str("Position"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PageAnchor<K> {
    Key(K),
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageState<K> {
    pub page_index: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// First item visible on the current page.
    pub anchor: Option<PageAnchor<K>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    pub page_size: usize,
    pub dwell_ms: i64,
    pub paused: bool,
}

#[derive(Debug)]
pub struct Pager<T, K> {
    items: Vec<T>,
    identity: ItemIdentity<T, K>,
    page_size: usize,
    page_index: usize,
    anchor: Option<PageAnchor<K>>,
    paused: bool,
    running: bool,
    ticker: Ticker,
}

impl<T, K: Clone + PartialEq> Pager<T, K> {
    /// Pager that keeps the first visible item on screen across mutations.
    pub fn keyed(
        items: Vec<T>,
        config: PagerConfig,
        key: impl Fn(&T) -> K + Send + Sync + 'static,
        clock: Clock,
    ) -> Self {
        Self::with_identity(items, config, ItemIdentity::Key(Arc::new(key)), clock)
    }

    pub fn with_identity(
        items: Vec<T>,
        config: PagerConfig,
        identity: ItemIdentity<T, K>,
        clock: Clock,
    ) -> Self {
        let mut pager = Self {
            items,
            identity,
            page_size: sanitize_page_size(config.page_size),
            page_index: 0,
            anchor: None,
            paused: config.paused,
            running: false,
            ticker: Ticker::new(TickerConfig::every(config.dwell_ms, clock)),
        };
        pager.anchor = pager.anchor_for_page();
        pager
    }

    pub fn start(&mut self) -> Vec<TimerCommand> {
        self.running = true;
        self.sync_ticker()
    }

    pub fn stop(&mut self) -> Vec<TimerCommand> {
        self.running = false;
        self.ticker.stop()
    }

    pub fn set_paused(&mut self, paused: bool) -> Vec<TimerCommand> {
        self.paused = paused;
        self.sync_ticker()
    }

    /// Replaces the items and re-locates the page from the previous anchor.
    /// A missing anchor falls back to page 0.
    pub fn set_items(&mut self, items: Vec<T>) -> Vec<TimerCommand> {
        self.items = items;
        self.relocate();
        self.sync_ticker()
    }

    /// Changes the page size, keeping the anchor item visible.
    pub fn set_page_size(&mut self, page_size: usize) -> Vec<TimerCommand> {
        self.page_size = sanitize_page_size(page_size);
        self.relocate();
        self.sync_ticker()
    }

    pub fn fire(&mut self, token: TimerToken) -> Option<Vec<TimerCommand>> {
        let commands = self.ticker.fire(token)?;
        let page_count = self.page_count();
        if page_count > 0 {
            self.page_index = (self.page_index + 1) % page_count;
        }
        self.anchor = self.anchor_for_page();
        Some(commands)
    }

    pub fn page_count(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn visible(&self) -> &[T] {
        let start = (self.page_index * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.identity, ItemIdentity::Position)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> PageState<K> {
        PageState {
            page_index: self.page_index,
            page_size: self.page_size,
            total_items: self.items.len(),
            anchor: self.anchor.clone(),
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    fn relocate(&mut self) {
        let previous = self.anchor.take();
        let position = match (&previous, &self.identity) {
            (Some(PageAnchor::Key(key)), ItemIdentity::Key(key_of)) => {
                self.items.iter().position(|item| key_of(item) == *key)
            }
            (Some(PageAnchor::Position(position)), _) => {
                Some(*position).filter(|position| *position < self.items.len())
            }
            _ => None,
        };
        self.page_index = match position {
            Some(position) => position / self.page_size,
            None => {
                if previous.is_some() && !self.items.is_empty() {
                    signage_debug!("page anchor lost after update; showing first page");
                }
                0
            }
        };
        let page_count = self.page_count();
        if self.page_index >= page_count {
            self.page_index = 0;
        }
        self.anchor = self.anchor_for_page();
    }

    fn anchor_for_page(&self) -> Option<PageAnchor<K>> {
        let position = self.page_index * self.page_size;
        let item = self.items.get(position)?;
        Some(match &self.identity {
            ItemIdentity::Key(key_of) => PageAnchor::Key(key_of(item)),
            ItemIdentity::Position => PageAnchor::Position(position),
        })
    }

    fn sync_ticker(&mut self) -> Vec<TimerCommand> {
        let enabled = self.running && !self.paused && self.page_count() > 1;
        let config = self.ticker.config().clone().with_enabled(enabled);
        self.ticker.reconfigure(config)
    }
}

impl<T> Pager<T, usize> {
    /// Pager that follows positions only. Prefer [`Pager::keyed`] whenever
    /// items have a stable identity.
    pub fn positional(items: Vec<T>, config: PagerConfig, clock: Clock) -> Self {
        Pager::with_identity(items, config, ItemIdentity::Position, clock)
    }
}

fn sanitize_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        signage_warn!("page size 0 is invalid; using 1");
        1
    } else {
        page_size
    }
}
