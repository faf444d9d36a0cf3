//! # Record List View
//!
//! The grid over the record store. All state changes that other
//! components care about leave through a FIFO event queue instead of
//! being observed directly; the panel controller drains that queue after
//! every command and reacts in order.
//!
//! The view also keeps the URL index used for anchor fallback lookups.
//! The first record seen for a URL wins, matching how a link that was
//! captured once keeps pointing at the same entry even when the page
//! fetched it again later.

use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::record::{Record, RecordStore};
use crate::ui::panel::{ScrollRegion, StatusBarItem};

/// State changes announced by the list, drained in emit order.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// Every record was removed.
    ViewCleared,
    /// The row density toggle changed.
    RowSizeChanged { large_rows: bool },
    /// A row was committed. `None` means the commit landed on nothing
    /// (empty grid), which receivers must tolerate.
    RequestSelected { record: Option<Arc<Record>> },
    /// A search finished counting its matches.
    SearchCountUpdated { count: usize },
    /// The current match moved; 0-based ordinal within the match list.
    SearchIndexUpdated { index: usize },
}

/// An in-progress search over the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    /// Visible-row indices that matched, ascending.
    pub matches: Vec<usize>,
    /// Position within `matches` of the current match.
    pub current: Option<usize>,
}

/// Compiled filter. Falls back to substring matching when the query is
/// not a valid regex.
#[derive(Debug)]
struct FilterQuery {
    text: String,
    lowered: String,
    regex: Option<Regex>,
}

impl FilterQuery {
    fn new(query: &str) -> Self {
        Self {
            text: query.to_string(),
            lowered: query.to_lowercase(),
            regex: Regex::new(&format!("(?i){query}")).ok(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        if let Some(regex) = &self.regex {
            return regex.is_match(&record.url)
                || regex.is_match(&record.method)
                || regex.is_match(&record.mime_type);
        }
        record.url.to_lowercase().contains(&self.lowered)
            || record.method.to_lowercase().contains(&self.lowered)
            || record.mime_type.to_lowercase().contains(&self.lowered)
    }
}

/// The record grid.
pub struct ListView {
    store: RecordStore,
    /// URL to record id; first capture of a URL wins.
    ids_by_url: HashMap<String, String>,
    filter: Option<FilterQuery>,
    search: Option<SearchSession>,
    selected: Option<usize>,
    large_rows: bool,
    brief_mode: bool,
    allow_popover: bool,
    allow_row_selection: bool,
    events: VecDeque<ListEvent>,
}

impl ListView {
    pub fn new(store: RecordStore) -> Self {
        let mut ids_by_url = HashMap::new();
        for record in store.records() {
            ids_by_url
                .entry(record.url.clone())
                .or_insert_with(|| record.id.clone());
        }

        Self {
            store,
            ids_by_url,
            filter: None,
            search: None,
            selected: None,
            large_rows: false,
            brief_mode: false,
            allow_popover: true,
            allow_row_selection: false,
            events: VecDeque::new(),
        }
    }

    /// Next pending event, oldest first.
    pub fn poll_event(&mut self) -> Option<ListEvent> {
        self.events.pop_front()
    }

    fn emit(&mut self, event: ListEvent) {
        self.events.push_back(event);
    }

    // --- store access ---

    pub fn records(&self) -> &[Arc<Record>] {
        self.store.records()
    }

    pub fn record_by_id(&self, id: &str) -> Option<Arc<Record>> {
        self.store.record_by_id(id)
    }

    pub fn record_by_url(&self, href: &str) -> Option<Arc<Record>> {
        let id = self.ids_by_url.get(href)?;
        self.store.record_by_id(id)
    }

    /// Rows after the filter, in capture order.
    pub fn visible_rows(&self) -> Vec<Arc<Record>> {
        self.store
            .records()
            .iter()
            .filter(|record| match &self.filter {
                Some(filter) => filter.matches(record),
                None => true,
            })
            .map(Arc::clone)
            .collect()
    }

    // --- selection ---

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<Arc<Record>> {
        let rows = self.visible_rows();
        self.selected.and_then(|i| rows.get(i).map(Arc::clone))
    }

    pub fn select_next(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % len,
            None => 0,
        });
        self.emit_selection_if_allowed();
    }

    pub fn select_previous(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
        self.emit_selection_if_allowed();
    }

    fn emit_selection_if_allowed(&mut self) {
        if self.allow_row_selection {
            let record = self.selected_record();
            self.emit(ListEvent::RequestSelected { record });
        }
    }

    /// Commit the highlighted row. Always emits, even over an empty grid.
    pub fn open_selected(&mut self) {
        if self.selected.is_none() && !self.visible_rows().is_empty() {
            self.selected = Some(0);
        }
        let record = self.selected_record();
        self.emit(ListEvent::RequestSelected { record });
    }

    /// Move the highlight to the row for `id` without announcing it.
    /// Drops the filter if it hides that row.
    pub fn highlight_row(&mut self, id: &str) {
        if let Some(pos) = self.row_position(id) {
            self.selected = Some(pos);
            return;
        }

        if self.filter.is_some() {
            self.filter = None;
            self.rerun_search();
            if let Some(pos) = self.row_position(id) {
                self.selected = Some(pos);
            }
        }
    }

    fn row_position(&self, id: &str) -> Option<usize> {
        self.visible_rows().iter().position(|r| r.id == id)
    }

    // --- wholesale teardown ---

    /// Remove every record and announce the cleared view.
    pub fn clear(&mut self) {
        self.cancel_search();
        self.store.clear();
        self.ids_by_url.clear();
        self.filter = None;
        self.selected = None;
        self.emit(ListEvent::ViewCleared);
    }

    // --- row density ---

    pub fn large_rows(&self) -> bool {
        self.large_rows
    }

    pub fn set_large_rows(&mut self, large_rows: bool) {
        if self.large_rows != large_rows {
            self.large_rows = large_rows;
            self.emit(ListEvent::RowSizeChanged { large_rows });
        }
    }

    pub fn toggle_large_rows(&mut self) {
        self.set_large_rows(!self.large_rows);
    }

    // --- mode flags, set by the controller ---

    pub fn brief_mode(&self) -> bool {
        self.brief_mode
    }

    pub fn set_brief_mode(&mut self, brief: bool) {
        self.brief_mode = brief;
    }

    pub fn allow_popover(&self) -> bool {
        self.allow_popover
    }

    pub fn set_allow_popover(&mut self, allow: bool) {
        self.allow_popover = allow;
    }

    pub fn allow_row_selection(&self) -> bool {
        self.allow_row_selection
    }

    pub fn set_allow_row_selection(&mut self, allow: bool) {
        self.allow_row_selection = allow;
    }

    // --- filtering ---

    pub fn filter_query(&self) -> Option<&str> {
        self.filter.as_ref().map(|f| f.text.as_str())
    }

    /// Narrow the grid to rows matching `query`; empty restores all rows.
    pub fn perform_filter(&mut self, query: &str) {
        self.filter = if query.is_empty() {
            None
        } else {
            Some(FilterQuery::new(query))
        };

        // Keep the highlight on a real row.
        let len = self.visible_rows().len();
        self.selected = match self.selected {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };

        self.rerun_search();
    }

    // --- searching ---

    pub fn search(&self) -> Option<&SearchSession> {
        self.search.as_ref()
    }

    /// Whether the visible row at `index` is a search match.
    pub fn is_match(&self, index: usize) -> bool {
        self.search
            .as_ref()
            .is_some_and(|s| s.matches.binary_search(&index).is_ok())
    }

    /// Run a search over the visible rows. Emits the match count, then
    /// the first match index when there is one. The highlight jumps to
    /// the first match.
    pub fn perform_search(&mut self, query: &str) {
        if query.is_empty() {
            self.cancel_search();
            return;
        }

        let lowered = query.to_lowercase();
        let matches: Vec<usize> = self
            .visible_rows()
            .iter()
            .enumerate()
            .filter(|(_, record)| record.url.to_lowercase().contains(&lowered))
            .map(|(i, _)| i)
            .collect();

        let count = matches.len();
        let current = if matches.is_empty() { None } else { Some(0) };
        if let Some(first) = matches.first() {
            self.selected = Some(*first);
        }

        self.search = Some(SearchSession {
            query: query.to_string(),
            matches,
            current,
        });

        self.emit(ListEvent::SearchCountUpdated { count });
        if current == Some(0) {
            self.emit(ListEvent::SearchIndexUpdated { index: 0 });
        }
    }

    pub fn jump_to_next_match(&mut self) {
        self.jump(1);
    }

    pub fn jump_to_previous_match(&mut self) {
        self.jump(-1);
    }

    fn jump(&mut self, direction: i64) {
        let Some(session) = &mut self.search else {
            return;
        };
        if session.matches.is_empty() {
            return;
        }

        let len = session.matches.len() as i64;
        let current = session.current.unwrap_or(0) as i64;
        let next = (current + direction).rem_euclid(len) as usize;
        session.current = Some(next);
        self.selected = Some(session.matches[next]);

        self.emit(ListEvent::SearchIndexUpdated { index: next });
    }

    /// Drop the search session. Emits a zero count so listeners reset.
    pub fn cancel_search(&mut self) {
        if self.search.take().is_some() {
            self.emit(ListEvent::SearchCountUpdated { count: 0 });
        }
    }

    fn rerun_search(&mut self) {
        if let Some(session) = self.search.take() {
            self.perform_search(&session.query);
        }
    }

    // --- shell hooks ---

    pub fn status_bar_items(&self) -> Vec<StatusBarItem> {
        vec![
            StatusBarItem {
                key: "c",
                label: "clear",
            },
            StatusBarItem {
                key: "d",
                label: "density",
            },
            StatusBarItem {
                key: "/",
                label: "search",
            },
            StatusBarItem {
                key: "f",
                label: "filter",
            },
        ]
    }

    pub fn scroll_restore_regions(&self) -> Vec<ScrollRegion> {
        vec![ScrollRegion::RecordList]
    }
}
