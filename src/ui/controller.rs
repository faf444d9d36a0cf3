//! # Panel Controller
//!
//! Drives the requests panel between its two modes. Grid shows every
//! record full-width; Detail splits the panel into a brief grid plus an
//! inspector for one record.
//!
//! The controller owns the [`ListView`] outright and drains its event
//! queue after every command, so reactions always run in emit order and
//! there is no listener registration to tear down. A [`DetailView`]
//! exists exactly while the panel is in Detail mode, and opening a
//! record always builds a fresh view, even for the record already shown.

use crossterm::event::{KeyCode, KeyEvent};
use std::sync::{Arc, Mutex};

use crate::record::{Anchor, Record, RecordStore};
use crate::ui::context_menu::{ContextMenu, ContextMenuContributor, MenuAction, MenuTarget};
use crate::ui::detail_view::DetailView;
use crate::ui::list_view::{ListEvent, ListView};
use crate::ui::panel::{Panel, PanelId, ScrollRegion, SearchStatusSink, StatusBarItem};

/// The two presentation modes of the requests panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Detail,
}

/// Grid row density, mirrored from the list's row size toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDensity {
    #[default]
    Compact,
    Spacious,
}

/// Container flags the layout reads when drawing the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerState {
    /// Set while a record is open in the detail pane.
    pub viewing_record: bool,
    pub density: RowDensity,
}

/// State machine for the requests panel.
pub struct PanelController {
    list: ListView,
    visible_view: Option<DetailView>,
    container: ContainerState,
    search_status: Arc<Mutex<dyn SearchStatusSink>>,
}

impl PanelController {
    pub fn new(store: RecordStore, search_status: Arc<Mutex<dyn SearchStatusSink>>) -> Self {
        Self {
            list: ListView::new(store),
            visible_view: None,
            container: ContainerState::default(),
            search_status,
        }
    }

    pub fn mode(&self) -> ViewMode {
        if self.visible_view.is_some() {
            ViewMode::Detail
        } else {
            ViewMode::Grid
        }
    }

    pub fn container(&self) -> ContainerState {
        self.container
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn visible_view(&self) -> Option<&DetailView> {
        self.visible_view.as_ref()
    }

    pub fn visible_view_mut(&mut self) -> Option<&mut DetailView> {
        self.visible_view.as_mut()
    }

    // --- event dispatch ---

    /// Drain the list's queue, reacting to each event in order. Commands
    /// that can make the list emit call this before returning.
    fn pump(&mut self) {
        while let Some(event) = self.list.poll_event() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: ListEvent) {
        match event {
            ListEvent::ViewCleared => self.on_view_cleared(),
            ListEvent::RowSizeChanged { large_rows } => self.on_row_size_changed(large_rows),
            ListEvent::RequestSelected { record } => self.on_request_selected(record),
            ListEvent::SearchCountUpdated { count } => self.forward_match_count(count),
            ListEvent::SearchIndexUpdated { index } => self.forward_match_index(index),
        }
    }

    /// The grid lost all its records: whatever was open is gone with
    /// them, so fall back to Grid. Safe to run in any mode.
    fn on_view_cleared(&mut self) {
        self.visible_view = None;
        self.leave_viewing_mode();
    }

    fn on_row_size_changed(&mut self, large_rows: bool) {
        self.container.density = if large_rows {
            RowDensity::Spacious
        } else {
            RowDensity::Compact
        };
    }

    /// A row was committed. A `None` record is a commit over an empty
    /// grid and changes nothing.
    fn on_request_selected(&mut self, record: Option<Arc<Record>>) {
        let Some(record) = record else {
            return;
        };
        self.show_record(record);
    }

    fn forward_match_count(&self, count: usize) {
        if let Ok(mut sink) = self.search_status.lock() {
            sink.update_match_count(count, PanelId::Requests);
        }
    }

    fn forward_match_index(&self, index: usize) {
        if let Ok(mut sink) = self.search_status.lock() {
            sink.update_current_match_index(index, PanelId::Requests);
        }
    }

    // --- mode transitions ---

    fn show_record(&mut self, record: Arc<Record>) {
        self.enter_viewing_mode();
        // Assignment drops any previous view; a detail view is never
        // rebound to another record.
        self.visible_view = Some(DetailView::new(record));
    }

    fn enter_viewing_mode(&mut self) {
        if self.container.viewing_record {
            return;
        }
        self.container.viewing_record = true;
        self.list.set_brief_mode(true);
        self.list.set_allow_popover(false);
        self.list.set_allow_row_selection(true);
    }

    fn leave_viewing_mode(&mut self) {
        if !self.container.viewing_record {
            return;
        }
        self.container.viewing_record = false;
        self.list.set_brief_mode(false);
        self.list.set_allow_popover(true);
        self.list.set_allow_row_selection(false);
    }

    /// Close the detail pane and return to Grid. Already in Grid: does
    /// nothing at all.
    pub fn close_detail(&mut self) {
        if self.mode() != ViewMode::Detail {
            return;
        }
        self.visible_view = None;
        self.leave_viewing_mode();
    }

    // --- anchors and reveal ---

    /// Resolve an anchor to a record: by id when one is set, otherwise
    /// by URL. An anchor with an id that misses does not fall back.
    pub fn resolve_anchor(&self, anchor: &Anchor) -> Option<Arc<Record>> {
        if let Some(id) = &anchor.request_id {
            return self.list.record_by_id(id);
        }
        anchor
            .href
            .as_deref()
            .and_then(|href| self.list.record_by_url(href))
    }

    pub fn can_resolve(&self, anchor: &Anchor) -> bool {
        self.resolve_anchor(anchor).is_some()
    }

    /// Open `record` in the detail pane from anywhere, moving the grid
    /// highlight onto it. Works the same in both modes.
    pub fn reveal(&mut self, record: Arc<Record>) {
        self.list.highlight_row(&record.id);
        self.pump();
        self.show_record(record);
    }

    /// Resolve and reveal; an anchor that resolves to nothing is
    /// ignored.
    pub fn reveal_anchor(&mut self, anchor: &Anchor) {
        if let Some(record) = self.resolve_anchor(anchor) {
            self.reveal(record);
        }
    }

    // --- grid commands ---

    pub fn select_next(&mut self) {
        self.list.select_next();
        self.pump();
    }

    pub fn select_previous(&mut self) {
        self.list.select_previous();
        self.pump();
    }

    pub fn open_selected(&mut self) {
        self.list.open_selected();
        self.pump();
    }

    pub fn clear_records(&mut self) {
        self.list.clear();
        self.pump();
    }

    pub fn toggle_density(&mut self) {
        self.list.toggle_large_rows();
        self.pump();
    }

    // --- search facade ---

    pub fn perform_search(&mut self, query: &str) {
        self.list.perform_search(query);
        self.pump();
    }

    pub fn perform_filter(&mut self, query: &str) {
        self.list.perform_filter(query);
        self.pump();
    }

    pub fn jump_to_next_match(&mut self) {
        self.list.jump_to_next_match();
        self.pump();
    }

    pub fn jump_to_previous_match(&mut self) {
        self.list.jump_to_previous_match();
        self.pump();
    }

    pub fn cancel_search(&mut self) {
        self.list.cancel_search();
        self.pump();
    }

    pub fn can_filter(&self) -> bool {
        true
    }

    // --- queries ---

    pub fn records(&self) -> &[Arc<Record>] {
        self.list.records()
    }

    pub fn record_by_id(&self, id: &str) -> Option<Arc<Record>> {
        self.list.record_by_id(id)
    }

    pub fn selected_record(&self) -> Option<Arc<Record>> {
        self.list.selected_record()
    }
}

impl Panel for PanelController {
    fn id(&self) -> PanelId {
        PanelId::Requests
    }

    /// Cancel closes the detail pane while one is open; everything else
    /// falls through to the shell.
    fn handle_shortcut(&mut self, key: &KeyEvent) -> bool {
        if self.container.viewing_record && key.code == KeyCode::Esc {
            self.close_detail();
            return true;
        }
        false
    }

    fn status_bar_items(&self) -> Vec<StatusBarItem> {
        self.list.status_bar_items()
    }

    fn scroll_restore_regions(&self) -> Vec<ScrollRegion> {
        self.list.scroll_restore_regions()
    }
}

impl ContextMenuContributor for PanelController {
    /// Offer "reveal" for any record except the one already on screen.
    fn append_applicable_items(&self, menu: &mut ContextMenu, target: &MenuTarget) {
        let MenuTarget::Record(record) = target else {
            return;
        };

        if let Some(view) = &self.visible_view {
            if view.shows(&record.id) {
                return;
            }
        }

        menu.push(
            "Reveal in Requests panel",
            MenuAction::RevealRecord {
                panel: PanelId::Requests,
                record_id: record.id.clone(),
            },
        );
    }
}
