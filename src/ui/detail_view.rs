//! # Detail View
//!
//! Per-record inspector shown next to the brief grid. A view is built for
//! exactly one record and thrown away when another record is opened;
//! nothing in here is ever rebound to a different record.

use std::sync::Arc;

use crate::record::Record;

/// Tabs of the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Summary,
    Headers,
    Response,
    Timing,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Summary,
        DetailTab::Headers,
        DetailTab::Response,
        DetailTab::Timing,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Summary => "Summary",
            DetailTab::Headers => "Headers",
            DetailTab::Response => "Response",
            DetailTab::Timing => "Timing",
        }
    }

    pub fn next(self) -> DetailTab {
        match self {
            DetailTab::Summary => DetailTab::Headers,
            DetailTab::Headers => DetailTab::Response,
            DetailTab::Response => DetailTab::Timing,
            DetailTab::Timing => DetailTab::Summary,
        }
    }
}

/// Inspector state for one record.
#[derive(Debug)]
pub struct DetailView {
    record: Arc<Record>,
    tab: DetailTab,
    scroll: u16,
}

impl DetailView {
    pub fn new(record: Arc<Record>) -> Self {
        Self {
            record,
            tab: DetailTab::Summary,
            scroll: 0,
        }
    }

    pub fn record(&self) -> &Arc<Record> {
        &self.record
    }

    /// Whether this view is showing the record with the given id.
    pub fn shows(&self, record_id: &str) -> bool {
        self.record.id == record_id
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
        self.scroll = 0;
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}
