//! # Panel Capabilities
//!
//! The small trait surface the app shell works against. Panels expose an
//! identity, a shortcut hook that runs before the shell's own bindings,
//! and the items the footer shows while they are active.
//!
//! Search status flows the other way: panels report match counts into a
//! shared [`SearchStatusBar`] through the [`SearchStatusSink`] trait, so
//! the footer has one place to read from no matter which panel searched.

use crossterm::event::KeyEvent;

/// Identity of a top-level panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelId {
    Requests,
    Overview,
}

impl PanelId {
    pub fn title(self) -> &'static str {
        match self {
            PanelId::Requests => "Requests",
            PanelId::Overview => "Overview",
        }
    }
}

/// One key hint in the footer, e.g. `[c] clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBarItem {
    pub key: &'static str,
    pub label: &'static str,
}

/// A scrollable area whose position survives the panel being hidden and
/// shown again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRegion {
    RecordList,
    DetailPane,
    FailureList,
}

/// Behavior every top-level panel provides to the shell.
pub trait Panel {
    fn id(&self) -> PanelId;

    /// Called when the panel becomes the active one.
    fn was_shown(&mut self) {}

    /// Called when another panel takes over.
    fn was_hidden(&mut self) {}

    /// First crack at a key press. Return `true` to consume it; `false`
    /// hands the key back to the shell's own bindings.
    fn handle_shortcut(&mut self, key: &KeyEvent) -> bool;

    /// Footer hints shown while this panel is active.
    fn status_bar_items(&self) -> Vec<StatusBarItem>;

    /// Regions whose scroll position should be restored on re-show.
    fn scroll_restore_regions(&self) -> Vec<ScrollRegion>;
}

/// Receiver for search progress reported by a panel.
pub trait SearchStatusSink {
    fn update_match_count(&mut self, count: usize, owner: PanelId);
    fn update_current_match_index(&mut self, index: usize, owner: PanelId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchStatus {
    owner: PanelId,
    count: usize,
    index: Option<usize>,
}

/// Shared aggregator behind the footer's match display.
///
/// A new count resets the current index; the index only means something
/// relative to the count reported just before it.
#[derive(Debug, Default)]
pub struct SearchStatusBar {
    status: Option<SearchStatus>,
}

impl SearchStatusBar {
    pub fn match_count(&self) -> Option<usize> {
        self.status.map(|s| s.count)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.status.and_then(|s| s.index)
    }

    pub fn owner(&self) -> Option<PanelId> {
        self.status.map(|s| s.owner)
    }

    /// Footer text, e.g. `3/7 matches`, or `None` when nothing was
    /// searched yet.
    pub fn display(&self) -> Option<String> {
        let status = self.status?;
        match status.index {
            Some(index) => Some(format!("{}/{} matches", index + 1, status.count)),
            None if status.count == 1 => Some("1 match".to_string()),
            None => Some(format!("{} matches", status.count)),
        }
    }
}

impl SearchStatusSink for SearchStatusBar {
    fn update_match_count(&mut self, count: usize, owner: PanelId) {
        self.status = Some(SearchStatus {
            owner,
            count,
            index: None,
        });
    }

    fn update_current_match_index(&mut self, index: usize, owner: PanelId) {
        match &mut self.status {
            Some(status) if status.owner == owner => status.index = Some(index),
            _ => {
                self.status = Some(SearchStatus {
                    owner,
                    count: 0,
                    index: Some(index),
                });
            }
        }
    }
}
