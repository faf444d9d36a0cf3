//! # Context Menu
//!
//! A menu is assembled fresh every time it opens: the shell passes the
//! target to each [`ContextMenuContributor`] and collects whatever items
//! they consider applicable. Selecting an item yields a [`MenuAction`]
//! for the shell to carry out after the menu closes.

use std::sync::Arc;

use crate::record::Record;
use crate::ui::panel::PanelId;

/// What the menu was opened on.
#[derive(Debug, Clone)]
pub enum MenuTarget {
    Record(Arc<Record>),
    Text(String),
}

/// An operation the shell performs on behalf of a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Activate `panel` and open the record there.
    RevealRecord { panel: PanelId, record_id: String },
    CopyUrl { url: String },
}

#[derive(Debug, Clone)]
pub struct ContextMenuItem {
    pub label: String,
    pub action: MenuAction,
}

/// The assembled menu plus its cursor.
#[derive(Debug, Default)]
pub struct ContextMenu {
    items: Vec<ContextMenuItem>,
    selected: usize,
}

impl ContextMenu {
    pub fn push(&mut self, label: &str, action: MenuAction) {
        self.items.push(ContextMenuItem {
            label: label.to_string(),
            action,
        });
    }

    pub fn items(&self) -> &[ContextMenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = if self.selected == 0 {
                self.items.len() - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn selected_action(&self) -> Option<&MenuAction> {
        self.items.get(self.selected).map(|item| &item.action)
    }
}

/// Implemented by components that can add items for a menu target.
pub trait ContextMenuContributor {
    fn append_applicable_items(&self, menu: &mut ContextMenu, target: &MenuTarget);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy(url: &str) -> MenuAction {
        MenuAction::CopyUrl {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_empty_menu() {
        let menu = ContextMenu::default();
        assert!(menu.is_empty());
        assert!(menu.selected_action().is_none());
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = ContextMenu::default();
        menu.push("Copy URL", copy("https://a.example/"));
        menu.push("Copy path", copy("/index.html"));

        assert_eq!(menu.selected(), 0);
        menu.select_next();
        assert_eq!(menu.selected(), 1);
        menu.select_next();
        assert_eq!(menu.selected(), 0);
        menu.select_previous();
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_selected_action() {
        let mut menu = ContextMenu::default();
        menu.push("Copy URL", copy("https://a.example/"));
        menu.push("Copy path", copy("/index.html"));
        menu.select_next();

        assert_eq!(menu.selected_action(), Some(&copy("/index.html")));
        assert_eq!(menu.len(), 2);
    }
}
