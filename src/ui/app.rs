//! # Application Shell
//!
//! Hosts the panels and routes key presses. Keys flow through the modal
//! layers first (help overlay, input line, context menu), then the
//! active panel gets a shot via its shortcut hook, and whatever is left
//! lands on the shell's own bindings for that panel.

use crossterm::event::{KeyCode, KeyEvent};
use std::sync::{Arc, Mutex};

use crate::record::RecordStore;
use crate::ui::clipboard;
use crate::ui::config::Config;
use crate::ui::context_menu::{ContextMenu, ContextMenuContributor, MenuAction, MenuTarget};
use crate::ui::controller::{PanelController, RowDensity};
use crate::ui::overview::OverviewPanel;
use crate::ui::panel::{Panel, PanelId, SearchStatusBar, SearchStatusSink, StatusBarItem};
use crate::ui::theme::Theme;

/// What the footer input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Filter,
}

pub struct App {
    pub requests: PanelController,
    pub overview: OverviewPanel,
    pub active_panel: PanelId,
    pub search_status: Arc<Mutex<SearchStatusBar>>,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub context_menu: Option<ContextMenu>,
    pub show_info: bool,
    pub should_quit: bool,
    pub theme: Theme,
    pub config: Config,
}

impl App {
    pub fn new(store: RecordStore, config: Config) -> Self {
        let search_status = Arc::new(Mutex::new(SearchStatusBar::default()));
        let sink: Arc<Mutex<dyn SearchStatusSink>> = search_status.clone();

        let mut requests = PanelController::new(store, sink);
        if config.large_rows {
            requests.toggle_density();
        }
        let overview = OverviewPanel::new(requests.records());
        let theme = Theme::by_name(&config.theme)
            .unwrap_or_else(Theme::default_theme)
            .clone();

        Self {
            requests,
            overview,
            active_panel: PanelId::Requests,
            search_status,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            context_menu: None,
            show_info: false,
            should_quit: false,
            theme,
            config,
        }
    }

    /// Route one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // The help overlay swallows everything except its close keys.
        if self.show_info {
            if matches!(
                key.code,
                KeyCode::Char('i') | KeyCode::Esc | KeyCode::Char('q')
            ) {
                self.show_info = false;
            }
            return;
        }

        if self.input_mode != InputMode::Normal {
            self.handle_input_key(key);
            return;
        }

        if self.context_menu.is_some() {
            self.handle_menu_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('i') => {
                self.show_info = true;
                return;
            }
            KeyCode::Char('1') => {
                self.activate_panel(PanelId::Requests);
                return;
            }
            KeyCode::Char('2') => {
                self.activate_panel(PanelId::Overview);
                return;
            }
            KeyCode::Char('t') => {
                self.cycle_theme();
                return;
            }
            _ => {}
        }

        // The active panel intercepts before the shell's own bindings.
        if self.active_panel_handles(&key) {
            return;
        }

        match self.active_panel {
            PanelId::Requests => self.handle_requests_key(key),
            PanelId::Overview => self.handle_overview_key(key),
        }
    }

    fn active_panel_handles(&mut self, key: &KeyEvent) -> bool {
        match self.active_panel {
            PanelId::Requests => self.requests.handle_shortcut(key),
            PanelId::Overview => self.overview.handle_shortcut(key),
        }
    }

    fn handle_requests_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.requests.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.requests.select_previous(),
            KeyCode::Enter => self.requests.open_selected(),
            KeyCode::Char('c') => {
                self.requests.clear_records();
                self.overview.refresh(self.requests.records());
            }
            KeyCode::Char('d') => {
                self.requests.toggle_density();
                self.config.large_rows =
                    self.requests.container().density == RowDensity::Spacious;
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.input_buffer.clear();
            }
            KeyCode::Char('f') => {
                self.input_mode = InputMode::Filter;
                self.input_buffer = self
                    .requests
                    .list()
                    .filter_query()
                    .unwrap_or_default()
                    .to_string();
            }
            KeyCode::Char('n') => self.requests.jump_to_next_match(),
            KeyCode::Char('N') => self.requests.jump_to_previous_match(),
            KeyCode::Char('m') => self.open_context_menu(),
            KeyCode::Char('y') => self.yank_url(),
            KeyCode::Tab => {
                if let Some(view) = self.requests.visible_view_mut() {
                    view.next_tab();
                }
            }
            KeyCode::PageDown => {
                if let Some(view) = self.requests.visible_view_mut() {
                    view.scroll_down();
                }
            }
            KeyCode::PageUp => {
                if let Some(view) = self.requests.visible_view_mut() {
                    view.scroll_up();
                }
            }
            _ => {}
        }
    }

    fn handle_overview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.overview.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.overview.select_previous(),
            KeyCode::Char('m') => self.open_context_menu(),
            KeyCode::Enter => self.reveal_selected_failure(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                match self.input_mode {
                    InputMode::Search => self.requests.cancel_search(),
                    InputMode::Filter => self.requests.perform_filter(""),
                    InputMode::Normal => {}
                }
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                // Keep the session; just leave the input line.
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.apply_input();
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.apply_input();
            }
            _ => {}
        }
    }

    /// Searches and filters apply live while typing.
    fn apply_input(&mut self) {
        match self.input_mode {
            InputMode::Search => self.requests.perform_search(&self.input_buffer),
            InputMode::Filter => self.requests.perform_filter(&self.input_buffer),
            InputMode::Normal => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('m') => self.context_menu = None,
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(menu) = &mut self.context_menu {
                    menu.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(menu) = &mut self.context_menu {
                    menu.select_previous();
                }
            }
            KeyCode::Enter => {
                let action = self
                    .context_menu
                    .take()
                    .and_then(|menu| menu.selected_action().cloned());
                if let Some(action) = action {
                    self.invoke_menu_action(action);
                }
            }
            _ => {}
        }
    }

    /// Assemble a menu for whatever the active panel points at. Nothing
    /// under the cursor means no menu.
    fn open_context_menu(&mut self) {
        let target = match self.active_panel {
            PanelId::Requests => self.requests.selected_record().map(MenuTarget::Record),
            PanelId::Overview => self.overview.anchor_for_selected().map(|anchor| {
                match self.requests.resolve_anchor(&anchor) {
                    Some(record) => MenuTarget::Record(record),
                    None => MenuTarget::Text(anchor.href.unwrap_or_default()),
                }
            }),
        };
        let Some(target) = target else {
            return;
        };

        let mut menu = ContextMenu::default();
        self.requests.append_applicable_items(&mut menu, &target);
        append_copy_items(&mut menu, &target);

        if !menu.is_empty() {
            self.context_menu = Some(menu);
        }
    }

    fn invoke_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::RevealRecord { panel, record_id } => {
                self.activate_panel(panel);
                // The record may have been cleared since the menu opened.
                if let Some(record) = self.requests.record_by_id(&record_id) {
                    self.requests.reveal(record);
                }
            }
            MenuAction::CopyUrl { url } => {
                // Best effort; terminals without OSC 52 ignore it.
                let _ = clipboard::copy_to_clipboard(&url);
            }
        }
    }

    pub fn activate_panel(&mut self, panel: PanelId) {
        if self.active_panel == panel {
            return;
        }
        match self.active_panel {
            PanelId::Requests => self.requests.was_hidden(),
            PanelId::Overview => self.overview.was_hidden(),
        }
        self.active_panel = panel;
        match panel {
            PanelId::Requests => self.requests.was_shown(),
            PanelId::Overview => self.overview.was_shown(),
        }
    }

    fn reveal_selected_failure(&mut self) {
        if let Some(anchor) = self.overview.anchor_for_selected() {
            if self.requests.can_resolve(&anchor) {
                self.activate_panel(PanelId::Requests);
                self.requests.reveal_anchor(&anchor);
            }
        }
    }

    fn yank_url(&mut self) {
        let record = match self.requests.visible_view() {
            Some(view) => Some(Arc::clone(view.record())),
            None => self.requests.selected_record(),
        };
        if let Some(record) = record {
            let _ = clipboard::copy_to_clipboard(&record.url);
        }
    }

    fn cycle_theme(&mut self) {
        self.theme = self.theme.following().clone();
        self.config.theme = self.theme.name.to_string();
    }

    /// Footer hints for the active panel.
    pub fn active_status_bar_items(&self) -> Vec<StatusBarItem> {
        match self.active_panel {
            PanelId::Requests => self.requests.status_bar_items(),
            PanelId::Overview => self.overview.status_bar_items(),
        }
    }
}

fn append_copy_items(menu: &mut ContextMenu, target: &MenuTarget) {
    match target {
        MenuTarget::Record(record) => menu.push(
            "Copy URL",
            MenuAction::CopyUrl {
                url: record.url.clone(),
            },
        ),
        MenuTarget::Text(text) => menu.push(
            "Copy",
            MenuAction::CopyUrl { url: text.clone() },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, Timings};
    use chrono::Utc;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn make_record(id: &str, url: &str, status: u16) -> Record {
        Record {
            id: id.to_string(),
            url: url.to_string(),
            method: "GET".to_string(),
            status,
            status_text: "OK".to_string(),
            mime_type: "text/html".to_string(),
            started_at: Utc::now(),
            duration_ms: 10.0,
            request_headers: Vec::new(),
            response_headers: Vec::new(),
            response_body: None,
            response_size: 100,
            timings: Timings::default(),
        }
    }

    fn make_app() -> App {
        let store = RecordStore::new(vec![
            make_record("r1", "https://a.example/", 200),
            make_record("r2", "https://a.example/api/users", 200),
            make_record("r3", "https://a.example/broken", 500),
        ]);
        App::new(store, Config::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_new_app_defaults() {
        let app = make_app();
        assert_eq!(app.active_panel, PanelId::Requests);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
        assert!(app.context_menu.is_none());
        assert_eq!(app.theme.name, "Catppuccin Mocha");
    }

    #[test]
    fn test_config_density_applies_at_startup() {
        let store = RecordStore::new(vec![make_record("r1", "https://a.example/", 200)]);
        let config = Config {
            large_rows: true,
            ..Config::default()
        };

        let app = App::new(store, config);
        assert_eq!(app.requests.container().density, RowDensity::Spacious);
    }

    #[test]
    fn test_quit_key() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_panel_switch_keys() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.active_panel, PanelId::Overview);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.active_panel, PanelId::Requests);
    }

    #[test]
    fn test_activate_panel_is_idempotent() {
        let mut app = make_app();
        app.activate_panel(PanelId::Requests);
        assert_eq!(app.active_panel, PanelId::Requests);
    }

    #[test]
    fn test_info_overlay_swallows_keys() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('i')));
        assert!(app.show_info);

        // Panel keys do nothing while the overlay is up.
        app.handle_key(key(KeyCode::Enter));
        assert!(app.requests.visible_view().is_none());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_info);
    }

    #[test]
    fn test_density_key_updates_config() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.config.large_rows);
        app.handle_key(key(KeyCode::Char('d')));
        assert!(!app.config.large_rows);
    }

    #[test]
    fn test_theme_cycle_updates_config() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(app.theme.name, "Catppuccin Macchiato");
        assert_eq!(app.config.theme, "Catppuccin Macchiato");
    }

    #[test]
    fn test_search_input_is_live() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);

        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('p')));
        app.handle_key(key(KeyCode::Char('i')));

        let status = app.search_status.lock().unwrap();
        assert_eq!(status.match_count(), Some(1));
    }

    #[test]
    fn test_menu_opens_on_selected_record() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('m')));

        let menu = app.context_menu.as_ref().expect("menu open");
        // Grid mode: reveal plus copy.
        assert_eq!(menu.len(), 2);
    }

    #[test]
    fn test_menu_reveal_action_opens_detail() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('m')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.context_menu.is_none());
        assert!(app.requests.visible_view().expect("detail open").shows("r1"));
    }

    #[test]
    fn test_overview_reveal_failure() {
        let mut app = make_app();
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.active_panel, PanelId::Requests);
        assert!(app.requests.visible_view().expect("detail open").shows("r3"));
    }
}
