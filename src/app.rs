use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use ccup_api::Snapshot;
use log::warn;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Standings,
    Matchups,
    Bracket,
    Teams,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let app = Self::with_settings(AppSettings::load());

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_snapshot_loaded(&mut self, snapshot: Snapshot) {
        self.state.last_error = None;
        self.state.tournament.load(snapshot);
    }

    /// A failed refresh keeps whatever was on screen.
    pub fn on_error(&mut self, message: String) {
        if self.state.tournament.view.is_some() {
            warn!("refresh failed, keeping previous snapshot: {message}");
        }
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        self.state.scroll_offset = 0;
        self.state.scroll_limit = None;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn scroll_down(&mut self) {
        if self.state.scroll_limit.is_none_or(|limit| self.state.scroll_offset < limit) {
            self.state.scroll_offset = self.state.scroll_offset.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.state.scroll_offset = self.state.scroll_offset.saturating_sub(1);
    }

    /// Record how far the active tab can scroll and pull the offset back within it.
    pub fn set_scroll_limit(&mut self, limit: u16) {
        self.state.scroll_limit = Some(limit);
        self.state.scroll_offset = self.state.scroll_offset.min(limit);
    }
}
