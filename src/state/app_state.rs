use crate::app::MenuItem;
use ccup_api::{Snapshot, TournamentView, derive_view};
use chrono::{DateTime, Local};

// ---------------------------------------------------------------------------
// Tournament state
// ---------------------------------------------------------------------------

/// The live snapshot and the view derived from it. Both are replaced together.
#[derive(Debug, Default)]
pub struct TournamentState {
    pub snapshot: Option<Snapshot>,
    pub view: Option<TournamentView>,
    /// When `view` was last derived.
    pub last_updated: Option<DateTime<Local>>,
}

impl TournamentState {
    pub fn load(&mut self, snapshot: Snapshot) {
        let view = derive_view(&snapshot, snapshot.current_week());
        self.snapshot = Some(snapshot);
        self.view = Some(view);
        self.last_updated = Some(Local::now());
    }

    pub fn last_updated_label(&self) -> Option<String> {
        self.last_updated.map(|t| t.format("%H:%M:%S").to_string())
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// Most recent refresh failure; cleared by the next successful load.
    pub last_error: Option<String>,
    pub tournament: TournamentState,
    /// Vertical scroll of the active tab. Reset on tab change.
    pub scroll_offset: u16,
    /// Largest offset the last draw of the active tab could use; `None` until drawn.
    pub scroll_limit: Option<u16>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccup_api::{Franchise, Sheet};
    use ccup_api::record::Record;

    #[test]
    fn load_derives_view_for_configured_week() {
        let mut snapshot = Snapshot::default();
        snapshot.set_table(
            Sheet::Config,
            vec![Record::new(vec![ccup_api::CURRENT_WEEK_KEY.into(), 15.0.into()])],
        );
        snapshot.franchises.push(Franchise { name: "Alpha".into(), ..Default::default() });

        let mut state = TournamentState::default();
        assert!(state.last_updated_label().is_none());
        state.load(snapshot);

        let view = state.view.as_ref().expect("view derived");
        assert_eq!(view.week, 15);
        assert_eq!(view.summary.total_teams, 1);
        assert!(state.snapshot.is_some());
        let label = state.last_updated_label().expect("timestamp");
        assert_eq!(label.len(), "HH:MM:SS".len());
    }
}
