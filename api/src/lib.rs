pub mod bracket;
pub mod cell;
pub mod client;
pub mod directory;
pub mod gviz;
pub mod phase;
pub mod record;
pub mod schedule;
pub mod standings;
pub mod view;

pub use cell::{Cell, TeamId, format_score, to_number};
pub use directory::{TeamDirectory, TeamInfo};
pub use phase::{Phase, PhaseStatus, resolve_phase};
pub use record::Record;
pub use view::{DashboardSummary, TournamentView, derive_view};

use chrono::{DateTime, Utc};

/// Config key holding the NFL week that drives phase resolution.
pub const CURRENT_WEEK_KEY: &str = "Current NFL Week";
/// Week assumed when the config sheet has no current-week row.
pub const FALLBACK_WEEK: i64 = 10;

// ---------------------------------------------------------------------------
// Source tables
// ---------------------------------------------------------------------------

/// The six sheets that make up one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Franchises,
    GroupMatchups,
    GroupStandings,
    BracketMatchups,
    LiveScoring,
    Config,
}

impl Sheet {
    pub const ALL: [Sheet; 6] = [
        Sheet::Franchises,
        Sheet::GroupMatchups,
        Sheet::GroupStandings,
        Sheet::BracketMatchups,
        Sheet::LiveScoring,
        Sheet::Config,
    ];

    /// Sheet (tab) name in the spreadsheet.
    pub fn name(&self) -> &'static str {
        match self {
            Sheet::Franchises => "franchises",
            Sheet::GroupMatchups => "group matchups",
            Sheet::GroupStandings => "group standings",
            Sheet::BracketMatchups => "bracket matchups",
            Sheet::LiveScoring => "live scoring",
            Sheet::Config => "Config",
        }
    }
}

// ---------------------------------------------------------------------------
// Typed records: column positions are resolved here and nowhere else
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Franchise {
    pub name: String,
    pub owner: String,
    pub logo: Option<String>,
    pub team_id: Option<TeamId>,
}

impl From<&Record> for Franchise {
    fn from(r: &Record) -> Self {
        Self {
            name: r.get(1).to_string(),
            owner: r.get(3).to_string(),
            logo: Some(r.get(7).to_string()).filter(|s| !s.is_empty()),
            team_id: TeamId::from_cell(r.get(8)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingEntry {
    pub group: Cell,
    pub team_id: Option<TeamId>,
    pub wins: Cell,
    pub losses: Cell,
    pub points_for: Cell,
    pub rank: Cell,
}

impl From<&Record> for StandingEntry {
    fn from(r: &Record) -> Self {
        Self {
            group: r.get(0).clone(),
            team_id: TeamId::from_cell(r.get(1)),
            wins: r.get(2).clone(),
            losses: r.get(3).clone(),
            points_for: r.get(4).clone(),
            rank: r.get(6).clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMatchup {
    pub week: Cell,
    pub group: Cell,
    pub home_label: Cell,
    pub away_label: Cell,
    pub home_id: Option<TeamId>,
    pub away_id: Option<TeamId>,
    pub home_score: Cell,
    pub away_score: Cell,
    pub winner_id: Option<TeamId>,
}

impl From<&Record> for GroupMatchup {
    fn from(r: &Record) -> Self {
        Self {
            week: r.get(0).clone(),
            group: r.get(2).clone(),
            home_label: r.get(3).clone(),
            away_label: r.get(4).clone(),
            home_id: TeamId::from_cell(r.get(6)),
            away_id: TeamId::from_cell(r.get(7)),
            home_score: r.get(8).clone(),
            away_score: r.get(9).clone(),
            winner_id: TeamId::from_cell(r.get(10)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BracketMatchup {
    /// Ordinal (1..4) in older sheets, round name ("Elite 8") in newer ones.
    pub round: Cell,
    pub home_seed: Cell,
    pub away_seed: Cell,
    pub home_id: Option<TeamId>,
    pub away_id: Option<TeamId>,
    pub home_score: Cell,
    pub away_score: Cell,
    pub winner_id: Option<TeamId>,
}

impl From<&Record> for BracketMatchup {
    fn from(r: &Record) -> Self {
        Self {
            round: r.get(0).clone(),
            home_seed: r.get(4).clone(),
            away_seed: r.get(5).clone(),
            home_id: TeamId::from_cell(r.get(6)),
            away_id: TeamId::from_cell(r.get(7)),
            home_score: r.get(8).clone(),
            away_score: r.get(9).clone(),
            winner_id: TeamId::from_cell(r.get(10)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigEntry {
    pub key: Cell,
    pub value: Cell,
}

impl From<&Record> for ConfigEntry {
    fn from(r: &Record) -> Self {
        Self { key: r.get(0).clone(), value: r.get(1).clone() }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything fetched in one refresh cycle. Never patched, only replaced.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub franchises: Vec<Franchise>,
    pub group_matchups: Vec<GroupMatchup>,
    pub group_standings: Vec<StandingEntry>,
    pub bracket_matchups: Vec<BracketMatchup>,
    pub live_scoring: Vec<Record>,
    pub config: Vec<ConfigEntry>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Convert one sheet's normalized rows into its typed table.
    pub fn set_table(&mut self, sheet: Sheet, records: Vec<Record>) {
        match sheet {
            Sheet::Franchises => self.franchises = records.iter().map(Franchise::from).collect(),
            Sheet::GroupMatchups => {
                self.group_matchups = records.iter().map(GroupMatchup::from).collect()
            }
            Sheet::GroupStandings => {
                self.group_standings = records.iter().map(StandingEntry::from).collect()
            }
            Sheet::BracketMatchups => {
                self.bracket_matchups = records.iter().map(BracketMatchup::from).collect()
            }
            Sheet::LiveScoring => self.live_scoring = records,
            Sheet::Config => self.config = records.iter().map(ConfigEntry::from).collect(),
        }
    }

    /// The configured NFL week, or `FALLBACK_WEEK` when the config row is missing.
    pub fn current_week(&self) -> i64 {
        self.config
            .iter()
            .find(|entry| entry.key.as_str() == Some(CURRENT_WEEK_KEY))
            .map(|entry| to_number(&entry.value).trunc() as i64)
            .unwrap_or(FALLBACK_WEEK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[Cell]) -> Record {
        Record::new(cells.to_vec())
    }

    #[test]
    fn franchise_columns() {
        let r = row(&[
            Cell::Number(1.0),
            "Alpha".into(),
            Cell::Null,
            "Ann".into(),
            Cell::Null,
            Cell::Null,
            Cell::Null,
            "https://img/alpha.png".into(),
            "T1".into(),
        ]);
        let f = Franchise::from(&r);
        assert_eq!(f.name, "Alpha");
        assert_eq!(f.owner, "Ann");
        assert_eq!(f.logo.as_deref(), Some("https://img/alpha.png"));
        assert_eq!(f.team_id, Some(TeamId::from("T1")));
    }

    #[test]
    fn short_rows_fill_with_null() {
        let m = GroupMatchup::from(&row(&[Cell::Number(2.0)]));
        assert_eq!(m.week, Cell::Number(2.0));
        assert!(m.home_id.is_none());
        assert!(m.winner_id.is_none());
        assert!(m.home_score.is_null());
    }

    #[test]
    fn current_week_reads_config_row() {
        let mut snapshot = Snapshot::default();
        snapshot.set_table(
            Sheet::Config,
            vec![
                row(&["Entry Fee".into(), Cell::Number(25.0)]),
                row(&[CURRENT_WEEK_KEY.into(), "14".into()]),
            ],
        );
        assert_eq!(snapshot.current_week(), 14);
    }

    #[test]
    fn current_week_falls_back_when_missing() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.current_week(), FALLBACK_WEEK);
    }

    #[test]
    fn live_scoring_is_kept_raw() {
        let mut snapshot = Snapshot::default();
        snapshot.set_table(Sheet::LiveScoring, vec![row(&["x".into()])]);
        assert_eq!(snapshot.live_scoring.len(), 1);
    }
}
