use crate::bracket::{BracketRoundView, resolve_bracket};
use crate::cell::{Cell, TeamId};
use crate::directory::TeamDirectory;
use crate::phase::{PhaseStatus, resolve_phase};
use crate::schedule::{ScheduleWeek, schedule_weeks};
use crate::standings::{GroupStandings, rank_groups};
use crate::Snapshot;

/// Score text for a matchup that has not been played.
pub const PENDING_SCORE: &str = "-";
/// Buy-in per franchise, in dollars.
pub const ENTRY_FEE: u32 = 25;

/// One side of a matchup, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSlot {
    pub team_id: Option<TeamId>,
    pub name: String,
    pub owner: String,
    /// Seed or slot label from the sheet ("1", "A2").
    pub label: String,
    pub score: String,
    pub is_winner: bool,
}

impl TeamSlot {
    pub fn new(
        directory: &TeamDirectory,
        team_id: Option<&TeamId>,
        label: &Cell,
        score: String,
        winner: Option<&TeamId>,
    ) -> Self {
        let team = directory.lookup(team_id);
        let is_winner = matches!((winner, team_id), (Some(w), Some(id)) if w == id);
        Self {
            team_id: team_id.cloned(),
            name: team.name.to_string(),
            owner: team.owner.to_string(),
            label: label.to_string(),
            score,
            is_winner,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub nfl_week: i64,
    pub total_teams: usize,
    /// Scored matchups in the current group week; zero outside the group stage.
    pub matchups_completed: usize,
    pub matchups_total: usize,
    pub prize_pool: u32,
}

/// Everything the display layer needs, derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentView {
    pub week: i64,
    pub phase: PhaseStatus,
    pub standings: Vec<GroupStandings>,
    pub schedule: Vec<ScheduleWeek>,
    pub bracket: Vec<BracketRoundView>,
    pub summary: DashboardSummary,
}

impl TournamentView {
    pub fn current_schedule_week(&self) -> Option<&ScheduleWeek> {
        self.schedule.iter().find(|w| w.is_current)
    }
}

/// Derive the full tournament view for `week`. Pure: same inputs, same view.
pub fn derive_view(snapshot: &Snapshot, week: i64) -> TournamentView {
    let directory = TeamDirectory::new(&snapshot.franchises);
    let phase = resolve_phase(week);

    let standings = rank_groups(&snapshot.group_standings, &directory);
    let schedule = schedule_weeks(&snapshot.group_matchups, phase.group_week, &directory);
    let bracket = resolve_bracket(&snapshot.bracket_matchups, phase.phase.bracket_round(), &directory);

    let (matchups_completed, matchups_total) = schedule
        .iter()
        .find(|w| w.is_current)
        .map(|w| (w.completed(), w.total()))
        .unwrap_or_default();
    let total_teams = snapshot.franchises.len();
    let summary = DashboardSummary {
        nfl_week: week,
        total_teams,
        matchups_completed,
        matchups_total,
        prize_pool: u32::try_from(total_teams).unwrap_or(u32::MAX).saturating_mul(ENTRY_FEE),
    };

    TournamentView { week, phase, standings, schedule, bracket, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::BracketRound;
    use crate::phase::Phase;
    use crate::{BracketMatchup, Franchise, GroupMatchup, StandingEntry};

    fn alpha() -> Franchise {
        Franchise { name: "Alpha".into(), owner: "Ann".into(), logo: None, team_id: Some("T1".into()) }
    }

    #[test]
    fn end_to_end_group_stage() {
        let snapshot = Snapshot {
            franchises: vec![alpha()],
            group_standings: vec![StandingEntry {
                group: "A".into(),
                team_id: Some("T1".into()),
                wins: Cell::Number(3.0),
                losses: Cell::Number(1.0),
                points_for: Cell::from("120.5"),
                rank: Cell::Number(1.0),
            }],
            ..Default::default()
        };

        let view = derive_view(&snapshot, 10);
        assert_eq!(view.phase.phase, Phase::GroupStage);
        assert_eq!(view.phase.detail, "Week 2 of 5");

        let group_a = &view.standings[0];
        assert_eq!(group_a.group, "A");
        assert_eq!(group_a.rows.len(), 1);
        let row = &group_a.rows[0];
        assert_eq!(row.name, "Alpha");
        assert_eq!(row.owner, "Ann");
        assert!(row.qualifying);
        assert_eq!(row.points_for, "120.50");
        assert_eq!((row.wins, row.losses), (3, 1));
    }

    #[test]
    fn empty_snapshot_derives_without_panicking() {
        let view = derive_view(&Snapshot::default(), Snapshot::default().current_week());
        assert_eq!(view.week, 10);
        assert_eq!(view.standings.len(), 4);
        assert!(view.standings.iter().all(|g| g.rows.is_empty()));
        assert!(view.schedule.is_empty());
        assert!(view.bracket.is_empty());
        assert_eq!(view.summary, DashboardSummary { nfl_week: 10, ..Default::default() });
    }

    #[test]
    fn summary_counts_current_week_matchups() {
        let played = GroupMatchup {
            week: Cell::Number(2.0),
            group: "A".into(),
            home_id: Some("T1".into()),
            away_id: Some("T2".into()),
            home_score: Cell::Number(88.0),
            away_score: Cell::Number(91.5),
            winner_id: Some("T2".into()),
            ..Default::default()
        };
        let pending = GroupMatchup { home_score: Cell::Null, away_score: Cell::Null, ..played.clone() };
        let other_week = GroupMatchup { week: Cell::Number(1.0), ..played.clone() };
        let snapshot = Snapshot {
            franchises: vec![alpha(), alpha(), alpha()],
            group_matchups: vec![played, pending, other_week],
            ..Default::default()
        };

        let view = derive_view(&snapshot, 10);
        assert_eq!(view.summary.matchups_completed, 1);
        assert_eq!(view.summary.matchups_total, 2);
        assert_eq!(view.summary.total_teams, 3);
        assert_eq!(view.summary.prize_pool, 75);
        assert_eq!(view.current_schedule_week().map(|w| w.week), Some(2));
    }

    #[test]
    fn elimination_phase_marks_current_round() {
        let snapshot = Snapshot {
            bracket_matchups: vec![
                BracketMatchup { round: Cell::Number(1.0), ..Default::default() },
                BracketMatchup { round: Cell::Number(2.0), ..Default::default() },
            ],
            ..Default::default()
        };
        let view = derive_view(&snapshot, 15);
        assert_eq!(view.phase.phase, Phase::Elite8);
        let current: Vec<BracketRound> = view.bracket.iter().filter(|r| r.is_current).map(|r| r.round).collect();
        assert_eq!(current, [BracketRound::Elite8]);
        assert_eq!(view.summary.matchups_total, 0);
    }

    #[test]
    fn slot_without_team_is_never_winner() {
        let directory = TeamDirectory::default();
        let slot = TeamSlot::new(&directory, None, &Cell::Null, PENDING_SCORE.into(), None);
        assert!(!slot.is_winner);
        assert_eq!(slot.name, "Unknown");
        assert_eq!(slot.label, "");
    }
}
