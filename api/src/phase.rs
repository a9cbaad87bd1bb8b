use crate::bracket::BracketRound;

/// First NFL week of group play.
pub const GROUP_STAGE_START: i64 = 9;
/// Number of group-play weeks (NFL weeks 9 through 13).
pub const GROUP_STAGE_WEEKS: u8 = 5;

/// Tournament phase, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    #[default]
    PreTournament,
    GroupStage,
    Sweet16,
    Elite8,
    Final4,
    Championship,
    Complete,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::PreTournament => "Pre-Tournament",
            Phase::GroupStage => "Group Stage",
            Phase::Sweet16 => "Sweet 16",
            Phase::Elite8 => "Elite 8",
            Phase::Final4 => "Final 4",
            Phase::Championship => "Championship",
            Phase::Complete => "Complete",
        }
    }

    /// Elimination round being played during this phase.
    pub fn bracket_round(&self) -> Option<BracketRound> {
        match self {
            Phase::Sweet16 => Some(BracketRound::Sweet16),
            Phase::Elite8 => Some(BracketRound::Elite8),
            Phase::Final4 => Some(BracketRound::Final4),
            Phase::Championship => Some(BracketRound::Championship),
            _ => None,
        }
    }
}

/// Phase plus the sub-phase line shown under it ("Week 2 of 5").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStatus {
    pub phase: Phase,
    pub detail: String,
    /// Group-play week 1..=5, only during the group stage.
    pub group_week: Option<u8>,
}

/// Resolve the phase for an NFL week. Total over every integer.
pub fn resolve_phase(week: i64) -> PhaseStatus {
    let group_week = group_week(week);
    let (phase, detail) = match week {
        w if w < GROUP_STAGE_START => (Phase::PreTournament, "Awaiting Start".to_string()),
        9..=13 => (
            Phase::GroupStage,
            format!("Week {} of {GROUP_STAGE_WEEKS}", week - 8),
        ),
        14 => (Phase::Sweet16, "Round 1".to_string()),
        15 => (Phase::Elite8, "Quarterfinals".to_string()),
        16 => (Phase::Final4, "Semifinals".to_string()),
        17 => (Phase::Championship, "Final".to_string()),
        _ => (Phase::Complete, "Season Ended".to_string()),
    };
    PhaseStatus { phase, detail, group_week }
}

/// Group-play week for an NFL week, `None` outside weeks 9..=13.
pub fn group_week(week: i64) -> Option<u8> {
    (9..=13).contains(&week).then(|| (week - 8) as u8)
}
