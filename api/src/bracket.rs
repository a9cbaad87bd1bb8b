use crate::cell::{Cell, format_score, to_number};
use crate::directory::TeamDirectory;
use crate::view::{PENDING_SCORE, TeamSlot};
use crate::BracketMatchup;
use log::debug;

/// Elimination rounds, ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BracketRound {
    Sweet16,
    Elite8,
    Final4,
    Championship,
}

impl BracketRound {
    pub const ALL: [BracketRound; 4] = [
        BracketRound::Sweet16,
        BracketRound::Elite8,
        BracketRound::Final4,
        BracketRound::Championship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BracketRound::Sweet16 => "Sweet 16",
            BracketRound::Elite8 => "Elite 8",
            BracketRound::Final4 => "Final 4",
            BracketRound::Championship => "Championship",
        }
    }

    /// 1-based position used by sheets that number their rounds.
    pub fn ordinal(&self) -> u8 {
        match self {
            BracketRound::Sweet16 => 1,
            BracketRound::Elite8 => 2,
            BracketRound::Final4 => 3,
            BracketRound::Championship => 4,
        }
    }

    /// Read a round tag: an ordinal (1..4, numeric or text) or a round name.
    /// Anything else is `None`.
    pub fn from_tag(tag: &Cell) -> Option<Self> {
        if let Cell::Text(s) = tag {
            let name: String = s
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            let named = match name.as_str() {
                "sweet16" | "sweetsixteen" => Some(BracketRound::Sweet16),
                "elite8" | "eliteeight" => Some(BracketRound::Elite8),
                "final4" | "finalfour" => Some(BracketRound::Final4),
                "championship" | "final" => Some(BracketRound::Championship),
                _ => None,
            };
            if named.is_some() {
                return named;
            }
        }
        let ordinal = to_number(tag);
        Self::ALL.into_iter().find(|r| f64::from(r.ordinal()) == ordinal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracketMatchView {
    pub home: TeamSlot,
    pub away: TeamSlot,
}

impl BracketMatchView {
    pub fn winner(&self) -> Option<&TeamSlot> {
        [&self.home, &self.away].into_iter().find(|side| side.is_winner)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BracketRoundView {
    pub round: BracketRound,
    pub is_current: bool,
    /// Sheet order.
    pub matches: Vec<BracketMatchView>,
}

/// Split bracket rows into rounds. Unknown round tags are dropped and empty
/// rounds are left out.
pub fn resolve_bracket(
    matchups: &[BracketMatchup],
    current: Option<BracketRound>,
    directory: &TeamDirectory,
) -> Vec<BracketRoundView> {
    let tagged: Vec<(BracketRound, &BracketMatchup)> = matchups
        .iter()
        .filter_map(|m| match BracketRound::from_tag(&m.round) {
            Some(round) => Some((round, m)),
            None => {
                debug!("skipping bracket row with round tag {:?}", m.round);
                None
            }
        })
        .collect();

    BracketRound::ALL
        .into_iter()
        .filter_map(|round| {
            let matches: Vec<BracketMatchView> = tagged
                .iter()
                .filter(|(r, _)| *r == round)
                .map(|(_, m)| match_view(m, directory))
                .collect();
            (!matches.is_empty()).then(|| BracketRoundView {
                round,
                is_current: current == Some(round),
                matches,
            })
        })
        .collect()
}

fn match_view(m: &BracketMatchup, directory: &TeamDirectory) -> BracketMatchView {
    let score = |cell: &Cell| {
        if cell.is_blank() {
            PENDING_SCORE.to_string()
        } else {
            format_score(cell)
        }
    };
    let winner = m.winner_id.as_ref();
    BracketMatchView {
        home: TeamSlot::new(directory, m.home_id.as_ref(), &m.home_seed, score(&m.home_score), winner),
        away: TeamSlot::new(directory, m.away_id.as_ref(), &m.away_seed, score(&m.away_score), winner),
    }
}
