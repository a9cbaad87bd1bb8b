use crate::cell::{Cell, format_score, to_number};
use crate::directory::TeamDirectory;
use crate::phase::{GROUP_STAGE_START, GROUP_STAGE_WEEKS};
use crate::view::{PENDING_SCORE, TeamSlot};
use crate::GroupMatchup;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupView {
    pub home: TeamSlot,
    pub away: TeamSlot,
    /// Either side has a nonzero score. A real 0.00-0.00 result also reads as
    /// unplayed; the sheet gives no way to tell them apart.
    pub scored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupBucket {
    pub group: String,
    pub matchups: Vec<MatchupView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleWeek {
    /// Group-play week, 1..=5.
    pub week: u8,
    pub nfl_week: i64,
    pub is_current: bool,
    /// Sorted by group label; matchups inside a bucket keep sheet order.
    pub groups: Vec<GroupBucket>,
}

impl ScheduleWeek {
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.matchups.len()).sum()
    }

    pub fn completed(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.matchups.iter())
            .filter(|m| m.scored)
            .count()
    }
}

/// Group-stage matchups by week, then by group. Weeks without matchups are left out.
pub fn schedule_weeks(
    matchups: &[GroupMatchup],
    current_group_week: Option<u8>,
    directory: &TeamDirectory,
) -> Vec<ScheduleWeek> {
    (1..=GROUP_STAGE_WEEKS)
        .filter_map(|week| {
            let mut buckets: BTreeMap<String, Vec<MatchupView>> = BTreeMap::new();
            for m in matchups.iter().filter(|m| to_number(&m.week) == f64::from(week)) {
                buckets
                    .entry(m.group.to_string())
                    .or_default()
                    .push(matchup_view(m, directory));
            }
            if buckets.is_empty() {
                return None;
            }
            Some(ScheduleWeek {
                week,
                nfl_week: i64::from(week) + GROUP_STAGE_START - 1,
                is_current: current_group_week == Some(week),
                groups: buckets
                    .into_iter()
                    .map(|(group, matchups)| GroupBucket { group, matchups })
                    .collect(),
            })
        })
        .collect()
}

fn matchup_view(m: &GroupMatchup, directory: &TeamDirectory) -> MatchupView {
    let scored = to_number(&m.home_score) != 0.0 || to_number(&m.away_score) != 0.0;
    let score = |cell: &Cell| {
        if scored {
            format_score(cell)
        } else {
            PENDING_SCORE.to_string()
        }
    };
    let winner = m.winner_id.as_ref();
    MatchupView {
        home: TeamSlot::new(directory, m.home_id.as_ref(), &m.home_label, score(&m.home_score), winner),
        away: TeamSlot::new(directory, m.away_id.as_ref(), &m.away_label, score(&m.away_score), winner),
        scored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TeamId;

    fn matchup(week: f64, group: &str, home: &str, away: &str) -> GroupMatchup {
        GroupMatchup {
            week: Cell::Number(week),
            group: group.into(),
            home_id: Some(home.into()),
            away_id: Some(away.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_weeks_are_omitted_and_groups_sorted() {
        let matchups = vec![
            matchup(1.0, "B", "b1", "b2"),
            matchup(1.0, "A", "a1", "a2"),
            matchup(2.0, "A", "a1", "a3"),
        ];
        let weeks = schedule_weeks(&matchups, Some(2), &TeamDirectory::default());
        assert_eq!(weeks.iter().map(|w| w.week).collect::<Vec<_>>(), [1, 2]);

        let groups: Vec<&str> = weeks[0].groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(groups, ["A", "B"]);

        assert!(!weeks[0].is_current);
        assert!(weeks[1].is_current);
        assert_eq!(weeks[0].nfl_week, 9);
        assert_eq!(weeks[1].nfl_week, 10);
    }

    #[test]
    fn no_week_is_current_outside_group_stage() {
        let matchups = vec![matchup(1.0, "A", "a1", "a2")];
        let weeks = schedule_weeks(&matchups, None, &TeamDirectory::default());
        assert!(weeks.iter().all(|w| !w.is_current));
    }

    #[test]
    fn bucket_keeps_sheet_order() {
        let matchups = vec![
            matchup(3.0, "C", "c3", "c4"),
            matchup(3.0, "C", "c1", "c2"),
        ];
        let weeks = schedule_weeks(&matchups, None, &TeamDirectory::default());
        let homes: Vec<Option<TeamId>> = weeks[0].groups[0]
            .matchups
            .iter()
            .map(|m| m.home.team_id.clone())
            .collect();
        assert_eq!(homes, [Some(TeamId::from("c3")), Some(TeamId::from("c1"))]);
    }

    #[test]
    fn week_field_is_coerced() {
        let mut m = matchup(0.0, "A", "a1", "a2");
        m.week = Cell::from("4");
        let weeks = schedule_weeks(&[m], None, &TeamDirectory::default());
        assert_eq!(weeks[0].week, 4);
    }

    #[test]
    fn unscored_matchups_show_placeholder() {
        let mut m = matchup(1.0, "A", "a1", "a2");
        m.home_score = Cell::Number(0.0);
        m.away_score = Cell::Null;
        m.winner_id = Some("a1".into());
        let weeks = schedule_weeks(&[m], None, &TeamDirectory::default());
        let view = &weeks[0].groups[0].matchups[0];
        assert!(!view.scored);
        assert_eq!(view.home.score, "-");
        assert_eq!(view.away.score, "-");
        assert_eq!(weeks[0].completed(), 0);
        assert_eq!(weeks[0].total(), 1);
    }

    #[test]
    fn scored_matchups_format_both_sides_and_flag_winner() {
        let mut m = matchup(1.0, "A", "a1", "a2");
        m.home_score = Cell::from("101.3");
        m.away_score = Cell::Number(0.0);
        m.winner_id = Some("a1".into());
        let weeks = schedule_weeks(&[m], None, &TeamDirectory::default());
        let view = &weeks[0].groups[0].matchups[0];
        assert!(view.scored);
        assert_eq!(view.home.score, "101.30");
        assert_eq!(view.away.score, "0.00");
        assert!(view.home.is_winner);
        assert!(!view.away.is_winner);
        assert_eq!(weeks[0].completed(), 1);
    }

    #[test]
    fn missing_winner_flags_nobody() {
        let mut m = matchup(1.0, "A", "a1", "a2");
        m.home_id = None;
        m.home_score = Cell::Number(90.0);
        let weeks = schedule_weeks(&[m], None, &TeamDirectory::default());
        let view = &weeks[0].groups[0].matchups[0];
        assert!(!view.home.is_winner);
        assert!(!view.away.is_winner);
        assert_eq!(view.home.name, "Unknown");
    }
}
