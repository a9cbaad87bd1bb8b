use crate::cell::{TeamId, format_score, to_number};
use crate::directory::TeamDirectory;
use crate::StandingEntry;

/// Group labels, in display order.
pub const GROUPS: [&str; 4] = ["A", "B", "C", "D"];
/// Teams per group that advance to the elimination bracket.
pub const QUALIFIERS_PER_GROUP: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub name: String,
    pub owner: String,
    pub rank: f64,
    pub wins: u32,
    pub losses: u32,
    /// Points-for, two decimals.
    pub points_for: String,
    pub qualifying: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupStandings {
    pub group: &'static str,
    pub rows: Vec<StandingRow>,
}

impl GroupStandings {
    pub fn qualifiers(&self) -> impl Iterator<Item = &StandingRow> {
        self.rows.iter().filter(|r| r.qualifying)
    }
}

/// Rank every group: ascending by rank (ties keep sheet order), top
/// `QUALIFIERS_PER_GROUP` by position qualify.
pub fn rank_groups(entries: &[StandingEntry], directory: &TeamDirectory) -> Vec<GroupStandings> {
    GROUPS
        .iter()
        .map(|&group| GroupStandings { group, rows: rank_group(group, entries, directory) })
        .collect()
}

fn rank_group(group: &str, entries: &[StandingEntry], directory: &TeamDirectory) -> Vec<StandingRow> {
    let mut members: Vec<(&StandingEntry, &TeamId, f64)> = entries
        .iter()
        .filter(|e| e.group.as_str() == Some(group))
        .filter_map(|e| e.team_id.as_ref().map(|id| (e, id, to_number(&e.rank))))
        .collect();

    // Stable: equal ranks stay in sheet order.
    members.sort_by(|a, b| a.2.total_cmp(&b.2));

    members
        .into_iter()
        .enumerate()
        .map(|(idx, (entry, id, rank))| {
            let team = directory.lookup(Some(id));
            StandingRow {
                team_id: id.clone(),
                name: team.name.to_string(),
                owner: team.owner.to_string(),
                rank,
                wins: to_number(&entry.wins) as u32,
                losses: to_number(&entry.losses) as u32,
                points_for: format_score(&entry.points_for),
                qualifying: idx < QUALIFIERS_PER_GROUP,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::Franchise;

    fn entry(group: &str, team: &str, rank: Cell) -> StandingEntry {
        StandingEntry {
            group: group.into(),
            team_id: Some(team.into()),
            wins: Cell::Number(1.0),
            losses: Cell::Number(0.0),
            points_for: Cell::Number(100.0),
            rank,
        }
    }

    #[test]
    fn sorts_by_rank_and_flags_top_four() {
        let entries = vec![
            entry("A", "t3", Cell::Number(3.0)),
            entry("A", "t1a", Cell::Number(1.0)),
            entry("A", "t4", Cell::Number(4.0)),
            entry("A", "t1b", Cell::Number(1.0)),
            entry("A", "t5", Cell::Number(5.0)),
        ];
        let groups = rank_groups(&entries, &TeamDirectory::default());
        let a = &groups[0];
        assert_eq!(a.group, "A");

        let order: Vec<String> = a.rows.iter().map(|r| r.team_id.to_string()).collect();
        assert_eq!(order, ["t1a", "t1b", "t3", "t4", "t5"]);

        let flags: Vec<bool> = a.rows.iter().map(|r| r.qualifying).collect();
        assert_eq!(flags, [true, true, true, true, false]);
        assert_eq!(a.qualifiers().count(), QUALIFIERS_PER_GROUP);
    }

    #[test]
    fn rank_is_read_numerically() {
        let entries = vec![
            entry("B", "ten", Cell::from("10")),
            entry("B", "two", Cell::from("2")),
            entry("B", "junk", Cell::from("n/a")),
        ];
        let groups = rank_groups(&entries, &TeamDirectory::default());
        let order: Vec<String> = groups[1].rows.iter().map(|r| r.team_id.to_string()).collect();
        assert_eq!(order, ["junk", "two", "ten"]);
    }

    #[test]
    fn blank_team_rows_and_other_groups_are_excluded() {
        let mut blank = entry("A", "x", Cell::Number(1.0));
        blank.team_id = None;
        let entries = vec![blank, entry("E", "stray", Cell::Number(1.0)), entry("C", "c1", Cell::Null)];
        let groups = rank_groups(&entries, &TeamDirectory::default());
        assert_eq!(groups.len(), 4);
        assert!(groups[0].rows.is_empty());
        assert_eq!(groups[2].rows.len(), 1);
        assert!(groups[3].rows.is_empty());
    }

    #[test]
    fn rows_resolve_names_and_format_points() {
        let franchises = vec![Franchise {
            name: "Alpha".into(),
            owner: "Ann".into(),
            logo: None,
            team_id: Some("T1".into()),
        }];
        let directory = TeamDirectory::new(&franchises);
        let mut e = entry("D", "T1", Cell::Number(1.0));
        e.points_for = Cell::from("120.5");
        e.wins = Cell::Number(3.0);
        e.losses = Cell::from("1");
        let mut stranger = entry("D", "T2", Cell::Number(2.0));
        stranger.points_for = Cell::Null;

        let groups = rank_groups(&[e, stranger], &directory);
        let d = &groups[3].rows;
        assert_eq!(d[0].name, "Alpha");
        assert_eq!(d[0].owner, "Ann");
        assert_eq!(d[0].points_for, "120.50");
        assert_eq!((d[0].wins, d[0].losses), (3, 1));
        assert_eq!(d[1].name, "Unknown");
        assert_eq!(d[1].points_for, "0.00");
    }
}
