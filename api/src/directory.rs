use crate::cell::TeamId;
use crate::Franchise;
use std::collections::HashMap;

/// Shown for any identifier with no franchise row behind it.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Display fields for one team, borrowed from the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamInfo<'a> {
    pub name: &'a str,
    pub owner: &'a str,
    pub logo: Option<&'a str>,
}

impl TeamInfo<'_> {
    pub const UNKNOWN: TeamInfo<'static> = TeamInfo { name: UNKNOWN_TEAM, owner: UNKNOWN_TEAM, logo: None };

    pub fn is_unknown(&self) -> bool {
        *self == TeamInfo::UNKNOWN
    }
}

/// Franchises indexed by team identifier.
#[derive(Debug, Default)]
pub struct TeamDirectory<'a> {
    by_id: HashMap<&'a TeamId, &'a Franchise>,
}

impl<'a> TeamDirectory<'a> {
    /// Index every franchise that has an identifier. On duplicate identifiers the
    /// first row wins.
    pub fn new(franchises: &'a [Franchise]) -> Self {
        let mut by_id = HashMap::with_capacity(franchises.len());
        for franchise in franchises {
            if let Some(id) = &franchise.team_id {
                by_id.entry(id).or_insert(franchise);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: &TeamId) -> Option<&'a Franchise> {
        self.by_id.get(id).copied()
    }

    /// Name/owner/logo for `id`; the "Unknown" sentinel for misses and empty slots.
    pub fn lookup(&self, id: Option<&TeamId>) -> TeamInfo<'a> {
        id.and_then(|id| self.get(id))
            .map(|f| TeamInfo { name: &f.name, owner: &f.owner, logo: f.logo.as_deref() })
            .unwrap_or(TeamInfo::UNKNOWN)
    }
}
