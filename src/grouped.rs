use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    entrant::{Entrant, Roster},
    error::ScheduleError,
    fixture::Match,
    format::{Generate, Numbering, partition, round_robin_group},
};

pub const DEFAULT_SPLIT_THRESHOLD: u32 = 8;

/// Two fixed groups split on serial number, each playing its own round robin.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct GroupedRoundRobin {
    /// The last serial number in group A.
    pub split_threshold: u32,
}

impl Default for GroupedRoundRobin {
    fn default() -> Self {
        Self {
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Group {
    A,
    B,
}

impl Group {
    fn id_prefix(self) -> &'static str {
        match self {
            Self::A => "GroupA",
            Self::B => "GroupB",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "Group A"),
            Self::B => write!(f, "Group B"),
        }
    }
}

impl GroupedRoundRobin {
    #[must_use]
    pub fn group(&self, entrant: &Entrant) -> Group {
        if entrant.serial_number <= self.split_threshold {
            Group::A
        } else {
            Group::B
        }
    }
}

impl Generate for GroupedRoundRobin {
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError> {
        if roster.is_empty() {
            return Err(ScheduleError::NoEntrants);
        }

        let mut groups = partition(roster, |entrant| self.group(entrant));
        groups.sort_by_key(|(group, _)| *group);

        let mut numbering = Numbering::new();
        let mut matches = Vec::new();

        for (group, members) in groups {
            let games = round_robin_group(
                &members,
                &group.to_string(),
                group.id_prefix(),
                &mut numbering,
            );
            debug!(
                "grouped round robin: {group} has {} entrants and {} matches",
                members.len(),
                games.len()
            );
            matches.extend(games);
        }

        Ok(matches)
    }
}
