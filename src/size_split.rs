use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    entrant::Roster,
    error::ScheduleError,
    fixture::Match,
    format::{Generate, Numbering, partition, round_robin_group},
};

pub const DEFAULT_MIN_GROUP_SIZE: usize = 4;
pub const COMBINED_GROUP: &str = "Combined";

/// Big teams play a round robin among themselves, everybody from the small
/// teams is pooled into one combined round robin.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SizeSplitRoundRobin {
    /// Teams with at least this many entrants get their own group.
    pub min_group_size: usize,
}

impl Default for SizeSplitRoundRobin {
    fn default() -> Self {
        Self {
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
        }
    }
}

impl Generate for SizeSplitRoundRobin {
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError> {
        if roster.is_empty() {
            return Err(ScheduleError::NoEntrants);
        }

        let teams = partition(roster, |entrant| entrant.team_name.clone());
        let mut numbering = Numbering::new();
        let mut matches = Vec::new();
        let mut pooled = Vec::new();

        for (team, members) in teams {
            if members.len() >= self.min_group_size {
                let games =
                    round_robin_group(&members, &team, &team.replace(' ', "_"), &mut numbering);
                debug!("size split: {team} plays {} matches on its own", games.len());
                matches.extend(games);
            } else {
                pooled.extend(members);
            }
        }

        if !pooled.is_empty() {
            let games = round_robin_group(&pooled, COMBINED_GROUP, COMBINED_GROUP, &mut numbering);
            debug!(
                "size split: {} entrants from small teams play {} combined matches",
                pooled.len(),
                games.len()
            );
            matches.extend(games);
        }

        Ok(matches)
    }
}
