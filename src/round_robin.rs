use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    entrant::Roster,
    error::ScheduleError,
    fixture::{Contender, Match},
    format::{Generate, Labeling, Numbering, pairs},
};

/// Everybody plays everybody once.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct RoundRobin {
    #[serde(default)]
    pub labeling: Labeling,
    /// Skip a pairing when both entrants are the same people under a
    /// different registration.
    #[serde(default)]
    pub skip_same_people: bool,
}

impl Generate for RoundRobin {
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError> {
        if roster.is_empty() {
            return Err(ScheduleError::NoEntrants);
        }

        let entrants: Vec<_> = roster.iter().collect();
        let mut numbering = Numbering::new();
        let mut matches = Vec::with_capacity(entrants.len() * entrants.len().saturating_sub(1) / 2);

        for (a, b) in pairs(&entrants) {
            if self.skip_same_people && a.same_people(b) {
                warn!(
                    "round robin: skipping #{} vs #{}, they are the same people",
                    a.serial_number, b.serial_number
                );
                continue;
            }

            let number = numbering.next();
            let (match_id, group) = self.labeling.label(number, a, b);
            let mut game = Match::new(match_id, number, Contender::from(a), Contender::from(b));
            game.group = group;
            matches.push(game);
        }

        debug!(
            "round robin: {} entrants, {} matches",
            entrants.len(),
            matches.len()
        );

        Ok(matches)
    }
}
