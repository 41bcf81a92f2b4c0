// This file is part of felizzo-scheduler.
//
// felizzo-scheduler is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// felizzo-scheduler is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{collections::BTreeMap, fmt, fs, path::Path};

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    distribute::{DayBucket, Distributor},
    entrant::{EntrantRef, Roster},
    error::ScheduleError,
    fixture::{Contender, Match, MatchId, Side},
    format::{Format, FormatKind, Generate},
};

/// Fingerprint of everything a schedule was generated from.
///
/// Results carry the revision they were recorded against, so winners from
/// an older schedule never land on a regenerated one. It is the first eight
/// bytes, big endian, of the SHA-256 of the inputs as compact JSON.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    /// # Errors
    ///
    /// If the inputs can't be serialized.
    pub fn new(
        roster: &Roster,
        format: &Format,
        distributor: &Distributor,
    ) -> Result<Self, ScheduleError> {
        let digest = Sha256::digest(canonical(roster, format, distributor)?);
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&digest[..8]);

        Ok(Self(u64::from_be_bytes(bytes)))
    }
}

fn canonical(
    roster: &Roster,
    format: &Format,
    distributor: &Distributor,
) -> Result<Vec<u8>, ScheduleError> {
    serde_json::to_vec(&(roster, format, distributor))
        .map_err(|error| ScheduleError::Fingerprint(error.to_string()))
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Winners by match id, recorded against one revision of a schedule.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Results {
    pub revision: Revision,
    #[serde(default)]
    pub winners: BTreeMap<MatchId, Side>,
}

impl Results {
    #[must_use]
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            winners: BTreeMap::new(),
        }
    }

    /// # Errors
    ///
    /// If the file can't be read or doesn't hold results.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)
            .with_context(|| format!("results: failed to read {}", path.display()))?;

        ron::from_str(&string)
            .with_context(|| format!("results: failed to parse {}", path.display()))
    }

    /// Writes the results next to `path` first and then renames them over it,
    /// so a reader never sees half a file.
    ///
    /// # Errors
    ///
    /// If the file can't be written.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        let mut temporary = path.as_os_str().to_owned();
        temporary.push(".tmp");

        fs::write(&temporary, string)
            .with_context(|| format!("results: failed to write {}", path.display()))?;
        fs::rename(&temporary, path)
            .with_context(|| format!("results: failed to replace {}", path.display()))?;

        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Schedule {
    pub event: String,
    pub format: FormatKind,
    pub revision: Revision,
    pub days: Vec<DayBucket>,
}

impl Schedule {
    /// Generates the matches for `roster` and spreads them over the calendar.
    ///
    /// # Errors
    ///
    /// If the roster is empty, the calendar runs out of dates, or the inputs
    /// can't be fingerprinted.
    pub fn generate(
        event: &str,
        roster: &Roster,
        format: &Format,
        distributor: &Distributor,
    ) -> Result<Self, ScheduleError> {
        let revision = Revision::new(roster, format, distributor)?;
        let matches = format.generate(roster)?;
        let total = matches.len();
        let days = distributor.distribute(matches)?;

        info!(
            "{event}: {} entrants, {total} {} matches over {} days",
            roster.len(),
            format.kind(),
            days.len(),
        );

        Ok(Self {
            event: event.to_string(),
            format: format.kind(),
            revision,
            days,
        })
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.days.iter().flat_map(|day| day.matches.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().map(DayBucket::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(DayBucket::is_empty)
    }

    #[must_use]
    pub fn get(&self, match_id: &str) -> Option<&Match> {
        self.matches()
            .find(|game| game.match_id.as_str() == match_id)
    }

    fn get_mut(&mut self, match_id: &str) -> Option<&mut Match> {
        self.days
            .iter_mut()
            .flat_map(|day| day.matches.iter_mut())
            .find(|game| game.match_id.as_str() == match_id)
    }

    /// Follows pending results through the recorded winners down to an
    /// entrant. `None` while some match on the way is undecided.
    #[must_use]
    pub fn resolve(&self, contender: &Contender) -> Option<EntrantRef> {
        let mut contender = contender;

        // A chain can't be longer than the schedule, anything longer loops.
        for _ in 0..=self.len() {
            match contender {
                Contender::Entrant(entrant) => return Some(entrant.clone()),
                Contender::PendingMatchResult(match_id) => {
                    let game = self.get(match_id.as_str())?;
                    contender = game.contender(game.winner?);
                }
            }
        }

        None
    }

    /// The entrant who won `match_id`, if it's been decided.
    #[must_use]
    pub fn winner(&self, match_id: &str) -> Option<EntrantRef> {
        let game = self.get(match_id)?;
        self.resolve(game.contender(game.winner?))
    }

    /// Recording the same winner again changes nothing. A different winner is
    /// only taken while no decided match depends on this one.
    ///
    /// # Errors
    ///
    /// If there is no such match, one of its sides still waits on a match
    /// without a winner, or the old winner already played a decided match.
    pub fn record_winner(&mut self, match_id: &MatchId, side: Side) -> Result<(), ScheduleError> {
        let game = self
            .get(match_id.as_str())
            .ok_or_else(|| ScheduleError::UnknownMatch(match_id.clone()))?;

        if self.resolve(&game.side_a).is_none() || self.resolve(&game.side_b).is_none() {
            return Err(ScheduleError::UnresolvedContender(match_id.clone()));
        }

        if let Some(previous) = game.winner
            && previous != side
        {
            if let Some(decided) = self.matches().find(|later| {
                later.winner.is_some() && later.feeders().any(|feeder| feeder == match_id)
            }) {
                return Err(ScheduleError::DecidedDownstream {
                    match_id: match_id.clone(),
                    decided: decided.match_id.clone(),
                });
            }

            warn!("results: the winner of {match_id} changes from side {previous} to side {side}");
        }

        if let Some(game) = self.get_mut(match_id.as_str()) {
            game.winner = Some(side);
        }

        Ok(())
    }

    #[must_use]
    pub fn results(&self) -> Results {
        let mut results = Results::new(self.revision);

        for game in self.matches() {
            if let Some(side) = game.winner {
                results.winners.insert(game.match_id.clone(), side);
            }
        }

        results
    }

    /// Records every winner in `results`, in schedule order. Nothing changes
    /// unless all of them can be recorded.
    ///
    /// # Errors
    ///
    /// If the results belong to another revision, name an unknown match, or
    /// decide a match before the matches feeding it.
    pub fn apply(&mut self, results: &Results) -> Result<(), ScheduleError> {
        if results.revision != self.revision {
            return Err(ScheduleError::StaleResults {
                expected: self.revision,
                found: results.revision,
            });
        }

        if let Some(unknown) = results
            .winners
            .keys()
            .find(|match_id| self.get(match_id.as_str()).is_none())
        {
            return Err(ScheduleError::UnknownMatch(unknown.clone()));
        }

        let mut updated = self.clone();
        let in_order: Vec<_> = self
            .matches()
            .filter_map(|game| {
                results
                    .winners
                    .get(&game.match_id)
                    .map(|side| (game.match_id.clone(), *side))
            })
            .collect();

        for (match_id, side) in in_order {
            updated.record_winner(&match_id, side)?;
        }

        *self = updated;
        Ok(())
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}, revision {})", self.event, self.format, self.revision)?;

        for day in &self.days {
            writeln!(f, "\n{} ({})", day.day_name, day.date)?;

            for game in &day.matches {
                write!(f, "  {game}")?;

                if let Some(round) = &game.round {
                    write!(f, " [{round}]")?;
                } else if let Some(group) = &game.group {
                    write!(f, " [{group}]")?;
                }
                if let Some(table) = game.table {
                    write!(f, " [{table}]")?;
                }
                if let Some(time_slot) = &game.time_slot {
                    write!(f, " [{time_slot}]")?;
                }
                if let Some(winner) = self.winner(game.match_id.as_str()) {
                    write!(f, " winner: {winner}")?;
                }

                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        distribute::Capacity, entrant::Entrant, knockout::Knockout, round_robin::RoundRobin,
    };

    use super::*;

    fn distributor() -> anyhow::Result<Distributor> {
        Ok(Distributor::new(
            Capacity::new(8)?,
            NaiveDate::from_ymd_opt(2025, 12, 3).unwrap(),
        ))
    }

    fn foosball() -> anyhow::Result<Roster> {
        Ok(Roster::new(vec![
            Entrant::pair(1, "Anu", "Bala", "Vega"),
            Entrant::pair(2, "Chitra", "Dev", "Vega"),
            Entrant::pair(3, "Ezhil", "Fathima", "Vega"),
            Entrant::pair(4, "Gokul", "Hari", "SDL"),
        ])?)
    }

    fn knockout() -> anyhow::Result<Schedule> {
        Ok(Schedule::generate(
            "Foosball",
            &foosball()?,
            &Format::Knockout(Knockout),
            &distributor()?,
        )?)
    }

    #[test]
    fn regenerating_is_identical() -> anyhow::Result<()> {
        assert_eq!(knockout()?, knockout()?);
        Ok(())
    }

    #[test]
    fn revision_follows_the_inputs() -> anyhow::Result<()> {
        let roster = foosball()?;
        let format = Format::RoundRobin(RoundRobin::default());
        let first = Revision::new(&roster, &format, &distributor()?)?;

        let wider = Distributor::new(Capacity::new(9)?, distributor()?.start_date);
        assert_ne!(first, Revision::new(&roster, &format, &wider)?);
        assert_ne!(
            first,
            Revision::new(&roster, &Format::Knockout(Knockout), &distributor()?)?
        );
        assert_eq!(first, Revision::new(&roster, &format, &distributor()?)?);
        Ok(())
    }

    #[test]
    fn revision_is_pinned_to_the_json_of_the_inputs() -> anyhow::Result<()> {
        let roster = foosball()?;
        let format = Format::RoundRobin(RoundRobin::default());
        let distributor = distributor()?;

        let json = String::from_utf8(canonical(&roster, &format, &distributor)?)?;
        assert_eq!(
            json,
            concat!(
                r#"[[{"serial_number":1,"participant1_name":"Anu","participant2_name":"Bala","team_name":"Vega"},"#,
                r#"{"serial_number":2,"participant1_name":"Chitra","participant2_name":"Dev","team_name":"Vega"},"#,
                r#"{"serial_number":3,"participant1_name":"Ezhil","participant2_name":"Fathima","team_name":"Vega"},"#,
                r#"{"serial_number":4,"participant1_name":"Gokul","participant2_name":"Hari","team_name":"SDL"}],"#,
                r#"{"RoundRobin":{"labeling":"plain","skip_same_people":false}},"#,
                r#"{"capacity":8,"start_date":"2025-12-03","fill":"strict","tables":false,"time_slots":[]}]"#,
            )
        );

        let revision = Revision::new(&roster, &format, &distributor)?;
        assert_eq!(revision, Revision(0x6760_ec0f_5f27_7352));
        assert_eq!(revision.to_string(), "6760ec0f5f277352");
        Ok(())
    }

    #[test]
    fn winners_flow_through_the_bracket() -> anyhow::Result<()> {
        let mut schedule = knockout()?;

        // SDL has one pair, Vega plays M1 (1 v 2) then M2 (winner of M1 v 3).
        // The final M3 is SDL against the winner of M2.
        assert_eq!(schedule.len(), 3);

        let error = schedule.record_winner(&MatchId::from("M2"), Side::A);
        assert_eq!(error, Err(ScheduleError::UnresolvedContender(MatchId::from("M2"))));

        schedule.record_winner(&MatchId::from("M1"), Side::B)?;
        schedule.record_winner(&MatchId::from("M2"), Side::A)?;

        let vega = schedule.winner("M2").map(|entrant| entrant.serial_number);
        assert_eq!(vega, Some(2));

        let final_match = schedule.get("M3").cloned();
        let final_match = final_match.ok_or_else(|| anyhow::Error::msg("no final"))?;
        assert_eq!(
            schedule.resolve(&final_match.side_b).map(|entrant| entrant.serial_number),
            Some(2)
        );
        assert_eq!(schedule.winner("M3"), None);

        schedule.record_winner(&MatchId::from("M3"), Side::A)?;
        assert_eq!(
            schedule.winner("M3").map(|entrant| entrant.team_name),
            Some("SDL".to_string())
        );
        Ok(())
    }

    #[test]
    fn changing_a_winner_that_fed_a_decided_match_is_refused() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        schedule.record_winner(&MatchId::from("M1"), Side::A)?;
        schedule.record_winner(&MatchId::from("M2"), Side::A)?;

        assert_eq!(
            schedule.record_winner(&MatchId::from("M1"), Side::B),
            Err(ScheduleError::DecidedDownstream {
                match_id: MatchId::from("M1"),
                decided: MatchId::from("M2"),
            })
        );
        assert_eq!(schedule.winner("M2").map(|entrant| entrant.serial_number), Some(1));

        // The same winner again is fine.
        schedule.record_winner(&MatchId::from("M1"), Side::A)?;
        Ok(())
    }

    #[test]
    fn an_undecided_next_match_lets_the_winner_change() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        schedule.record_winner(&MatchId::from("M1"), Side::A)?;
        schedule.record_winner(&MatchId::from("M1"), Side::B)?;

        assert_eq!(schedule.winner("M1").map(|entrant| entrant.serial_number), Some(2));
        Ok(())
    }

    #[test]
    fn unknown_match() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        let error = schedule.record_winner(&MatchId::from("M99"), Side::A);

        assert_eq!(error, Err(ScheduleError::UnknownMatch(MatchId::from("M99"))));
        Ok(())
    }

    #[test]
    fn results_round_trip_through_apply() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        schedule.record_winner(&MatchId::from("M1"), Side::A)?;
        schedule.record_winner(&MatchId::from("M2"), Side::B)?;
        let results = schedule.results();

        let mut fresh = knockout()?;
        fresh.apply(&results)?;
        assert_eq!(fresh, schedule);
        Ok(())
    }

    #[test]
    fn results_survive_a_file() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        schedule.record_winner(&MatchId::from("M1"), Side::B)?;

        let path = std::env::temp_dir().join(format!(
            "felizzo-results-{}-{}.ron",
            std::process::id(),
            schedule.revision
        ));
        schedule.results().save(&path)?;
        let loaded = Results::load(&path)?;
        std::fs::remove_file(&path)?;

        assert_eq!(loaded, schedule.results());
        assert_eq!(loaded.winners.get("M1"), Some(&Side::B));
        Ok(())
    }

    #[test]
    fn stale_results_are_refused() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        let mut results = Results::new(Revision(schedule.revision.0.wrapping_add(1)));
        results.winners.insert(MatchId::from("M1"), Side::A);

        assert!(matches!(
            schedule.apply(&results),
            Err(ScheduleError::StaleResults { .. })
        ));
        assert!(schedule.results().winners.is_empty());
        Ok(())
    }

    #[test]
    fn apply_is_all_or_nothing() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        let mut results = Results::new(schedule.revision);
        results.winners.insert(MatchId::from("M1"), Side::A);
        // M3 needs M2 first.
        results.winners.insert(MatchId::from("M3"), Side::A);

        assert_eq!(
            schedule.apply(&results),
            Err(ScheduleError::UnresolvedContender(MatchId::from("M3")))
        );
        assert!(schedule.results().winners.is_empty());
        Ok(())
    }

    #[test]
    fn display() -> anyhow::Result<()> {
        let mut schedule = knockout()?;
        schedule.record_winner(&MatchId::from("M1"), Side::A)?;
        let text = schedule.to_string();

        assert!(text.starts_with("Foosball (knockout, revision "));
        assert!(text.contains("Wednesday, December 03 (2025-12-03)"));
        assert!(text.contains(
            "M1: Anu & Bala (Vega) vs Chitra & Dev (Vega) [Vega - Round 1] winner: Anu & Bala (Vega)"
        ));
        Ok(())
    }
}
