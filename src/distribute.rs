use std::{collections::VecDeque, fmt, num::NonZeroU32};

use chrono::NaiveDate;
use clap::ValueEnum;
use log::{debug, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    calendar,
    error::ScheduleError,
    fixture::{ContenderKey, Match, MatchId, Table},
};

pub const DEFAULT_TIME_SLOTS: [&str; 16] = [
    "09:00 AM", "09:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM", "12:00 PM", "12:30 PM",
    "02:00 PM", "02:30 PM", "03:00 PM", "03:30 PM", "04:00 PM", "04:30 PM", "05:00 PM", "05:30 PM",
];

/// How many matches fit in one day. Never zero.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(NonZeroU32);

impl Capacity {
    /// # Errors
    ///
    /// If `matches` is zero.
    pub fn new(matches: u32) -> Result<Self, ScheduleError> {
        NonZeroU32::new(matches)
            .map(Self)
            .ok_or(ScheduleError::InvalidCapacity)
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get() as usize
    }
}

impl TryFrom<u32> for Capacity {
    type Error = ScheduleError;

    fn try_from(matches: u32) -> Result<Self, Self::Error> {
        Self::new(matches)
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0.get()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to do with room left in a day after the collision free scan.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Leave it empty, unless the scan found nothing at all.
    #[default]
    Strict,
    /// Fill it from the front of the queue, collisions or not. Matches still
    /// wait for the days their feeders are played on.
    TopUp,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub day_name: String,
    pub matches: Vec<Match>,
}

impl DayBucket {
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub fn table(&self, table: Table) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|game| game.table == Some(table))
            .collect()
    }
}

/// Greedily packs matches into weekdays.
///
/// Each day takes matches from the front of the queue, skipping any match
/// that would have a contender play twice that day, or that needs the winner
/// of a match that isn't on an earlier day.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Distributor {
    pub capacity: Capacity,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub fill: Fill,
    /// Put the first half of each day's capacity on table 1, the rest on
    /// table 2.
    #[serde(default)]
    pub tables: bool,
    #[serde(default)]
    pub time_slots: Vec<String>,
}

impl Distributor {
    #[must_use]
    pub fn new(capacity: Capacity, start_date: NaiveDate) -> Self {
        Self {
            capacity,
            start_date,
            fill: Fill::default(),
            tables: false,
            time_slots: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// If the calendar runs out of dates.
    pub fn distribute(&self, matches: Vec<Match>) -> Result<Vec<DayBucket>, ScheduleError> {
        let capacity = self.capacity.get();
        let mut remaining: VecDeque<Match> = matches.into();
        // Matches on days before the current one.
        let mut placed: FxHashSet<MatchId> = FxHashSet::default();
        let mut date = calendar::weekday_on_or_after(self.start_date)?;
        let mut days = Vec::new();

        while !remaining.is_empty() {
            let mut bucket = Vec::with_capacity(capacity.min(remaining.len()));
            let mut used: FxHashSet<ContenderKey> = FxHashSet::default();
            let mut skipped = VecDeque::with_capacity(remaining.len());

            while bucket.len() < capacity
                && let Some(game) = remaining.pop_front()
            {
                let [a, b] = game.keys();

                if is_ready(&game, &placed) && !used.contains(&a) && !used.contains(&b) {
                    used.insert(a);
                    used.insert(b);
                    bucket.push(game);
                } else {
                    skipped.push_back(game);
                }
            }

            skipped.append(&mut remaining);
            remaining = skipped;

            if bucket.is_empty() {
                warn!("distribute: no match fits on {date}, taking them in order");

                while bucket.len() < capacity
                    && let Some(game) = remaining.pop_front()
                {
                    bucket.push(game);
                }
            } else if self.fill == Fill::TopUp {
                let mut waiting = VecDeque::with_capacity(remaining.len());

                while let Some(game) = remaining.pop_front() {
                    if bucket.len() < capacity && is_ready(&game, &placed) {
                        bucket.push(game);
                    } else {
                        waiting.push_back(game);
                    }
                }

                remaining = waiting;
            }

            placed.extend(bucket.iter().map(|game| game.match_id.clone()));
            self.stamp(&mut bucket, date);
            debug!("distribute: {} matches on {date}", bucket.len());

            days.push(DayBucket {
                date,
                day_name: calendar::day_name(date),
                matches: bucket,
            });

            if !remaining.is_empty() {
                date = calendar::next_weekday(date)?;
            }
        }

        Ok(days)
    }

    fn stamp(&self, bucket: &mut [Match], date: NaiveDate) {
        let table_one = (self.capacity.get() / 2).max(1);

        for (position, game) in bucket.iter_mut().enumerate() {
            game.date = Some(date);

            if self.tables {
                game.table = Some(if position < table_one {
                    Table::One
                } else {
                    Table::Two
                });
            }

            if !self.time_slots.is_empty() {
                game.time_slot = self
                    .time_slots
                    .get(position % self.time_slots.len())
                    .cloned();
            }
        }
    }
}

/// Every match a pending contender waits on was played on an earlier day.
fn is_ready(game: &Match, placed: &FxHashSet<MatchId>) -> bool {
    game.feeders().all(|feeder| placed.contains(feeder))
}

#[cfg(test)]
mod tests {
    use crate::{
        entrant::{Entrant, Roster},
        fixture::Contender,
        format::Generate,
        knockout::Knockout,
        round_robin::RoundRobin,
    };

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 24).unwrap()
    }

    fn round_robin(size: u32) -> anyhow::Result<Vec<Match>> {
        let roster = Roster::new(
            (1..=size)
                .map(|serial| Entrant::solo(serial, &format!("P{serial}"), "Vega"))
                .collect(),
        )?;

        Ok(RoundRobin::default().generate(&roster)?)
    }

    fn no_repeats(day: &DayBucket) -> bool {
        let mut seen = FxHashSet::default();
        day.matches
            .iter()
            .flat_map(Match::keys)
            .all(|key| seen.insert(key))
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(Capacity::new(0), Err(ScheduleError::InvalidCapacity));
        assert!(serde_json::from_str::<Capacity>("0").is_err());
    }

    #[test]
    fn four_entrants_capacity_two() -> anyhow::Result<()> {
        let distributor = Distributor::new(Capacity::new(2)?, monday());
        let days = distributor.distribute(round_robin(4)?)?;

        assert_eq!(days.len(), 3);
        for day in &days {
            assert_eq!(day.len(), 2);
            assert!(no_repeats(day));
        }

        let ids: Vec<Vec<_>> = days
            .iter()
            .map(|day| day.matches.iter().map(|game| game.match_id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["M1", "M6"], vec!["M2", "M5"], vec!["M3", "M4"]]);

        Ok(())
    }

    #[test]
    fn weekends_are_skipped() -> anyhow::Result<()> {
        let friday = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();
        let distributor = Distributor::new(Capacity::new(1)?, friday);
        let days = distributor.distribute(round_robin(3)?)?;

        let dates: Vec<_> = days.iter().map(|day| day.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-11-28", "2025-12-01", "2025-12-02"]);
        assert_eq!(days[1].day_name, "Monday, December 01");
        assert!(days.iter().all(|day| !calendar::is_weekend(day.date)));

        Ok(())
    }

    #[test]
    fn starting_on_a_weekend() -> anyhow::Result<()> {
        let saturday = NaiveDate::from_ymd_opt(2025, 11, 29).unwrap();
        let days = Distributor::new(Capacity::new(5)?, saturday).distribute(round_robin(2)?)?;

        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        Ok(())
    }

    #[test]
    fn every_match_gets_its_bucket_date() -> anyhow::Result<()> {
        let days = Distributor::new(Capacity::new(3)?, monday()).distribute(round_robin(6)?)?;

        assert_eq!(days.iter().map(DayBucket::len).sum::<usize>(), 15);
        for day in &days {
            assert!(day.len() <= 3);
            assert!(day.matches.iter().all(|game| game.date == Some(day.date)));
        }

        Ok(())
    }

    #[test]
    fn top_up_fills_every_day() -> anyhow::Result<()> {
        let distributor = Distributor {
            fill: Fill::TopUp,
            ..Distributor::new(Capacity::new(4)?, monday())
        };
        let days = distributor.distribute(round_robin(4)?)?;

        // 6 matches, 4 a day, no matter who plays twice.
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].len(), 4);
        assert_eq!(days[1].len(), 2);
        assert!(!no_repeats(&days[0]));

        Ok(())
    }

    #[test]
    fn tables_and_time_slots() -> anyhow::Result<()> {
        let distributor = Distributor {
            tables: true,
            time_slots: vec!["09:00 AM".to_string(), "09:30 AM".to_string()],
            ..Distributor::new(Capacity::new(6)?, monday())
        };
        let days = distributor.distribute(round_robin(8)?)?;
        let first = &days[0];

        assert_eq!(first.len(), 4);
        assert_eq!(first.table(Table::One).len(), 3);
        assert_eq!(first.table(Table::Two).len(), 1);

        let slots: Vec<_> = first
            .matches
            .iter()
            .map(|game| game.time_slot.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(slots, vec!["09:00 AM", "09:30 AM", "09:00 AM", "09:30 AM"]);

        Ok(())
    }

    #[test]
    fn capacity_of_one_uses_table_one() -> anyhow::Result<()> {
        let distributor = Distributor {
            tables: true,
            ..Distributor::new(Capacity::new(1)?, monday())
        };
        let days = distributor.distribute(round_robin(2)?)?;

        assert_eq!(days[0].matches[0].table, Some(Table::One));
        Ok(())
    }

    #[test]
    fn winners_wait_for_their_feeders() -> anyhow::Result<()> {
        let a = Entrant::solo(1, "A", "T");
        let b = Entrant::solo(2, "B", "T");
        let c = Entrant::solo(3, "C", "T");
        let d = Entrant::solo(4, "D", "T");

        let matches = vec![
            Match::new(MatchId::from("M1"), 1, (&a).into(), (&b).into()),
            Match::new(MatchId::from("M2"), 2, (&a).into(), (&c).into()),
            Match::new(
                MatchId::from("M3"),
                3,
                Contender::PendingMatchResult(MatchId::from("M2")),
                (&d).into(),
            ),
        ];

        let days = Distributor::new(Capacity::new(3)?, monday()).distribute(matches)?;

        // M2 collides with M1, M3 needs M2 played the day before.
        let ids: Vec<Vec<_>> = days
            .iter()
            .map(|day| day.matches.iter().map(|game| game.match_id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["M1"], vec!["M2"], vec!["M3"]]);

        Ok(())
    }

    #[test]
    fn final_waits_for_the_day_after_its_feeders() -> anyhow::Result<()> {
        let roster = Roster::new(
            (1..=4)
                .map(|serial| Entrant::solo(serial, &format!("P{serial}"), "Vega"))
                .collect(),
        )?;
        let matches = Knockout.generate(&roster)?;
        let days = Distributor::new(Capacity::new(8)?, monday()).distribute(matches)?;

        assert_eq!(days.len(), 2);
        let first: Vec<_> = days[0].matches.iter().map(|game| game.match_id.as_str()).collect();
        assert_eq!(first, vec!["M1", "M2"]);
        assert_eq!(days[1].matches[0].match_id, MatchId::from("M3"));
        assert!(days[0].date < days[1].date);

        Ok(())
    }

    #[test]
    fn top_up_keeps_feeders_on_earlier_days() -> anyhow::Result<()> {
        let roster = Roster::new(
            (1..=4)
                .map(|serial| Entrant::solo(serial, &format!("P{serial}"), "Vega"))
                .collect(),
        )?;
        let distributor = Distributor {
            fill: Fill::TopUp,
            ..Distributor::new(Capacity::new(8)?, monday())
        };
        let days = distributor.distribute(Knockout.generate(&roster)?)?;

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].len(), 2);
        assert_eq!(days[1].matches[0].match_id, MatchId::from("M3"));

        Ok(())
    }

    #[test]
    fn falls_back_when_nothing_is_ready() -> anyhow::Result<()> {
        let a = Entrant::solo(1, "A", "T");
        let matches = vec![
            Match::new(
                MatchId::from("M7"),
                7,
                Contender::PendingMatchResult(MatchId::from("M5")),
                (&a).into(),
            ),
            Match::new(
                MatchId::from("M8"),
                8,
                Contender::PendingMatchResult(MatchId::from("M6")),
                (&a).into(),
            ),
        ];

        let days = Distributor::new(Capacity::new(2)?, monday()).distribute(matches)?;

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].len(), 2);
        Ok(())
    }

    #[test]
    fn deterministic() -> anyhow::Result<()> {
        let distributor = Distributor::new(Capacity::new(3)?, monday());

        assert_eq!(
            distributor.distribute(round_robin(9)?)?,
            distributor.distribute(round_robin(9)?)?
        );
        Ok(())
    }

    #[test]
    fn empty_input_has_no_days() -> anyhow::Result<()> {
        let days = Distributor::new(Capacity::new(3)?, monday()).distribute(Vec::new())?;

        assert!(days.is_empty());
        Ok(())
    }
}
