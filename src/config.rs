use std::{fs, path::Path, str::FromStr};

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    distribute::{Capacity, Distributor, Fill},
    error::ScheduleError,
    format::{Format, FormatKind, Labeling},
    grouped::{DEFAULT_SPLIT_THRESHOLD, GroupedRoundRobin},
    knockout::Knockout,
    round_robin::RoundRobin,
    size_split::{DEFAULT_MIN_GROUP_SIZE, SizeSplitRoundRobin},
};

pub const DEFAULT_CAPACITY: u32 = 30;

/// Everything needed to schedule one event, read from a RON file.
///
/// Any field left out of the file takes its default.
///
/// ```ron
/// (
///     event: "Foosball",
///     format: knockout,
///     capacity: 8,
///     start_date: "2025-12-03",
/// )
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub event: String,
    pub format: FormatKind,
    /// Matches per day.
    pub capacity: u32,
    /// The first day to schedule on, moved forward if it's a weekend.
    pub start_date: NaiveDate,
    pub split_threshold: u32,
    pub min_group_size: usize,
    pub labeling: Labeling,
    pub skip_same_people: bool,
    pub fill: Fill,
    pub tables: bool,
    pub time_slots: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            event: "Felizzo'25".to_string(),
            format: FormatKind::default(),
            capacity: DEFAULT_CAPACITY,
            start_date: NaiveDate::from_ymd_opt(2025, 11, 24).unwrap_or_default(),
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            labeling: Labeling::default(),
            skip_same_people: false,
            fill: Fill::default(),
            tables: false,
            time_slots: Vec::new(),
        }
    }
}

impl SchedulerConfig {
    /// # Errors
    ///
    /// If the file can't be read or isn't a valid config.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)
            .with_context(|| format!("config: failed to read {}", path.display()))?;

        string
            .parse()
            .with_context(|| format!("config: failed to parse {}", path.display()))
    }

    /// # Errors
    ///
    /// If the capacity is zero.
    pub fn capacity(&self) -> Result<Capacity, ScheduleError> {
        Capacity::new(self.capacity)
    }

    #[must_use]
    pub fn format(&self) -> Format {
        match self.format {
            FormatKind::RoundRobin => Format::RoundRobin(RoundRobin {
                labeling: self.labeling,
                skip_same_people: self.skip_same_people,
            }),
            FormatKind::Knockout => Format::Knockout(Knockout),
            FormatKind::Grouped => Format::GroupedRoundRobin(GroupedRoundRobin {
                split_threshold: self.split_threshold,
            }),
            FormatKind::SizeSplit => Format::SizeSplitRoundRobin(SizeSplitRoundRobin {
                min_group_size: self.min_group_size,
            }),
        }
    }

    /// # Errors
    ///
    /// If the capacity is zero.
    pub fn distributor(&self) -> Result<Distributor, ScheduleError> {
        Ok(Distributor {
            capacity: self.capacity()?,
            start_date: self.start_date,
            fill: self.fill,
            tables: self.tables,
            time_slots: self.time_slots.clone(),
        })
    }
}

impl FromStr for SchedulerConfig {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(string)?)
    }
}
