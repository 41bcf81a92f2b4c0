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

use std::{io::Write as _, path::PathBuf, str::FromStr};

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use felizzo_scheduler::{
    COPYRIGHT, LONG_VERSION,
    config::SchedulerConfig,
    distribute::{DEFAULT_TIME_SLOTS, Fill},
    fixture::{MatchId, Side},
    format::{FormatKind, Labeling},
};

/// Felizzo Match Scheduler
///
/// Generates the matches for one event and spreads them over weekdays. The
/// schedule is written as JSON.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(long_version = LONG_VERSION, about = "Felizzo Match Scheduler")]
pub(crate) struct Args {
    /// The entrants, a .json or .csv file
    #[arg(long, required_unless_present = "man")]
    pub roster: Option<PathBuf>,

    /// A RON file with the event's settings, the options below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// The event's name
    #[arg(long)]
    pub event: Option<String>,

    /// The competition format
    #[arg(long, value_enum)]
    pub format: Option<FormatKind>,

    /// Matches per day
    #[arg(long)]
    pub capacity: Option<u32>,

    /// The first day to schedule on (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// The last serial number in group A of a grouped round robin
    #[arg(long)]
    pub split_threshold: Option<u32>,

    /// How many entrants a team needs to get its own group in a size split
    /// round robin
    #[arg(long)]
    pub min_group_size: Option<usize>,

    /// How a round robin names its matches
    #[arg(long, value_enum)]
    pub labeling: Option<Labeling>,

    /// Skip round robin pairs made up of the same people, `false` turns a
    /// configured skip off
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub skip_same_people: Option<bool>,

    /// What to do with room left in a day
    #[arg(long, value_enum)]
    pub fill: Option<Fill>,

    /// Split each day over two tables, `false` turns configured tables off
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub tables: Option<bool>,

    /// Comma separated time slots, given without a value the half hour slots
    /// from 09:00 AM to 05:30 PM
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub time_slots: Option<Vec<String>>,

    /// A RON file of winners, applied to the schedule and then updated
    #[arg(long)]
    pub results: Option<PathBuf>,

    /// Record a winner: MATCH_ID=1 or MATCH_ID=2
    #[arg(long = "record", value_name = "MATCH_ID=SIDE")]
    pub records: Vec<Record>,

    /// Where to write the schedule, stdout by default
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write a plain text schedule instead of JSON
    #[arg(long)]
    pub text: bool,

    /// Whether to log on the debug level
    #[arg(long)]
    pub debug: bool,

    /// Whether the application is being run by systemd
    #[arg(long)]
    pub systemd: bool,

    /// Build the manpage
    #[arg(long)]
    pub man: bool,
}

impl Args {
    pub(crate) fn generate_man_page() -> anyhow::Result<()> {
        let mut buffer: Vec<u8> = Vec::default();
        let cmd = Self::command().name("felizzo-schedule").long_version(None);
        let man = clap_mangen::Man::new(cmd).date("2025-11-24");

        man.render(&mut buffer)?;
        write!(buffer, "{COPYRIGHT}")?;

        std::fs::write("felizzo-schedule.1", buffer)?;
        Ok(())
    }

    pub(crate) fn override_config(&self, config: &mut SchedulerConfig) {
        if let Some(event) = &self.event {
            config.event.clone_from(event);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(start_date) = self.start_date {
            config.start_date = start_date;
        }
        if let Some(split_threshold) = self.split_threshold {
            config.split_threshold = split_threshold;
        }
        if let Some(min_group_size) = self.min_group_size {
            config.min_group_size = min_group_size;
        }
        if let Some(labeling) = self.labeling {
            config.labeling = labeling;
        }
        if let Some(fill) = self.fill {
            config.fill = fill;
        }
        if let Some(skip_same_people) = self.skip_same_people {
            config.skip_same_people = skip_same_people;
        }
        if let Some(tables) = self.tables {
            config.tables = tables;
        }

        match self.time_slots.as_deref() {
            Some([]) => {
                config.time_slots = DEFAULT_TIME_SLOTS.iter().map(ToString::to_string).collect();
            }
            Some(time_slots) => config.time_slots = time_slots.to_vec(),
            None => {}
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Record {
    pub match_id: MatchId,
    pub side: Side,
}

impl FromStr for Record {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        let Some((match_id, side)) = string.split_once('=') else {
            return Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a Record!"
            )));
        };

        Ok(Self {
            match_id: MatchId::from(match_id.trim()),
            side: side.trim().parse()?,
        })
    }
}
