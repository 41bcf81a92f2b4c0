//! Match scheduling for the Felizzo'25 company tournament.
//!
//! A [`Format`](format::Format) turns a [`Roster`](entrant::Roster) into the
//! matches the competition needs, a [`Distributor`](distribute::Distributor)
//! spreads them over weekdays, and a [`Schedule`](schedule::Schedule) keeps
//! the result along with the winners recorded against it.
//!
//! ## Formats
//!
//! * round robin - every pair of entrants plays once
//! * knockout - single elimination inside each team, then between the team
//!   winners
//! * grouped - two round robins split on serial number
//! * size split - big teams play among themselves, small teams are pooled
//!
//! ## Feature Flags
//!
//! * bench - enable the criterion benchmarks

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

#![deny(clippy::panic)]

pub mod calendar;
pub mod config;
pub mod distribute;
pub mod entrant;
pub mod error;
pub mod fixture;
pub mod format;
pub mod grouped;
pub mod knockout;
pub mod roster;
pub mod round_robin;
pub mod schedule;
pub mod size_split;
pub mod utils;

pub use error::ScheduleError;
pub use format::Generate;
pub use schedule::{Results, Revision, Schedule};

pub const COPYRIGHT: &str = r".SH COPYRIGHT
Copyright (C) 2025 The felizzo-scheduler authors

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
";

pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "
Copyright (c) 2025 The felizzo-scheduler authors
Licensed under the AGPLv3"
);
