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

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A participant, a pair, or a whole group competing as one unit.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Entrant {
    pub serial_number: u32,
    pub participant1_name: String,
    #[serde(default)]
    pub participant2_name: Option<String>,
    pub team_name: String,
}

impl Entrant {
    #[must_use]
    pub fn solo(serial_number: u32, name: &str, team_name: &str) -> Self {
        Self {
            serial_number,
            participant1_name: name.to_string(),
            participant2_name: None,
            team_name: team_name.to_string(),
        }
    }

    #[must_use]
    pub fn pair(serial_number: u32, first: &str, second: &str, team_name: &str) -> Self {
        Self {
            serial_number,
            participant1_name: first.to_string(),
            participant2_name: Some(second.to_string()),
            team_name: team_name.to_string(),
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match &self.participant2_name {
            Some(second) => format!("{} & {}", self.participant1_name, second),
            None => self.participant1_name.clone(),
        }
    }

    /// Whether both entrants are made up of the same people, in either order,
    /// ignoring case.
    #[must_use]
    pub fn same_people(&self, other: &Self) -> bool {
        let first = |entrant: &Self| entrant.participant1_name.to_lowercase();
        let second = |entrant: &Self| {
            entrant
                .participant2_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
        };

        let mine = format!("{}_{}", first(self), second(self));

        mine == format!("{}_{}", first(other), second(other))
            || mine == format!("{}_{}", second(other), first(other))
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.team_name)
    }
}

/// What a match remembers about an entrant: the identifying fields, not the
/// roster record itself.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntrantRef {
    pub serial_number: u32,
    pub name: String,
    pub team_name: String,
}

impl From<&Entrant> for EntrantRef {
    fn from(entrant: &Entrant) -> Self {
        Self {
            serial_number: entrant.serial_number,
            name: entrant.name(),
            team_name: entrant.team_name.clone(),
        }
    }
}

impl fmt::Display for EntrantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.team_name)
    }
}

/// The entrants of one event in registration order.
///
/// Serial numbers are positive and unique. A blank second participant makes
/// a solo entrant. An empty roster is allowed here, generating matches from it
/// is not.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "Vec<Entrant>", into = "Vec<Entrant>")]
pub struct Roster(Vec<Entrant>);

impl Roster {
    /// # Errors
    ///
    /// If a serial number is zero or appears twice.
    pub fn new(mut entrants: Vec<Entrant>) -> Result<Self, ScheduleError> {
        let mut seen = FxHashSet::default();

        for entrant in &mut entrants {
            if entrant
                .participant2_name
                .as_ref()
                .is_some_and(|name| name.trim().is_empty())
            {
                entrant.participant2_name = None;
            }

            if entrant.serial_number == 0 {
                return Err(ScheduleError::InvalidSerial);
            }

            if !seen.insert(entrant.serial_number) {
                return Err(ScheduleError::DuplicateSerial(entrant.serial_number));
            }
        }

        Ok(Self(entrants))
    }

    #[must_use]
    pub fn entrants(&self) -> &[Entrant] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entrant> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Entrant>> for Roster {
    type Error = ScheduleError;

    fn try_from(entrants: Vec<Entrant>) -> Result<Self, Self::Error> {
        Self::new(entrants)
    }
}

impl From<Roster> for Vec<Entrant> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Entrant;
    type IntoIter = std::slice::Iter<'a, Entrant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
