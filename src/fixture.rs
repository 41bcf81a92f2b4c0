use std::{borrow::Borrow, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entrant::{Entrant, EntrantRef};

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MatchId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One side of a match: someone on the roster, or whoever wins an earlier
/// match.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Contender {
    Entrant(EntrantRef),
    PendingMatchResult(MatchId),
}

impl Contender {
    #[must_use]
    pub fn key(&self) -> ContenderKey {
        match self {
            Self::Entrant(entrant) => ContenderKey::Serial(entrant.serial_number),
            Self::PendingMatchResult(id) => ContenderKey::WinnerOf(id.clone()),
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&MatchId> {
        match self {
            Self::Entrant(_) => None,
            Self::PendingMatchResult(id) => Some(id),
        }
    }
}

impl From<&Entrant> for Contender {
    fn from(entrant: &Entrant) -> Self {
        Self::Entrant(entrant.into())
    }
}

impl fmt::Display for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entrant(entrant) => write!(f, "{entrant}"),
            Self::PendingMatchResult(id) => write!(f, "Winner of {id}"),
        }
    }
}

/// What the distributor compares to keep a contender from playing twice in a
/// day.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ContenderKey {
    Serial(u32),
    WinnerOf(MatchId),
}

/// Recorded as `1` or `2`, the way results have always been written down.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Side {
    #[default]
    A,
    B,
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        match side {
            Side::A => 1,
            Side::B => 2,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = anyhow::Error;

    fn try_from(number: u8) -> anyhow::Result<Self> {
        match number {
            1 => Ok(Self::A),
            2 => Ok(Self::B),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{number}' to a Side!"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        match string.to_lowercase().as_str() {
            "1" | "a" => Ok(Self::A),
            "2" | "b" => Ok(Self::B),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a Side!"
            ))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Stage {
    Team(String),
    Finals,
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Round {
    pub stage: Stage,
    pub number: u32,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stage {
            Stage::Team(team) => write!(f, "{team} - Round {}", self.number),
            Stage::Finals => write!(f, "Finals - Round {}", self.number),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Table {
    One,
    Two,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "Table 1"),
            Self::Two => write!(f, "Table 2"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Match {
    pub match_id: MatchId,
    pub match_number: u32,
    pub side_a: Contender,
    pub side_b: Contender,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub round: Option<Round>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub table: Option<Table>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub winner: Option<Side>,
}

impl Match {
    #[must_use]
    pub fn new(match_id: MatchId, match_number: u32, side_a: Contender, side_b: Contender) -> Self {
        Self {
            match_id,
            match_number,
            side_a,
            side_b,
            group: None,
            round: None,
            date: None,
            table: None,
            time_slot: None,
            winner: None,
        }
    }

    #[must_use]
    pub fn contender(&self, side: Side) -> &Contender {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    #[must_use]
    pub fn keys(&self) -> [ContenderKey; 2] {
        [self.side_a.key(), self.side_b.key()]
    }

    /// The earlier matches whose winners play in this one.
    pub fn feeders(&self) -> impl Iterator<Item = &MatchId> {
        self.side_a.pending().into_iter().chain(self.side_b.pending())
    }

    #[must_use]
    pub fn involves(&self, serial_number: u32) -> bool {
        self.keys().contains(&ContenderKey::Serial(serial_number))
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} vs {}", self.match_id, self.side_a, self.side_b)
    }
}
