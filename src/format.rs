use std::{fmt, str::FromStr};

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    entrant::{Entrant, Roster},
    error::ScheduleError,
    fixture::{Contender, Match, MatchId},
    grouped::GroupedRoundRobin,
    knockout::Knockout,
    round_robin::RoundRobin,
    size_split::SizeSplitRoundRobin,
};

/// Turns a roster into the matches a competition format requires.
pub trait Generate {
    /// The matches in the order they should be played, before any dates are
    /// assigned.
    ///
    /// # Errors
    ///
    /// If the roster is empty.
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError>;
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Format {
    RoundRobin(RoundRobin),
    Knockout(Knockout),
    GroupedRoundRobin(GroupedRoundRobin),
    SizeSplitRoundRobin(SizeSplitRoundRobin),
}

impl Format {
    #[must_use]
    pub fn kind(&self) -> FormatKind {
        match self {
            Self::RoundRobin(_) => FormatKind::RoundRobin,
            Self::Knockout(_) => FormatKind::Knockout,
            Self::GroupedRoundRobin(_) => FormatKind::Grouped,
            Self::SizeSplitRoundRobin(_) => FormatKind::SizeSplit,
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::RoundRobin(RoundRobin::default())
    }
}

impl Generate for Format {
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError> {
        if roster.is_empty() {
            return Err(ScheduleError::NoEntrants);
        }

        match self {
            Self::RoundRobin(format) => format.generate(roster),
            Self::Knockout(format) => format.generate(roster),
            Self::GroupedRoundRobin(format) => format.generate(roster),
            Self::SizeSplitRoundRobin(format) => format.generate(roster),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    #[default]
    RoundRobin,
    Knockout,
    Grouped,
    SizeSplit,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin => write!(f, "round-robin"),
            Self::Knockout => write!(f, "knockout"),
            Self::Grouped => write!(f, "grouped"),
            Self::SizeSplit => write!(f, "size-split"),
        }
    }
}

impl FromStr for FormatKind {
    type Err = anyhow::Error;

    fn from_str(string: &str) -> anyhow::Result<Self> {
        match string.to_lowercase().replace('_', "-").as_str() {
            "round-robin" => Ok(Self::RoundRobin),
            "knockout" => Ok(Self::Knockout),
            "grouped" => Ok(Self::Grouped),
            "size-split" => Ok(Self::SizeSplit),
            _ => Err(anyhow::Error::msg(format!(
                "Error trying to convert '{string}' to a FormatKind!"
            ))),
        }
    }
}

/// How a plain round robin names its matches.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Labeling {
    /// `M1`, `M2`, ...
    #[default]
    Plain,
    /// `Vega_M1`, grouped under the first entrant's team.
    FirstTeam,
    /// `M1`, grouped as `Vega vs SDL`.
    TeamVersus,
}

impl Labeling {
    pub(crate) fn label(self, number: u32, a: &Entrant, b: &Entrant) -> (MatchId, Option<String>) {
        match self {
            Self::Plain => (MatchId(format!("M{number}")), None),
            Self::FirstTeam => (
                MatchId(format!("{}_M{number}", a.team_name)),
                Some(a.team_name.clone()),
            ),
            Self::TeamVersus => (
                MatchId(format!("M{number}")),
                Some(format!("{} vs {}", a.team_name, b.team_name)),
            ),
        }
    }
}

/// Hands out match numbers starting at one. A single counter runs across
/// every group and phase of a schedule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Numbering(u32);

impl Numbering {
    pub(crate) fn new() -> Self {
        Self(1)
    }

    pub(crate) fn next(&mut self) -> u32 {
        let number = self.0;
        self.0 += 1;
        number
    }
}

/// Every unordered pair, in lexicographic order of their positions.
pub(crate) fn pairs<'a>(
    entrants: &[&'a Entrant],
) -> impl Iterator<Item = (&'a Entrant, &'a Entrant)> {
    entrants.iter().copied().tuple_combinations()
}

/// A full round robin inside one group, numbered from `numbering`.
pub(crate) fn round_robin_group(
    entrants: &[&Entrant],
    group: &str,
    id_prefix: &str,
    numbering: &mut Numbering,
) -> Vec<Match> {
    pairs(entrants)
        .map(|(a, b)| {
            let number = numbering.next();
            let mut game = Match::new(
                MatchId(format!("{id_prefix}_M{number}")),
                number,
                Contender::from(a),
                Contender::from(b),
            );
            game.group = Some(group.to_string());
            game
        })
        .collect()
}

/// Splits the roster by `key`, keeping groups in order of first appearance
/// and entrants in roster order.
pub(crate) fn partition<K, F>(roster: &Roster, key: F) -> Vec<(K, Vec<&Entrant>)>
where
    K: PartialEq,
    F: Fn(&Entrant) -> K,
{
    let mut groups: Vec<(K, Vec<&Entrant>)> = Vec::new();

    for entrant in roster {
        let key = key(entrant);

        if let Some((_, members)) = groups.iter_mut().find(|(group, _)| *group == key) {
            members.push(entrant);
        } else {
            groups.push((key, vec![entrant]));
        }
    }

    groups
}
