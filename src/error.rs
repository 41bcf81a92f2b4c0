use thiserror::Error;

use crate::{fixture::MatchId, schedule::Revision};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ScheduleError {
    #[error("generate: no entrants")]
    NoEntrants,
    #[error("roster: the serial number has to be positive")]
    InvalidSerial,
    #[error("roster: the serial number {0} is used more than once")]
    DuplicateSerial(u32),
    #[error("distribute: the daily capacity has to be at least one")]
    InvalidCapacity,
    #[error("distribute: ran out of calendar dates")]
    CalendarOverflow,
    #[error("results: there is no match {0}")]
    UnknownMatch(MatchId),
    #[error("results: match {0} still waits on an earlier result")]
    UnresolvedContender(MatchId),
    #[error("results: match {match_id} already feeds the decided match {decided}")]
    DecidedDownstream { match_id: MatchId, decided: MatchId },
    #[error("results: recorded against revision {found}, the schedule is revision {expected}")]
    StaleResults { expected: Revision, found: Revision },
    #[error("schedule: failed to fingerprint the inputs: {0}")]
    Fingerprint(String),
}

impl ScheduleError {
    /// Whether the caller asked for something that doesn't exist, as opposed
    /// to handing over something malformed.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoEntrants | Self::UnknownMatch(_))
    }
}
