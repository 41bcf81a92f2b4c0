use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    entrant::{Entrant, Roster},
    error::ScheduleError,
    fixture::{Contender, Match, MatchId, Round, Stage},
    format::{Generate, Numbering},
};

/// Single elimination inside every team, then single elimination between the
/// team winners.
///
/// Teams are played in name order and members are paired in roster order. A
/// leftover contender in a round gets a bye and joins the end of the next
/// round. Later rounds refer to earlier matches through
/// [`Contender::PendingMatchResult`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Knockout;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bye {
    pub round: Round,
    pub contender: Contender,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bracket {
    pub matches: Vec<Match>,
    pub byes: Vec<Bye>,
    /// Who goes through to the finals from each team, in team order.
    pub team_winners: Vec<Contender>,
    /// The last contender standing: the winner of the final match, or the
    /// only entrant when nobody had to play.
    pub champion: Option<Contender>,
}

impl Knockout {
    /// # Errors
    ///
    /// If the roster is empty.
    pub fn bracket(self, roster: &Roster) -> Result<Bracket, ScheduleError> {
        if roster.is_empty() {
            return Err(ScheduleError::NoEntrants);
        }

        let mut teams: BTreeMap<&str, Vec<&Entrant>> = BTreeMap::new();
        for entrant in roster {
            teams
                .entry(entrant.team_name.as_str())
                .or_default()
                .push(entrant);
        }

        let mut bracket = Bracket::default();
        let mut numbering = Numbering::new();

        for (team, members) in teams {
            let contenders = members.into_iter().map(Contender::from).collect();
            let stage = Stage::Team(team.to_string());

            if let Some(winner) = eliminate(contenders, &stage, &mut numbering, &mut bracket) {
                bracket.team_winners.push(winner);
            }
        }

        debug!(
            "knockout: {} team matches, {} teams go through",
            bracket.matches.len(),
            bracket.team_winners.len()
        );

        bracket.champion = eliminate(
            bracket.team_winners.clone(),
            &Stage::Finals,
            &mut numbering,
            &mut bracket,
        );

        Ok(bracket)
    }
}

impl Generate for Knockout {
    fn generate(&self, roster: &Roster) -> Result<Vec<Match>, ScheduleError> {
        Ok(self.bracket(roster)?.matches)
    }
}

/// Plays `remaining` down to one contender, appending the matches and byes
/// to `bracket`.
fn eliminate(
    mut remaining: Vec<Contender>,
    stage: &Stage,
    numbering: &mut Numbering,
    bracket: &mut Bracket,
) -> Option<Contender> {
    let mut number = 1;

    while remaining.len() > 1 {
        let round = Round {
            stage: stage.clone(),
            number,
        };
        let mut next_round = Vec::with_capacity(remaining.len().div_ceil(2));
        let mut contenders = remaining.into_iter();

        while let Some(side_a) = contenders.next() {
            if let Some(side_b) = contenders.next() {
                let match_number = numbering.next();
                let match_id = MatchId(format!("M{match_number}"));

                let mut game = Match::new(match_id.clone(), match_number, side_a, side_b);
                game.group = Some(match stage {
                    Stage::Team(team) => team.clone(),
                    Stage::Finals => "Finals".to_string(),
                });
                game.round = Some(round.clone());

                bracket.matches.push(game);
                next_round.push(Contender::PendingMatchResult(match_id));
            } else {
                debug!("knockout: {side_a} has a bye in {round}");
                bracket.byes.push(Bye {
                    round: round.clone(),
                    contender: side_a.clone(),
                });
                next_round.push(side_a);
            }
        }

        remaining = next_round;
        number += 1;
    }

    remaining.pop()
}
