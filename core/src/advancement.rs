//! Idempotent state transitions applied when a match result is accepted
//! (either a first report under `matchResultTrustMode: auto`, or an admin
//! verification). Advancement never re-derives results from scratch; it
//! only pushes the already-resolved match's winner/loser into the next
//! slot that is waiting for them, so replaying it twice with the same
//! inputs is a no-op.

use crate::brackets::{Bracket, DoubleBracket, PointsRaceBracket, SingleBracket};
use crate::ids::{MatchId, ParticipantId};
use crate::match_::{BracketKind, Match};
use crate::standings::{StandingEntry, Standings};
use crate::utils::OrderedMap;

/// Applies the consequences of `match_id` having just been resolved
/// (`matches[match_id].winner_id` is already set). Mutates `bracket` and
/// `matches` in place.
pub fn advance(bracket: &mut Bracket, matches: &mut OrderedMap<MatchId, Match>, match_id: &MatchId) {
    match bracket {
        Bracket::Single(b) => advance_single(b, matches, match_id),
        Bracket::Double(b) => advance_double(b, matches, match_id),
        Bracket::PointsRace(_) => {} // points-race has no forward propagation; see record_race_result
        Bracket::Doubles(b) => advance(&mut b.inner, matches, match_id),
    }
}

fn resolved(matches: &OrderedMap<MatchId, Match>, id: &MatchId) -> Option<(u32, usize, ParticipantId, Option<ParticipantId>, bool)> {
    let m = matches.get(id)?;
    let winner = m.winner_id.clone()?;
    Some((m.round, m.position, winner, m.loser_id.clone(), m.is_bye))
}

fn advance_single(bracket: &SingleBracket, matches: &mut OrderedMap<MatchId, Match>, match_id: &MatchId) {
    let Some((round, position, winner, _, _)) = resolved(matches, match_id) else {
        return;
    };
    let total = bracket.rounds.len() as u32;
    if round >= total {
        return;
    }
    let Some(next_round) = bracket.rounds.get(round as usize) else {
        return;
    };
    let Some(next_id) = next_round.matches.get(position / 2) else {
        return;
    };
    let next_id = next_id.clone();
    if let Some(next) = matches.get_mut(&next_id) {
        next.set_slot(position % 2, Some(winner));
    }
}

fn advance_double(bracket: &mut DoubleBracket, matches: &mut OrderedMap<MatchId, Match>, match_id: &MatchId) {
    let Some(m) = matches.get(match_id).cloned() else { return };
    let Some(winner) = m.winner_id.clone() else { return };

    match m.bracket {
        BracketKind::Winners => {
            // Advance the winner within the winners bracket, or to gf1 if
            // this was the winners final.
            if m.round < bracket.winners_rounds {
                if let Some(next_id) = bracket
                    .winners_rounds_list
                    .get(m.round as usize)
                    .and_then(|r| r.matches.get(m.position / 2))
                    .cloned()
                {
                    if let Some(next) = matches.get_mut(&next_id) {
                        next.set_slot(m.position % 2, Some(winner.clone()));
                    }
                }
            } else {
                let gf1 = bracket.grand_finals.game_1.clone();
                if let Some(gf) = matches.get_mut(&gf1) {
                    gf.set_slot(0, Some(winner.clone()));
                }
            }

            if m.is_bye {
                return; // no loser to drop
            }
            let Some(loser) = m.loser_id.clone() else { return };
            if let Some(dest) = m.drops_to {
                if let Some(l_round) = bracket.losers_rounds_list.get(dest.round as usize - 1) {
                    if let Some(dest_id) = l_round.matches.get(dest.position).cloned() {
                        if let Some(lm) = matches.get_mut(&dest_id) {
                            lm.set_slot(dest.slot, Some(loser.clone()));
                        }
                    }
                }
            } else if m.round == bracket.winners_rounds {
                // size == 2: no losers bracket at all, loser goes straight
                // into gf1's other seat.
                let gf1 = bracket.grand_finals.game_1.clone();
                if let Some(gf) = matches.get_mut(&gf1) {
                    gf.set_slot(1, Some(loser));
                }
            }
        }
        BracketKind::Losers => {
            if m.round < bracket.losers_rounds {
                let (next_round, next_position, next_slot) = if m.round % 2 == 1 {
                    (m.round + 1, m.position, 0)
                } else {
                    (m.round + 1, m.position / 2, m.position % 2)
                };
                if let Some(next_id) = bracket
                    .losers_rounds_list
                    .get(next_round as usize - 1)
                    .and_then(|r| r.matches.get(next_position))
                    .cloned()
                {
                    if let Some(next) = matches.get_mut(&next_id) {
                        next.set_slot(next_slot, Some(winner));
                    }
                }
            } else {
                let gf1 = bracket.grand_finals.game_1.clone();
                if let Some(gf) = matches.get_mut(&gf1) {
                    gf.set_slot(1, Some(winner));
                }
            }
        }
        BracketKind::GrandFinals => {
            if m.round == 1 {
                // gf1: if the losers-bracket finalist (slot 1) won, the
                // set resets and gf2 must be played. Otherwise the
                // winners-bracket finalist swept it and the tournament is
                // over.
                let winners_finalist = m.participants[0].clone();
                if Some(winner.clone()) == winners_finalist {
                    bracket.is_complete = true;
                } else {
                    bracket.grand_finals.requires_play = true;
                    let gf2 = bracket.grand_finals.game_2.clone();
                    if let (Some(p0), Some(p1)) = (m.participants[0].clone(), m.participants[1].clone()) {
                        if let Some(gf) = matches.get_mut(&gf2) {
                            gf.set_slot(0, Some(p0));
                            gf.set_slot(1, Some(p1));
                        }
                    }
                }
            } else {
                bracket.is_complete = true;
            }
        }
        BracketKind::Single | BracketKind::PointsRace => {}
    }
}

/// Applies a points-race game result: records standings deltas and
/// advances the race's completion counters. `points_table` awards points
/// by finishing position within `results` (winner first).
pub fn record_race_result(
    bracket: &mut PointsRaceBracket,
    standings: &mut Standings,
    game_id: &crate::ids::GameId,
    results: Vec<ParticipantId>,
) {
    let Some(game) = bracket.games.get_mut(game_id) else {
        return;
    };
    if !game.results.is_empty() {
        return; // already recorded; idempotent
    }
    game.results = results.clone();
    let n = results.len();
    for (idx, participant) in results.iter().enumerate() {
        let points = bracket.points_table.points_for(idx + 1, n);
        let entry = standings
            .get_mut(participant)
            .map(|e| {
                e.points += points;
                e.games_completed += 1;
                if idx == 0 {
                    e.wins += 1;
                }
                e
            });
        if entry.is_none() {
            let mut e = StandingEntry::new(participant.as_str().to_string());
            e.points = points;
            e.games_completed = 1;
            e.wins = u32::from(idx == 0);
            standings.insert(participant.clone(), e);
        }
    }
    bracket.games_complete += 1;
    bracket.is_complete = bracket.games_complete >= bracket.total_games;
}
