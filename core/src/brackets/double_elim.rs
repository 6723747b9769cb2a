//! Double-elimination bracket generator: winners bracket, losers bracket,
//! and grand finals with bracket reset.
//!
//! Losers-round numbering follows the conventional interleave: winners
//! round 1 losers drop into losers round 1 (a "minor" round that pairs two
//! fresh dropouts against each other); winners round `w >= 2` losers drop
//! into losers round `2*(w-1)` (a "major" round, pairing one fresh dropout
//! against the survivor of the previous minor round). This keeps the two
//! brackets in lockstep and matches how e.g. Challonge-style generators lay
//! out losers rounds.

use crate::brackets::seeding::{next_power_of_two, rounds_for_size};
use crate::brackets::single_elim::{match_id as se_match_id, resolve_byes_in_round};
use crate::brackets::{DoubleBracket, GrandFinals, Round};
use crate::ids::{MatchId, ParticipantId};
use crate::match_::{BracketKind, DropsTo, Match};
use crate::utils::OrderedMap;

fn w_id(round: u32, position: usize) -> MatchId {
    se_match_id("w", round, position)
}
fn l_id(round: u32, position: usize) -> MatchId {
    se_match_id("l", round, position)
}

pub fn generate(
    participants: &[ParticipantId],
    now: i64,
) -> (DoubleBracket, OrderedMap<MatchId, Match>) {
    let n = participants.len();
    let size = next_power_of_two(n.max(2));
    let winners_rounds = rounds_for_size(size);
    let losers_rounds = if winners_rounds <= 1 {
        0
    } else {
        2 * (winners_rounds - 1)
    };

    let (single, mut matches) = {
        let (sb, mut m) = crate::brackets::single_elim::generate(participants, "w", now);
        for m in m.values_mut() {
            m.bracket = BracketKind::Winners;
        }
        (sb, m)
    };
    let winners_rounds_list: Vec<Round> = single.rounds;

    // Wire up drops_to on every non-final winners match (the final's loser
    // is handled specially below since double-elim, not single-elim, owns
    // what happens to it).
    for round in &winners_rounds_list {
        let w = round.number;
        for id in &round.matches {
            let Some(m) = matches.get_mut(id) else { continue };
            if m.is_bye {
                continue;
            }
            if losers_rounds == 0 {
                continue; // size == 2, no losers bracket at all
            }
            let dest = if w == 1 {
                DropsTo {
                    round: 1,
                    position: m.position / 2,
                    slot: m.position % 2,
                }
            } else {
                DropsTo {
                    round: 2 * (w - 1),
                    position: m.position,
                    slot: 1,
                }
            };
            m.drops_to = Some(dest);
        }
    }

    let mut losers_rounds_list = Vec::with_capacity(losers_rounds as usize);
    for lr in 1..=losers_rounds {
        let count = losers_round_size(size, lr);
        let mut ids = Vec::with_capacity(count);
        for p in 0..count {
            let id = l_id(lr, p);
            matches.insert(id.clone(), Match::new(id.clone(), BracketKind::Losers, lr, p));
            ids.push(id);
        }
        losers_rounds_list.push(Round {
            number: lr,
            name: losers_round_label(lr, losers_rounds),
            matches: ids,
        });
    }

    // Seed losers round 1 with dropouts from any winners-round-1 byes
    // resolved during single-elim generation (a bye produces no loser, so
    // the corresponding losers slot stays empty and is itself a bye).
    if losers_rounds > 0 {
        apply_round1_dropouts(&mut matches, &winners_rounds_list[0].matches);
        resolve_byes_in_losers(&mut matches, &losers_rounds_list, losers_rounds, now);
    }

    let gf1 = MatchId::from("gf1");
    let gf2 = MatchId::from("gf2");
    matches.insert(gf1.clone(), Match::new(gf1.clone(), BracketKind::GrandFinals, 1, 0));
    matches.insert(gf2.clone(), Match::new(gf2.clone(), BracketKind::GrandFinals, 2, 0));

    // Degenerate case (size == 2): winners final's loser goes straight to
    // gf1 since there is no losers bracket to route it through.
    if losers_rounds == 0 {
        if let Some(w1) = matches.get(&w_id(1, 0)).cloned() {
            if w1.is_bye {
                if let Some(winner) = w1.winner_id.clone() {
                    if let Some(gf) = matches.get_mut(&gf1) {
                        gf.set_slot(0, Some(winner));
                    }
                }
            }
        }
    }

    let bracket = DoubleBracket {
        winners_rounds_list,
        losers_rounds_list,
        grand_finals: GrandFinals {
            game_1: gf1,
            game_2: gf2,
            requires_play: false,
        },
        bracket_size: size,
        winners_rounds,
        losers_rounds,
        is_complete: false,
    };

    (bracket, matches)
}

/// Number of matches in losers round `lr` (1-indexed) of a bracket sized
/// `size`. Minor rounds (odd `lr`) pair dropouts from the winners round
/// `(lr+1)/2`; major rounds (even `lr`) have one match per winners-round
/// `lr/2 + 1` match.
fn losers_round_size(size: usize, lr: u32) -> usize {
    if lr % 2 == 1 {
        let w = (lr + 1) / 2;
        (size >> w).max(1) / 2
    } else {
        let w = lr / 2 + 1;
        (size >> w).max(1)
    }
}

fn losers_round_label(lr: u32, total: u32) -> String {
    if lr == total {
        "Losers Final".to_string()
    } else if lr % 2 == 1 {
        format!("Losers Round {} (minor)", (lr + 1) / 2)
    } else {
        format!("Losers Round {} (major)", lr / 2)
    }
}

fn apply_round1_dropouts(matches: &mut OrderedMap<MatchId, Match>, w1_ids: &[MatchId]) {
    for id in w1_ids {
        let Some(w) = matches.get(id).cloned() else { continue };
        if w.is_bye {
            continue; // no loser produced
        }
        let Some(dest) = w.drops_to else { continue };
        let dest_id = l_id(dest.round, dest.position);
        if let (Some(loser), Some(m)) = (w.loser_id.clone(), matches.get_mut(&dest_id)) {
            m.set_slot(dest.slot, Some(loser));
        }
    }
}

fn resolve_byes_in_losers(
    matches: &mut OrderedMap<MatchId, Match>,
    rounds: &[Round],
    total_losers_rounds: u32,
    now: i64,
) {
    for round in rounds {
        let round_ids = round.matches.clone();
        for id in &round_ids {
            let Some(m) = matches.get(id) else { continue };
            if m.is_resolved() {
                continue;
            }
            let occupied: Vec<ParticipantId> = m.participants.iter().flatten().cloned().collect();
            if occupied.len() != 1 {
                continue;
            }
            let winner = occupied[0].clone();
            let lr = m.round;
            let position = m.position;
            if let Some(m) = matches.get_mut(id) {
                m.is_bye = true;
                m.resolve(winner.clone(), [0, 0], now);
            }
            if lr >= total_losers_rounds {
                continue;
            }
            let (next_round, next_position, next_slot) = losers_advance_target(lr, position);
            let next_id = l_id(next_round, next_position);
            if let Some(next) = matches.get_mut(&next_id) {
                next.set_slot(next_slot, Some(winner.clone()));
            }
            resolve_byes_in_losers(
                matches,
                &[Round {
                    number: next_round,
                    name: String::new(),
                    matches: vec![next_id],
                }],
                total_losers_rounds,
                now,
            );
        }
    }
}

/// Where a losers-round winner advances to: minor round `lr` survivors pair
/// up into major round `lr+1` at the same position, slot 0 (slot 1 is
/// reserved for the paired winners-bracket dropout); major round `lr`
/// survivors pair against each other into the next minor round `lr+1`.
fn losers_advance_target(lr: u32, position: usize) -> (u32, usize, usize) {
    if lr % 2 == 1 {
        (lr + 1, position, 0)
    } else {
        (lr + 1, position / 2, position % 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: usize) -> ParticipantId {
        ParticipantId::from(format!("p{n}"))
    }

    #[test]
    fn four_player_bracket_has_expected_shape() {
        let parts: Vec<_> = (1..=4).map(pid).collect();
        let (bracket, matches) = generate(&parts, 0);
        assert_eq!(bracket.winners_rounds, 2);
        assert_eq!(bracket.losers_rounds, 2);
        assert_eq!(bracket.losers_rounds_list[0].matches.len(), 1);
        assert_eq!(bracket.losers_rounds_list[1].matches.len(), 1);
        assert!(matches.contains_key(bracket.gf1()));
        assert!(matches.contains_key(bracket.gf2()));
    }

    #[test]
    fn two_player_bracket_skips_losers_rounds() {
        let parts: Vec<_> = (1..=2).map(pid).collect();
        let (bracket, _matches) = generate(&parts, 0);
        assert_eq!(bracket.losers_rounds, 0);
        assert!(bracket.losers_rounds_list.is_empty());
    }

    #[test]
    fn drops_to_targets_exist() {
        let parts: Vec<_> = (1..=8).map(pid).collect();
        let (_bracket, matches) = generate(&parts, 0);
        for m in matches.values() {
            if m.bracket != BracketKind::Winners || m.is_bye {
                continue;
            }
            let Some(dest) = m.drops_to else { continue };
            let id = l_id(dest.round, dest.position);
            assert!(matches.contains_key(&id), "missing losers target {id}");
        }
    }
}
