//! Single-elimination bracket generator.

use crate::brackets::seeding::{next_power_of_two, round_label, rounds_for_size, seed_order};
use crate::brackets::{Round, SingleBracket};
use crate::ids::{MatchId, ParticipantId};
use crate::match_::{BracketKind, Match};
use crate::utils::OrderedMap;

/// Builds a full single-elimination bracket from a seed-ordered participant
/// list (index 0 = seed 1). Slots beyond `participants.len()` are byes;
/// round-1 byes are auto-resolved and propagated immediately so the bracket
/// returned is already consistent (round 2 never contains a dangling bye
/// slot, per the standard seeding property that byes never survive past
/// round 1).
pub fn generate(
    participants: &[ParticipantId],
    id_prefix: &str,
    now: i64,
) -> (SingleBracket, OrderedMap<MatchId, Match>) {
    let n = participants.len();
    let size = next_power_of_two(n.max(2));
    let total_rounds = rounds_for_size(size);
    let order = seed_order(size);

    let mut matches: OrderedMap<MatchId, Match> = OrderedMap::default();
    let mut rounds = Vec::with_capacity(total_rounds as usize);

    for r in 1..=total_rounds {
        let count = size >> r;
        let mut ids = Vec::with_capacity(count);
        for p in 0..count {
            let id = match_id(id_prefix, r, p);
            matches.insert(id.clone(), Match::new(id.clone(), BracketKind::Single, r, p));
            ids.push(id);
        }
        rounds.push(Round {
            number: r,
            name: round_label(r, total_rounds),
            matches: ids,
        });
    }

    // Seat round 1 from the seed order; unseeded slots stay empty (byes).
    for (slot_index, seed) in order.iter().enumerate() {
        let position = slot_index / 2;
        let slot = slot_index % 2;
        let participant = participants.get(seed - 1).cloned();
        if let Some(m) = matches.get_mut(&match_id(id_prefix, 1, position)) {
            m.set_slot(slot, participant);
        }
    }

    resolve_byes_in_round(&mut matches, &rounds[0].matches, total_rounds, id_prefix, now);

    (SingleBracket { rounds }, matches)
}

pub fn match_id(prefix: &str, round: u32, position: usize) -> MatchId {
    MatchId::from(format!("{prefix}r{round}m{position}"))
}

/// Resolves any match in `round_ids` that ended up with exactly one
/// occupied slot (a bye), then advances the winner into the next round,
/// recursively resolving any byes that creates there too. This is what
/// lets single-elim byes cascade without ever exposing a half-empty match
/// to a player.
pub fn resolve_byes_in_round(
    matches: &mut OrderedMap<MatchId, Match>,
    round_ids: &[MatchId],
    total_rounds: u32,
    id_prefix: &str,
    now: i64,
) {
    for id in round_ids {
        let Some(m) = matches.get(id) else { continue };
        if m.is_resolved() {
            continue;
        }
        let occupied: Vec<ParticipantId> = m.participants.iter().flatten().cloned().collect();
        if occupied.len() != 1 {
            continue;
        }
        let winner = occupied[0].clone();
        let round = m.round;
        let position = m.position;
        if let Some(m) = matches.get_mut(id) {
            m.is_bye = true;
            m.resolve(winner.clone(), [0, 0], now);
        }
        if round >= total_rounds {
            continue;
        }
        let next_id = match_id(id_prefix, round + 1, position / 2);
        let next_slot = position % 2;
        if let Some(next) = matches.get_mut(&next_id) {
            next.set_slot(next_slot, Some(winner));
        }
        resolve_byes_in_round(matches, &[next_id], total_rounds, id_prefix, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: usize) -> ParticipantId {
        ParticipantId::from(format!("p{n}"))
    }

    #[test]
    fn power_of_two_has_no_byes() {
        let parts: Vec<_> = (1..=4).map(pid).collect();
        let (bracket, matches) = generate(&parts, "", 0);
        assert_eq!(bracket.rounds.len(), 2);
        for id in &bracket.rounds[0].matches {
            let m = matches.get(id).unwrap();
            assert!(m.participants[0].is_some() && m.participants[1].is_some());
            assert!(!m.is_bye);
        }
    }

    #[test]
    fn non_power_of_two_resolves_byes_into_round_two() {
        let parts: Vec<_> = (1..=5).map(pid).collect();
        let (bracket, matches) = generate(&parts, "", 0);
        assert_eq!(bracket.rounds.len(), 3); // size 8
        let round2 = &bracket.rounds[1];
        for id in &round2.matches {
            let m = matches.get(id).unwrap();
            assert!(
                m.participants[0].is_some() && m.participants[1].is_some(),
                "round 2 must never contain a dangling bye slot"
            );
        }
    }

    #[test]
    fn seed_one_and_two_can_only_meet_in_the_final() {
        let parts: Vec<_> = (1..=8).map(pid).collect();
        let (bracket, matches) = generate(&parts, "", 0);
        for round in &bracket.rounds[..bracket.rounds.len() - 1] {
            for id in &round.matches {
                let m = matches.get(id).unwrap();
                let has_seed1 = m.participants.contains(&Some(pid(1)));
                let has_seed2 = m.participants.contains(&Some(pid(2)));
                assert!(!(has_seed1 && has_seed2));
            }
        }
    }
}
