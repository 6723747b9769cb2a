//! Doubles-mode wrapper: groups participants into teams via
//! `team_assignments`, drops any team that didn't fill to `team_size`, then
//! delegates to the single- or double-elimination engine treating each
//! team as one entrant (a team's [`TeamId`] is reused as the entrant id
//! seated in bracket match slots).

use crate::brackets::{single_elim, Bracket};
use crate::ids::{MatchId, ParticipantId, TeamId};
use crate::match_::Match;
use crate::meta::TournamentType;
use crate::participant::Team;
use crate::utils::OrderedMap;

use super::{double_elim, DoublesBracket};

pub fn generate(
    team_assignments: &OrderedMap<ParticipantId, TeamId>,
    team_names: &OrderedMap<TeamId, String>,
    team_size: u32,
    bracket_type: TournamentType,
    now: i64,
) -> (DoublesBracket, OrderedMap<MatchId, Match>) {
    let mut members_by_team: OrderedMap<TeamId, Vec<ParticipantId>> = OrderedMap::default();
    for (participant_id, team_id) in team_assignments.iter() {
        members_by_team
            .get_mut(team_id)
            .map(|m| m.push(participant_id.clone()));
        if !members_by_team.contains_key(team_id) {
            members_by_team.insert(team_id.clone(), vec![participant_id.clone()]);
        }
    }

    let mut teams: OrderedMap<TeamId, Team> = OrderedMap::default();
    let mut complete_assignments: OrderedMap<ParticipantId, TeamId> = OrderedMap::default();
    let mut entrants: Vec<ParticipantId> = Vec::new();
    for (team_id, members) in members_by_team.iter() {
        if (members.len() as u32) < team_size {
            continue; // short team, excluded from competition
        }
        let name = team_names
            .get(team_id)
            .cloned()
            .unwrap_or_else(|| team_id.as_str().to_string());
        teams.insert(
            team_id.clone(),
            Team {
                id: team_id.clone(),
                name,
                members: members.clone(),
            },
        );
        for member in members {
            complete_assignments.insert(member.clone(), team_id.clone());
        }
        entrants.push(ParticipantId::from(team_id.as_str()));
    }

    let inner = match bracket_type {
        TournamentType::Double => {
            let (b, m) = double_elim::generate(&entrants, now);
            (Bracket::Double(b), m)
        }
        _ => {
            let (b, m) = single_elim::generate(&entrants, "", now);
            (Bracket::Single(b), m)
        }
    };

    (
        DoublesBracket {
            inner: Box::new(inner.0),
            teams,
            team_assignments: complete_assignments,
        },
        inner.1,
    )
}
