// Team rosters and the player resolver that credits a pick to a roster player.

use serde::{Deserialize, Serialize};

use super::lane::Lane;

/// A registered player on a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_name: String,
    /// Free-form role as registered ("Gold Laner", "Jungle", "Roamer", ...).
    pub role: String,
    #[serde(default)]
    pub is_substitute: bool,
}

impl RosterPlayer {
    pub fn new(
        player_name: impl Into<String>,
        role: impl Into<String>,
        is_substitute: bool,
    ) -> Self {
        RosterPlayer {
            player_name: player_name.into(),
            role: role.into(),
            is_substitute,
        }
    }
}

/// A team's roster snapshot. Opponent teams usually have an empty roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub players: Vec<RosterPlayer>,
}

impl TeamRoster {
    pub fn new(players: Vec<RosterPlayer>) -> Self {
        TeamRoster { players }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players whose role plays `lane`, starters before substitutes and in
    /// roster order otherwise.
    pub fn candidates_for(&self, lane: Lane) -> Vec<&RosterPlayer> {
        let mut matches: Vec<&RosterPlayer> = self
            .players
            .iter()
            .filter(|p| lane.matches_role(&p.role))
            .collect();
        // Stable sort keeps roster order within starters and within subs.
        matches.sort_by_key(|p| p.is_substitute);
        matches
    }

    pub fn contains(&self, player_name: &str) -> bool {
        self.players.iter().any(|p| p.player_name == player_name)
    }
}

/// Outcome of resolving which player is credited for a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerResolution {
    /// No roster player plays this lane (or the team has no roster).
    Unassigned,
    /// Exactly one roster player plays this lane.
    Assigned(String),
    /// Several roster players play this lane; the caller has to choose.
    Ambiguous(Vec<RosterPlayer>),
}

/// Resolve the player for `lane` from `roster`.
pub fn resolve_player(roster: &TeamRoster, lane: Lane) -> PlayerResolution {
    let candidates = roster.candidates_for(lane);
    match candidates.as_slice() {
        [] => PlayerResolution::Unassigned,
        [only] => PlayerResolution::Assigned(only.player_name.clone()),
        _ => PlayerResolution::Ambiguous(candidates.into_iter().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> TeamRoster {
        TeamRoster::new(vec![
            RosterPlayer::new("Kiboy", "EXP Laner", false),
            RosterPlayer::new("Sanz", "Mid Laner", false),
            RosterPlayer::new("Kirk", "Jungler", true),
            RosterPlayer::new("Kelra", "Jungler", false),
            RosterPlayer::new("CW", "Gold Laner", false),
            RosterPlayer::new("Baloyskie", "Roamer", false),
        ])
    }

    #[test]
    fn empty_roster_leaves_lane_unassigned() {
        assert_eq!(
            resolve_player(&TeamRoster::default(), Lane::Mid),
            PlayerResolution::Unassigned
        );
    }

    #[test]
    fn single_match_auto_assigns() {
        assert_eq!(
            resolve_player(&roster(), Lane::Gold),
            PlayerResolution::Assigned("CW".into())
        );
        assert_eq!(
            resolve_player(&roster(), Lane::Exp),
            PlayerResolution::Assigned("Kiboy".into())
        );
    }

    #[test]
    fn multiple_matches_are_ambiguous_starters_first() {
        match resolve_player(&roster(), Lane::Jungler) {
            PlayerResolution::Ambiguous(candidates) => {
                let names: Vec<_> = candidates.iter().map(|p| p.player_name.as_str()).collect();
                assert_eq!(names, vec!["Kelra", "Kirk"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn no_matching_role_is_unassigned() {
        let roster = TeamRoster::new(vec![RosterPlayer::new("Coach", "Analyst", false)]);
        assert_eq!(resolve_player(&roster, Lane::Roam), PlayerResolution::Unassigned);
    }

    #[test]
    fn single_player_per_lane_never_ambiguous() {
        let roster = TeamRoster::new(vec![
            RosterPlayer::new("A", "exp", false),
            RosterPlayer::new("B", "jungle", false),
            RosterPlayer::new("C", "mid", false),
            RosterPlayer::new("D", "adc", false),
            RosterPlayer::new("E", "support", false),
        ]);
        for lane in Lane::ALL {
            assert!(
                matches!(resolve_player(&roster, lane), PlayerResolution::Assigned(_)),
                "{lane}"
            );
        }
    }

    #[test]
    fn contains_checks_exact_name() {
        assert!(roster().contains("Sanz"));
        assert!(!roster().contains("sanz"));
    }
}
