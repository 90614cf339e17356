// Draft validation: is a populated draft complete enough to save?

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{DraftRecord, MatchMeta};
use super::step::{Phase, Team};

/// Names the validator needs beyond the slots themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    pub winner: String,
    pub blue_team: String,
    pub red_team: String,
    /// The side whose picks must all credit a roster player.
    pub home_team: String,
}

impl ValidationContext {
    pub fn from_meta(meta: &MatchMeta, home_team: impl Into<String>) -> Self {
        ValidationContext {
            winner: meta.winner.clone(),
            blue_team: meta.blue_team.clone(),
            red_team: meta.red_team.clone(),
            home_team: home_team.into(),
        }
    }

    /// Which side the home team plays, matched by trimmed, case-insensitive
    /// name. `None` when it matches neither side.
    pub fn home_side(&self) -> Option<Team> {
        let home = self.home_team.trim();
        if home.is_empty() {
            return None;
        }
        Team::BOTH.into_iter().find(|&team| {
            let name = match team {
                Team::Blue => &self.blue_team,
                Team::Red => &self.red_team,
            };
            name.trim().eq_ignore_ascii_case(home)
        })
    }
}

/// A single problem with a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{team} team name is empty")]
    MissingTeamName { team: Team },

    #[error("{team} {phase} bans have not been entered")]
    MissingBanGroup { team: Team, phase: Phase },

    #[error("{team} {phase} picks have not been entered")]
    MissingPickGroup { team: Team, phase: Phase },

    #[error("{team} pick {slot} has no hero")]
    PickMissingHero { team: Team, slot: usize },

    #[error("{team} pick {slot} has no lane")]
    PickMissingLane { team: Team, slot: usize },

    #[error("{team} pick {slot} has no player")]
    PickMissingPlayer { team: Team, slot: usize },

    #[error("winner `{winner}` is not one of the two teams")]
    WinnerNotParticipant { winner: String },
}

/// Check every rule and collect all violations. An empty result means the
/// draft can be exported.
pub fn validate(record: &DraftRecord, ctx: &ValidationContext) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for team in Team::BOTH {
        let name = match team {
            Team::Blue => &ctx.blue_team,
            Team::Red => &ctx.red_team,
        };
        if name.trim().is_empty() {
            errors.push(ValidationError::MissingTeamName { team });
        }
    }

    // A ban group is present once every slot holds a hero or a skip.
    for team in Team::BOTH {
        let bans = &record.team(team).bans;
        for phase in Phase::BOTH {
            if bans[phase.slot_range()].iter().any(|b| b.is_unfilled()) {
                errors.push(ValidationError::MissingBanGroup { team, phase });
            }
        }
    }

    // A pick group is present once any of its slots holds a hero.
    for team in Team::BOTH {
        let picks = &record.team(team).picks;
        for phase in Phase::BOTH {
            if picks[phase.slot_range()].iter().all(|p| p.hero.is_none()) {
                errors.push(ValidationError::MissingPickGroup { team, phase });
            }
        }
    }

    let home = ctx.home_side();
    for team in Team::BOTH {
        for (slot, pick) in record.team(team).picks.iter().enumerate() {
            if pick.hero.is_none() {
                errors.push(ValidationError::PickMissingHero { team, slot });
            }
            if pick.lane.is_none() {
                errors.push(ValidationError::PickMissingLane { team, slot });
            }
            if home == Some(team) && pick.player.is_none() {
                errors.push(ValidationError::PickMissingPlayer { team, slot });
            }
        }
    }

    let winner = ctx.winner.trim();
    if winner.is_empty() || (winner != ctx.blue_team.trim() && winner != ctx.red_team.trim()) {
        errors.push(ValidationError::WinnerNotParticipant {
            winner: ctx.winner.clone(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::lane::Lane;
    use crate::draft::record::{HeroSlot, PickSlot};
    use crate::hero::{HeroRef, HeroRole};

    fn ctx() -> ValidationContext {
        ValidationContext {
            winner: "ONIC".into(),
            blue_team: "ONIC".into(),
            red_team: "RRQ".into(),
            home_team: "onic".into(),
        }
    }

    fn complete_record() -> DraftRecord {
        let mut record = DraftRecord::default();
        let mut n = 0;
        for team in Team::BOTH {
            let side = record.team_mut(team);
            for slot in 0..5 {
                n += 1;
                side.bans[slot] = if slot == 4 {
                    HeroSlot::Skipped
                } else {
                    HeroSlot::Filled(HeroRef::new(format!("Ban{n}"), HeroRole::Tank, ""))
                };
                side.picks[slot] = PickSlot {
                    hero: Some(HeroRef::new(format!("Pick{n}"), HeroRole::Mage, "")),
                    lane: Some(Lane::ALL[slot]),
                    player: (team == Team::Blue).then(|| format!("P{slot}")),
                };
            }
        }
        record
    }

    #[test]
    fn complete_draft_has_no_errors() {
        assert_eq!(validate(&complete_record(), &ctx()), vec![]);
    }

    #[test]
    fn home_side_is_case_insensitive() {
        assert_eq!(ctx().home_side(), Some(Team::Blue));
        let mut c = ctx();
        c.home_team = " RRQ ".into();
        assert_eq!(c.home_side(), Some(Team::Red));
        c.home_team = "Blacklist".into();
        assert_eq!(c.home_side(), None);
    }

    #[test]
    fn empty_record_reports_every_rule() {
        let c = ValidationContext::default();
        let errors = validate(&DraftRecord::default(), &c);
        // 2 names + 4 ban groups + 4 pick groups + 10 heroes + 10 lanes + winner
        assert_eq!(errors.len(), 31);
        assert!(errors.contains(&ValidationError::MissingTeamName { team: Team::Blue }));
        assert!(errors.contains(&ValidationError::MissingBanGroup {
            team: Team::Red,
            phase: Phase::Two
        }));
        assert!(errors.contains(&ValidationError::PickMissingLane { team: Team::Red, slot: 4 }));
    }

    #[test]
    fn missing_home_player_is_one_error() {
        let mut record = complete_record();
        record.blue.picks[2].player = None;
        assert_eq!(
            validate(&record, &ctx()),
            vec![ValidationError::PickMissingPlayer { team: Team::Blue, slot: 2 }]
        );
        record.blue.picks[2].player = Some("Sanz".into());
        assert!(validate(&record, &ctx()).is_empty());
    }

    #[test]
    fn opponent_picks_need_no_player() {
        let record = complete_record();
        assert!(record.red.picks.iter().all(|p| p.player.is_none()));
        assert!(validate(&record, &ctx()).is_empty());
    }

    #[test]
    fn unfilled_ban_marks_group_missing() {
        let mut record = complete_record();
        record.red.bans[3] = HeroSlot::Unfilled;
        assert_eq!(
            validate(&record, &ctx()),
            vec![ValidationError::MissingBanGroup { team: Team::Red, phase: Phase::Two }]
        );
    }

    #[test]
    fn empty_pick_group_and_missing_heroes_are_both_reported() {
        let mut record = complete_record();
        record.red.picks[3].hero = None;
        record.red.picks[4].hero = None;
        let errors = validate(&record, &ctx());
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingPickGroup { team: Team::Red, phase: Phase::Two },
                ValidationError::PickMissingHero { team: Team::Red, slot: 3 },
                ValidationError::PickMissingHero { team: Team::Red, slot: 4 },
            ]
        );
    }

    #[test]
    fn winner_must_be_a_participant() {
        let mut c = ctx();
        c.winner = "Blacklist".into();
        assert_eq!(
            validate(&complete_record(), &c),
            vec![ValidationError::WinnerNotParticipant { winner: "Blacklist".into() }]
        );
        c.winner = String::new();
        assert_eq!(validate(&complete_record(), &c).len(), 1);
    }

    #[test]
    fn context_from_meta() {
        let meta = MatchMeta {
            blue_team: "ONIC".into(),
            red_team: "RRQ".into(),
            winner: "RRQ".into(),
            ..Default::default()
        };
        let c = ValidationContext::from_meta(&meta, "RRQ");
        assert_eq!(c.home_side(), Some(Team::Red));
        assert_eq!(c.winner, "RRQ");
    }

    #[test]
    fn errors_serialize_with_lowercase_names() {
        let err = ValidationError::MissingBanGroup { team: Team::Red, phase: Phase::Two };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"kind": "missing_ban_group", "team": "red", "phase": "two"})
        );
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(serde_json::from_str::<ValidationError>(&json).unwrap(), err);
    }
}
