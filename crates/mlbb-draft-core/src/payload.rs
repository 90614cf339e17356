// Persistence payload: the per-team ban/pick shape a logged match is saved in.
//
// A skipped ban is written as `null` at its position. Unfilled bans are left
// out, so only a finished draft round-trips position for position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::lane::Lane;
use crate::draft::record::{DraftRecord, HeroSlot, MatchMeta, PickSlot, TeamDraft};
use crate::draft::step::{Phase, Team};
use crate::hero::{HeroCatalog, HeroRef};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("unknown hero `{0}`")]
    UnknownHero(String),

    #[error("unknown lane `{0}`")]
    UnknownLane(String),

    #[error("{team} {group} has {len} entries, expected at most {max}")]
    TooManyEntries {
        team: Team,
        group: &'static str,
        len: usize,
        max: usize,
    },
}

/// One pick as stored: lane, hero and credited player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickEntry {
    pub lane: Option<String>,
    pub hero: Option<String>,
    pub player: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPayload {
    #[serde(default)]
    pub banning_phase1: Vec<Option<String>>,
    #[serde(default)]
    pub banning_phase2: Vec<Option<String>>,
    #[serde(default)]
    pub picks1: Vec<PickEntry>,
    #[serde(default)]
    pub picks2: Vec<PickEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPayload {
    pub blue: TeamPayload,
    pub red: TeamPayload,
}

impl DraftPayload {
    pub fn from_record(record: &DraftRecord) -> Self {
        DraftPayload {
            blue: TeamPayload::from_team(&record.blue),
            red: TeamPayload::from_team(&record.red),
        }
    }

    pub fn team(&self, team: Team) -> &TeamPayload {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }
}

impl TeamPayload {
    fn from_team(team: &TeamDraft) -> Self {
        let bans = |phase: Phase| -> Vec<Option<String>> {
            team.bans[phase.slot_range()]
                .iter()
                .filter_map(|slot| match slot {
                    HeroSlot::Unfilled => None,
                    HeroSlot::Skipped => Some(None),
                    HeroSlot::Filled(hero) => Some(Some(hero.name.clone())),
                })
                .collect()
        };
        let picks = |phase: Phase| -> Vec<PickEntry> {
            team.picks[phase.slot_range()]
                .iter()
                .map(|pick| PickEntry {
                    lane: pick.lane.map(|l| l.display_str().to_string()),
                    hero: pick.hero.as_ref().map(|h| h.name.clone()),
                    player: pick.player.clone(),
                })
                .collect()
        };
        TeamPayload {
            banning_phase1: bans(Phase::One),
            banning_phase2: bans(Phase::Two),
            picks1: picks(Phase::One),
            picks2: picks(Phase::Two),
        }
    }

    fn to_team(&self, team: Team, catalog: &HeroCatalog) -> Result<TeamDraft, PayloadError> {
        let mut draft = TeamDraft::default();
        let groups = [
            (Phase::One, "banning_phase1", &self.banning_phase1, "picks1", &self.picks1),
            (Phase::Two, "banning_phase2", &self.banning_phase2, "picks2", &self.picks2),
        ];
        for (phase, ban_group, bans, pick_group, picks) in groups {
            let range = phase.slot_range();
            let max = range.len();
            if bans.len() > max {
                return Err(PayloadError::TooManyEntries {
                    team,
                    group: ban_group,
                    len: bans.len(),
                    max,
                });
            }
            if picks.len() > max {
                return Err(PayloadError::TooManyEntries {
                    team,
                    group: pick_group,
                    len: picks.len(),
                    max,
                });
            }
            for (slot, ban) in range.clone().zip(bans) {
                draft.bans[slot] = match ban {
                    None => HeroSlot::Skipped,
                    Some(name) => HeroSlot::Filled(lookup(catalog, name)?),
                };
            }
            for (slot, entry) in range.zip(picks) {
                draft.picks[slot] = PickSlot {
                    hero: entry.hero.as_deref().map(|n| lookup(catalog, n)).transpose()?,
                    lane: entry.lane.as_deref().map(parse_lane).transpose()?,
                    player: entry.player.clone().filter(|p| !p.trim().is_empty()),
                };
            }
        }
        Ok(draft)
    }
}

fn parse_lane(name: &str) -> Result<Lane, PayloadError> {
    Lane::from_str_lane(name).ok_or_else(|| PayloadError::UnknownLane(name.to_string()))
}

fn lookup(catalog: &HeroCatalog, name: &str) -> Result<HeroRef, PayloadError> {
    catalog
        .get(name)
        .cloned()
        .ok_or_else(|| PayloadError::UnknownHero(name.to_string()))
}

impl DraftRecord {
    /// Rebuild a record from a stored payload, resolving hero names against
    /// `catalog`.
    pub fn from_payload(
        payload: &DraftPayload,
        catalog: &HeroCatalog,
        meta: MatchMeta,
    ) -> Result<DraftRecord, PayloadError> {
        Ok(DraftRecord {
            blue: payload.blue.to_team(Team::Blue, catalog)?,
            red: payload.red.to_team(Team::Red, catalog)?,
            meta,
        })
    }
}
