// Draft record: per-team ban and pick slots plus match metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lane::Lane;
use super::step::{ActionKind, Team, TEAM_SLOTS};
use crate::error::DraftError;
use crate::hero::HeroRef;

/// Contents of a ban slot.
///
/// `Skipped` is an explicit pass and stays distinct from `Unfilled` (the
/// step has not been reached yet), so a skipped ban can still be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "hero", rename_all = "lowercase")]
pub enum HeroSlot {
    #[default]
    Unfilled,
    Skipped,
    Filled(HeroRef),
}

impl HeroSlot {
    pub fn hero(&self) -> Option<&HeroRef> {
        match self {
            HeroSlot::Filled(hero) => Some(hero),
            _ => None,
        }
    }

    pub fn is_unfilled(&self) -> bool {
        matches!(self, HeroSlot::Unfilled)
    }
}

/// A pick position: hero, lane and the credited player, each independently
/// clearable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSlot {
    pub hero: Option<HeroRef>,
    pub lane: Option<Lane>,
    pub player: Option<String>,
}

impl PickSlot {
    pub fn is_blank(&self) -> bool {
        self.hero.is_none() && self.lane.is_none() && self.player.is_none()
    }
}

/// One side of the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub bans: [HeroSlot; TEAM_SLOTS],
    pub picks: [PickSlot; TEAM_SLOTS],
}

impl TeamDraft {
    /// Heroes this side has banned or picked.
    pub fn heroes(&self) -> impl Iterator<Item = &HeroRef> {
        self.bans
            .iter()
            .filter_map(HeroSlot::hero)
            .chain(self.picks.iter().filter_map(|p| p.hero.as_ref()))
    }

    /// Player credited for `lane`, if any slot carries that lane and a player.
    pub fn player_for_lane(&self, lane: Lane) -> Option<&str> {
        self.picks
            .iter()
            .find(|p| p.lane == Some(lane))
            .and_then(|p| p.player.as_deref())
    }

    /// Clear bans and pick heroes; lanes and players stay.
    pub fn clear_heroes(&mut self) {
        self.bans = Default::default();
        for pick in &mut self.picks {
            pick.hero = None;
        }
    }

    pub(crate) fn pick(&self, index: usize) -> Result<&PickSlot, DraftError> {
        self.picks.get(index).ok_or(DraftError::SlotOutOfRange(index))
    }

    pub(crate) fn pick_mut(&mut self, index: usize) -> Result<&mut PickSlot, DraftError> {
        self.picks.get_mut(index).ok_or(DraftError::SlotOutOfRange(index))
    }

    pub(crate) fn ban_mut(&mut self, index: usize) -> Result<&mut HeroSlot, DraftError> {
        self.bans.get_mut(index).ok_or(DraftError::SlotOutOfRange(index))
    }

    /// Hero currently in the given slot, if any.
    pub(crate) fn hero_at(&self, kind: ActionKind, index: usize) -> Option<&HeroRef> {
        match kind {
            ActionKind::Ban => self.bans.get(index).and_then(HeroSlot::hero),
            ActionKind::Pick => self.picks.get(index).and_then(|p| p.hero.as_ref()),
        }
    }
}

/// Objective tallies for one side. Recorded alongside the draft, never
/// interpreted by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objectives {
    pub turtles: u32,
    pub lords: u32,
    pub towers: u32,
}

/// Match metadata owned by the match-entry flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMeta {
    pub played_on: Option<NaiveDate>,
    pub blue_team: String,
    pub red_team: String,
    /// Declared winner, by team name.
    pub winner: String,
    #[serde(default)]
    pub blue_objectives: Objectives,
    #[serde(default)]
    pub red_objectives: Objectives,
}

impl MatchMeta {
    pub fn team_name(&self, team: Team) -> &str {
        match team {
            Team::Blue => &self.blue_team,
            Team::Red => &self.red_team,
        }
    }
}

/// The complete draft: both sides and the match metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub blue: TeamDraft,
    pub red: TeamDraft,
    pub meta: MatchMeta,
}

impl DraftRecord {
    pub fn new(meta: MatchMeta) -> Self {
        DraftRecord {
            meta,
            ..Default::default()
        }
    }

    pub fn team(&self, team: Team) -> &TeamDraft {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }

    pub fn team_mut(&mut self, team: Team) -> &mut TeamDraft {
        match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
        }
    }

    /// Number of ban slots holding a hero or an explicit skip.
    pub fn bans_entered(&self) -> usize {
        Team::BOTH
            .iter()
            .flat_map(|&t| self.team(t).bans.iter())
            .filter(|b| !b.is_unfilled())
            .count()
    }

    /// Number of pick slots holding a hero.
    pub fn picks_entered(&self) -> usize {
        Team::BOTH
            .iter()
            .flat_map(|&t| self.team(t).picks.iter())
            .filter(|p| p.hero.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::HeroRole;

    fn hero(name: &str) -> HeroRef {
        HeroRef::new(name, HeroRole::Fighter, "")
    }

    #[test]
    fn new_record_is_empty() {
        let record = DraftRecord::default();
        assert_eq!(record.bans_entered(), 0);
        assert_eq!(record.picks_entered(), 0);
        assert!(record.blue.picks.iter().all(PickSlot::is_blank));
    }

    #[test]
    fn skipped_ban_counts_as_entered() {
        let mut record = DraftRecord::default();
        record.blue.bans[0] = HeroSlot::Skipped;
        record.red.bans[0] = HeroSlot::Filled(hero("Chou"));
        assert_eq!(record.bans_entered(), 2);
        assert_eq!(record.red.heroes().count(), 1);
        assert_eq!(record.blue.heroes().count(), 0);
    }

    #[test]
    fn clear_heroes_keeps_lane_and_player() {
        let mut team = TeamDraft::default();
        team.bans[1] = HeroSlot::Filled(hero("Fanny"));
        team.picks[2] = PickSlot {
            hero: Some(hero("Yu Zhong")),
            lane: Some(Lane::Exp),
            player: Some("Kairi".into()),
        };
        team.clear_heroes();
        assert!(team.bans.iter().all(HeroSlot::is_unfilled));
        assert_eq!(team.picks[2].hero, None);
        assert_eq!(team.picks[2].lane, Some(Lane::Exp));
        assert_eq!(team.player_for_lane(Lane::Exp), Some("Kairi"));
    }

    #[test]
    fn slot_access_out_of_range() {
        let mut team = TeamDraft::default();
        assert_eq!(team.pick(5).unwrap_err(), DraftError::SlotOutOfRange(5));
        assert!(team.ban_mut(7).is_err());
        assert!(team.hero_at(ActionKind::Pick, 9).is_none());
    }

    #[test]
    fn meta_team_name_by_side() {
        let meta = MatchMeta {
            blue_team: "ONIC".into(),
            red_team: "RRQ".into(),
            ..Default::default()
        };
        assert_eq!(meta.team_name(Team::Blue), "ONIC");
        assert_eq!(meta.team_name(Team::Red), "RRQ");
    }
}
