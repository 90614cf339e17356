// Draft session: the 20-step ban/pick state machine.
//
// A session owns the draft record while it runs. Every operation is
// synchronous; the one suspension point is a pick whose lane matches several
// roster players, which parks the pick as a `PendingPick` until the caller
// supplies the player through `resolve_pending`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::availability;
use super::lane::Lane;
use super::player::{resolve_player, PlayerResolution, RosterPlayer, TeamRoster};
use super::record::{DraftRecord, HeroSlot, MatchMeta, TeamDraft};
use super::step::{draft_schedule, ActionKind, DraftStep, Team, TEAM_SLOTS};
use super::validate::{validate, ValidationContext, ValidationError};
use crate::error::DraftError;
use crate::hero::{HeroCatalog, HeroRef};
use crate::payload::DraftPayload;

/// Where the session is in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    /// `cursor` indexes the 20-step schedule.
    InProgress { cursor: usize },
    Finished,
}

/// What to write into a ban slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BanChoice {
    Hero(String),
    Skip,
}

impl BanChoice {
    pub fn hero(name: impl Into<String>) -> Self {
        BanChoice::Hero(name.into())
    }
}

/// An out-of-band correction to a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEdit {
    Hero(String),
    /// Only valid for bans.
    Skip,
    /// Empties the hero. Pick slots keep their lane and player.
    Clear,
}

/// Result of an action that writes a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Committed {
        team: Team,
        slot: usize,
        player: Option<String>,
    },
    /// Several roster players fit the lane. Nothing was written; call
    /// `resolve_pending` with one of `candidates`.
    DecisionPending {
        team: Team,
        slot: usize,
        candidates: Vec<RosterPlayer>,
    },
}

/// A pick held back until the caller picks a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPick {
    pub team: Team,
    pub slot: usize,
    pub hero: HeroRef,
    pub candidates: Vec<RosterPlayer>,
    /// Whether committing advances the cursor (scheduled pick) or not
    /// (correction made through `edit_slot`).
    scheduled: bool,
}

/// A ban/pick session over a hero catalog and the two team rosters.
///
/// Catalog and rosters are snapshots taken at construction. Changes to the
/// underlying sources during a session are not picked up; build a new
/// session to see them.
#[derive(Debug, Clone)]
pub struct DraftSession {
    schedule: Vec<DraftStep>,
    state: SessionState,
    record: DraftRecord,
    catalog: HeroCatalog,
    blue_roster: TeamRoster,
    red_roster: TeamRoster,
    pending: Option<PendingPick>,
}

impl DraftSession {
    pub fn new(
        catalog: HeroCatalog,
        blue_roster: TeamRoster,
        red_roster: TeamRoster,
        meta: MatchMeta,
    ) -> Self {
        DraftSession {
            schedule: draft_schedule(),
            state: SessionState::NotStarted,
            record: DraftRecord::new(meta),
            catalog,
            blue_roster,
            red_roster,
            pending: None,
        }
    }

    /// Reopen a saved draft for corrections. The session starts `Finished`;
    /// only `edit_slot`, lane operations, `undo` and `reset` apply.
    pub fn resume(
        catalog: HeroCatalog,
        blue_roster: TeamRoster,
        red_roster: TeamRoster,
        record: DraftRecord,
    ) -> Self {
        DraftSession {
            state: SessionState::Finished,
            record,
            ..DraftSession::new(catalog, blue_roster, red_roster, MatchMeta::default())
        }
    }

    // -- Read access ---------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn schedule(&self) -> &[DraftStep] {
        &self.schedule
    }

    pub fn current_step(&self) -> Option<DraftStep> {
        match self.state {
            SessionState::InProgress { cursor } => self.schedule.get(cursor).copied(),
            _ => None,
        }
    }

    pub fn record(&self) -> &DraftRecord {
        &self.record
    }

    pub fn meta_mut(&mut self) -> &mut MatchMeta {
        &mut self.record.meta
    }

    pub fn catalog(&self) -> &HeroCatalog {
        &self.catalog
    }

    pub fn roster(&self, team: Team) -> &TeamRoster {
        match team {
            Team::Blue => &self.blue_roster,
            Team::Red => &self.red_roster,
        }
    }

    pub fn pending(&self) -> Option<&PendingPick> {
        self.pending.as_ref()
    }

    /// Hand the record to the caller, ending the session.
    pub fn into_record(self) -> DraftRecord {
        self.record
    }

    // -- Availability --------------------------------------------------------

    /// Heroes that cannot be banned or picked: everything in a slot plus the
    /// hero held by a pending pick.
    pub fn unavailable(&self) -> BTreeSet<String> {
        let mut taken = availability::unavailable(&self.record);
        if let Some(pending) = &self.pending {
            taken.insert(pending.hero.name.clone());
        }
        taken
    }

    pub fn available_heroes(&self) -> Vec<&HeroRef> {
        let taken = self.unavailable();
        self.catalog
            .heroes()
            .iter()
            .filter(|h| !taken.contains(&h.name))
            .collect()
    }

    // -- Lane assignment -----------------------------------------------------

    pub fn assign_lane(&mut self, team: Team, slot: usize, lane: Lane) -> Result<(), DraftError> {
        self.ensure_slot_not_pending(team, slot)?;
        self.record.team_mut(team).assign_lane(slot, lane)?;
        debug!("{team} pick slot {slot} assigned lane {lane}");
        Ok(())
    }

    pub fn clear_lane(&mut self, team: Team, slot: usize) -> Result<(), DraftError> {
        self.ensure_slot_not_pending(team, slot)?;
        self.record.team_mut(team).clear_lane(slot)
    }

    /// Swap two pick slots of one team; hero, lane and player move together.
    pub fn swap_slots(&mut self, team: Team, a: usize, b: usize) -> Result<(), DraftError> {
        self.ensure_slot_not_pending(team, a)?;
        self.ensure_slot_not_pending(team, b)?;
        self.record.team_mut(team).swap_slots(a, b)?;
        debug!("{team} pick slots {a} and {b} swapped");
        Ok(())
    }

    /// Explicitly set or clear the credited player of a pick slot.
    pub fn assign_player(
        &mut self,
        team: Team,
        slot: usize,
        player: Option<String>,
    ) -> Result<(), DraftError> {
        self.ensure_slot_not_pending(team, slot)?;
        self.record.team_mut(team).pick_mut(slot)?.player = player;
        Ok(())
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Begin banning. Both teams need all five lanes, none repeated.
    pub fn start(&mut self) -> Result<(), DraftError> {
        if self.state != SessionState::NotStarted {
            return Err(DraftError::PreconditionNotMet(vec![
                "draft has already been started".to_string(),
            ]));
        }

        let mut problems = Vec::new();
        for team in Team::BOTH {
            let side = self.record.team(team);
            let missing: Vec<String> = side
                .picks
                .iter()
                .enumerate()
                .filter(|(_, p)| p.lane.is_none())
                .map(|(i, _)| i.to_string())
                .collect();
            if !missing.is_empty() {
                problems.push(format!("{team} slots {} have no lane", missing.join(", ")));
            }
            for lane in side.duplicate_lanes() {
                problems.push(format!("{team} lane {lane} is assigned more than once"));
            }
        }
        if !problems.is_empty() {
            return Err(DraftError::PreconditionNotMet(problems));
        }

        self.state = SessionState::InProgress { cursor: 0 };
        info!("draft started");
        Ok(())
    }

    /// Back to `NotStarted`. Bans and pick heroes are cleared; lanes and
    /// players stay. Any pending decision is dropped.
    pub fn reset(&mut self) {
        self.state = SessionState::NotStarted;
        self.pending = None;
        self.record.blue.clear_heroes();
        self.record.red.clear_heroes();
        info!("draft reset");
    }

    /// Clear lanes and players too, leaving only the match metadata.
    pub fn reset_assignments(&mut self) {
        self.reset();
        self.record.blue = TeamDraft::default();
        self.record.red = TeamDraft::default();
    }

    // -- Scheduled actions ---------------------------------------------------

    pub fn submit_ban(&mut self, choice: BanChoice) -> Result<(), DraftError> {
        self.ensure_no_pending()?;
        let step = self.expect_step(ActionKind::Ban)?;

        self.ensure_slot_empty(step.team, ActionKind::Ban, step.slot_index)?;
        let slot = match choice {
            BanChoice::Skip => HeroSlot::Skipped,
            BanChoice::Hero(name) => HeroSlot::Filled(self.take_hero(&name, None)?),
        };
        debug!(
            "{} ban {} ({}): {:?}",
            step.team,
            step.slot_index,
            step.phase,
            slot.hero().map(|h| h.name.as_str())
        );
        *self.record.team_mut(step.team).ban_mut(step.slot_index)? = slot;
        self.advance();
        Ok(())
    }

    /// Pick a hero for the current step's slot. The slot must already have
    /// a lane. When several roster players fit that lane, nothing is written
    /// and the cursor holds until `resolve_pending`.
    pub fn submit_pick(&mut self, hero_name: &str) -> Result<SlotOutcome, DraftError> {
        self.ensure_no_pending()?;
        let step = self.expect_step(ActionKind::Pick)?;
        let (team, slot) = (step.team, step.slot_index);
        self.ensure_slot_empty(team, ActionKind::Pick, slot)?;

        let current = self.record.team(team).pick(slot)?;
        let lane = current.lane.ok_or(DraftError::LaneRequired { team, slot })?;
        let kept_player = current.player.clone();
        let hero = self.take_hero(hero_name, None)?;

        let player = match kept_player {
            Some(player) => Some(player),
            None => match resolve_player(self.roster(team), lane) {
                PlayerResolution::Unassigned => None,
                PlayerResolution::Assigned(player) => Some(player),
                PlayerResolution::Ambiguous(candidates) => {
                    return Ok(self.park(team, slot, hero, candidates, true));
                }
            },
        };

        let outcome = self.commit_pick(team, slot, hero, player);
        self.advance();
        Ok(outcome)
    }

    /// Supply the player for a pending pick and write it.
    pub fn resolve_pending(&mut self, player_name: &str) -> Result<SlotOutcome, DraftError> {
        let pending = self.pending.take().ok_or(DraftError::NoPendingDecision)?;
        if !pending.candidates.iter().any(|c| c.player_name == player_name) {
            let err = DraftError::UnknownCandidate {
                team: pending.team,
                slot: pending.slot,
                player: player_name.to_string(),
            };
            self.pending = Some(pending);
            return Err(err);
        }

        let outcome = self.commit_pick(
            pending.team,
            pending.slot,
            pending.hero,
            Some(player_name.to_string()),
        );
        if pending.scheduled {
            self.advance();
        }
        Ok(outcome)
    }

    /// Drop a pending pick without writing anything.
    pub fn discard_pending(&mut self) -> Result<PendingPick, DraftError> {
        let pending = self.pending.take().ok_or(DraftError::NoPendingDecision)?;
        debug!("{} pick slot {} decision discarded", pending.team, pending.slot);
        Ok(pending)
    }

    /// Let the current step lapse, as when the turn timer runs out. A ban
    /// step records a skip; a pick step advances with the hero left empty.
    /// A slot that already holds a hero keeps it.
    pub fn skip_turn(&mut self) -> Result<DraftStep, DraftError> {
        self.ensure_no_pending()?;
        let step = self.current_step().ok_or_else(|| DraftError::IllegalStep {
            action: "skip",
            detail: self.inactive_reason(),
        })?;
        if step.kind == ActionKind::Ban {
            let ban = self.record.team_mut(step.team).ban_mut(step.slot_index)?;
            if ban.hero().is_none() {
                *ban = HeroSlot::Skipped;
            }
        }
        debug!("{} {} {} skipped", step.team, step.kind, step.slot_index);
        self.advance();
        Ok(step)
    }

    /// Step back one action and empty the slot it filled. Pick slots keep
    /// their lane and player.
    pub fn undo(&mut self) -> Result<DraftStep, DraftError> {
        self.ensure_no_pending()?;
        let cursor = match self.state {
            SessionState::InProgress { cursor } if cursor > 0 => cursor - 1,
            SessionState::Finished => self.schedule.len() - 1,
            _ => {
                return Err(DraftError::IllegalStep {
                    action: "undo",
                    detail: "no step has been taken yet".to_string(),
                });
            }
        };
        let step = self.schedule[cursor];
        let side = self.record.team_mut(step.team);
        match step.kind {
            ActionKind::Ban => *side.ban_mut(step.slot_index)? = HeroSlot::Unfilled,
            ActionKind::Pick => side.pick_mut(step.slot_index)?.hero = None,
        }
        self.state = SessionState::InProgress { cursor };
        debug!("undid {} {} {}", step.team, step.kind, step.slot_index);
        Ok(step)
    }

    // -- Corrections ---------------------------------------------------------

    /// Overwrite one slot outside the schedule. Allowed in any state,
    /// including after the draft has finished.
    ///
    /// A pick keeps its lane and player. If the slot has a lane but no
    /// player yet, the player is resolved exactly as for a fresh pick,
    /// which may park the edit as a pending decision.
    pub fn edit_slot(
        &mut self,
        kind: ActionKind,
        team: Team,
        index: usize,
        edit: SlotEdit,
    ) -> Result<SlotOutcome, DraftError> {
        if index >= TEAM_SLOTS {
            return Err(DraftError::SlotOutOfRange(index));
        }
        if kind == ActionKind::Pick {
            self.ensure_slot_not_pending(team, index)?;
        }

        match (kind, edit) {
            (ActionKind::Ban, edit) => {
                let slot = match edit {
                    SlotEdit::Hero(name) => {
                        HeroSlot::Filled(self.take_hero(&name, Some((team, kind, index)))?)
                    }
                    SlotEdit::Skip => HeroSlot::Skipped,
                    SlotEdit::Clear => HeroSlot::Unfilled,
                };
                debug!("{team} ban {index} edited: {:?}", slot.hero().map(|h| h.name.as_str()));
                *self.record.team_mut(team).ban_mut(index)? = slot;
                Ok(SlotOutcome::Committed {
                    team,
                    slot: index,
                    player: None,
                })
            }
            (ActionKind::Pick, SlotEdit::Skip) => Err(DraftError::IllegalStep {
                action: "skip",
                detail: "a pick slot cannot be skipped".to_string(),
            }),
            (ActionKind::Pick, SlotEdit::Clear) => {
                let pick = self.record.team_mut(team).pick_mut(index)?;
                pick.hero = None;
                debug!("{team} pick {index} hero cleared");
                Ok(SlotOutcome::Committed {
                    team,
                    slot: index,
                    player: pick.player.clone(),
                })
            }
            (ActionKind::Pick, SlotEdit::Hero(name)) => {
                let hero = self.take_hero(&name, Some((team, kind, index)))?;
                let current = self.record.team(team).pick(index)?;
                let (lane, existing) = (current.lane, current.player.clone());
                let player = match (lane, existing) {
                    (Some(lane), None) => match resolve_player(self.roster(team), lane) {
                        PlayerResolution::Unassigned => None,
                        PlayerResolution::Assigned(player) => Some(player),
                        PlayerResolution::Ambiguous(candidates) => {
                            // Only one decision can be outstanding.
                            self.ensure_no_pending()?;
                            return Ok(self.park(team, index, hero, candidates, false));
                        }
                    },
                    (_, player) => player,
                };
                Ok(self.commit_pick(team, index, hero, player))
            }
        }
    }

    // -- Validation and export -----------------------------------------------

    pub fn validate(&self, ctx: &ValidationContext) -> Vec<ValidationError> {
        validate(&self.record, ctx)
    }

    /// Validate and produce the persistence payload. Fails with every
    /// validation error at once, or with `DecisionPending` while a pick is
    /// parked.
    pub fn finalize(&self, ctx: &ValidationContext) -> Result<DraftPayload, DraftError> {
        self.ensure_no_pending()?;
        let errors = self.validate(ctx);
        if !errors.is_empty() {
            warn!("finalize rejected: {} validation errors", errors.len());
            return Err(DraftError::ValidationFailed(errors));
        }
        Ok(DraftPayload::from_record(&self.record))
    }

    // -- Internals -----------------------------------------------------------

    fn expect_step(&self, kind: ActionKind) -> Result<DraftStep, DraftError> {
        let action = match kind {
            ActionKind::Ban => "ban",
            ActionKind::Pick => "pick",
        };
        let step = self.current_step().ok_or_else(|| DraftError::IllegalStep {
            action,
            detail: self.inactive_reason(),
        })?;
        if step.kind != kind {
            return Err(DraftError::IllegalStep {
                action,
                detail: format!("it is {}'s turn to {}", step.team, step.kind),
            });
        }
        Ok(step)
    }

    fn inactive_reason(&self) -> String {
        match self.state {
            SessionState::NotStarted => "draft has not started".to_string(),
            SessionState::Finished => "draft is finished".to_string(),
            SessionState::InProgress { cursor } => format!("no step at position {cursor}"),
        }
    }

    fn ensure_no_pending(&self) -> Result<(), DraftError> {
        match &self.pending {
            Some(p) => Err(DraftError::DecisionPending {
                team: p.team,
                slot: p.slot,
            }),
            None => Ok(()),
        }
    }

    fn ensure_slot_not_pending(&self, team: Team, slot: usize) -> Result<(), DraftError> {
        match &self.pending {
            Some(p) if p.team == team && p.slot == slot => {
                Err(DraftError::DecisionPending { team, slot })
            }
            _ => Ok(()),
        }
    }

    /// A scheduled write never replaces a hero already in its slot, e.g. one
    /// moved there by `swap_slots` or `edit_slot` ahead of the schedule.
    fn ensure_slot_empty(
        &self,
        team: Team,
        kind: ActionKind,
        slot: usize,
    ) -> Result<(), DraftError> {
        match self.record.team(team).hero_at(kind, slot) {
            Some(hero) => Err(DraftError::SlotOccupied {
                team,
                kind,
                slot,
                hero: hero.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Look up a hero and make sure nobody else holds it. `replacing` names
    /// the slot being overwritten, whose own hero does not count as taken.
    fn take_hero(
        &self,
        name: &str,
        replacing: Option<(Team, ActionKind, usize)>,
    ) -> Result<HeroRef, DraftError> {
        let hero = self
            .catalog
            .get(name)
            .cloned()
            .ok_or_else(|| DraftError::UnknownHero(name.to_string()))?;
        let already_here = replacing
            .and_then(|(team, kind, index)| self.record.team(team).hero_at(kind, index))
            .is_some_and(|h| h.name == hero.name);
        if !already_here && self.unavailable().contains(&hero.name) {
            return Err(DraftError::HeroUnavailable(hero.name));
        }
        Ok(hero)
    }

    fn park(
        &mut self,
        team: Team,
        slot: usize,
        hero: HeroRef,
        candidates: Vec<RosterPlayer>,
        scheduled: bool,
    ) -> SlotOutcome {
        debug!(
            "{team} pick {slot} ({}) waiting for a choice between {} players",
            hero.name,
            candidates.len()
        );
        self.pending = Some(PendingPick {
            team,
            slot,
            hero,
            candidates: candidates.clone(),
            scheduled,
        });
        SlotOutcome::DecisionPending {
            team,
            slot,
            candidates,
        }
    }

    fn commit_pick(
        &mut self,
        team: Team,
        slot: usize,
        hero: HeroRef,
        player: Option<String>,
    ) -> SlotOutcome {
        debug!("{team} pick {slot}: {} credited to {:?}", hero.name, player);
        let pick = &mut self.record.team_mut(team).picks[slot];
        pick.hero = Some(hero);
        pick.player = player.clone();
        SlotOutcome::Committed { team, slot, player }
    }

    fn advance(&mut self) {
        if let SessionState::InProgress { cursor } = self.state {
            let next = cursor + 1;
            if next >= self.schedule.len() {
                self.state = SessionState::Finished;
                info!(
                    "draft finished: {} bans, {} picks entered",
                    self.record.bans_entered(),
                    self.record.picks_entered()
                );
            } else {
                self.state = SessionState::InProgress { cursor: next };
            }
        }
    }
}
