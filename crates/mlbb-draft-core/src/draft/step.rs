// Draft schedule: the fixed 20-step ban/pick order of a ranked MLBB draft.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ban slots and pick slots each team owns.
pub const TEAM_SLOTS: usize = 5;

/// Total number of scheduled steps in one draft.
pub const SCHEDULE_LEN: usize = 20;

/// The two sides of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub const BOTH: [Team; 2] = [Team::Blue, Team::Red];

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// What a step asks the acting team to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Ban,
    Pick,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Ban => f.write_str("ban"),
            ActionKind::Pick => f.write_str("pick"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    One,
    Two,
}

impl Phase {
    pub const BOTH: [Phase; 2] = [Phase::One, Phase::Two];

    /// Team-local slot indices that belong to this phase, for bans and picks
    /// alike: phase one fills slots 0..=2, phase two fills 3..=4.
    pub fn slot_range(self) -> std::ops::Range<usize> {
        match self {
            Phase::One => 0..3,
            Phase::Two => 3..TEAM_SLOTS,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.number())
    }
}

/// One scheduled action.
///
/// `slot_index` is the position inside the acting team's five-slot ban or
/// pick row, precomputed when the schedule is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStep {
    pub kind: ActionKind,
    pub team: Team,
    pub phase: Phase,
    pub slot_index: usize,
}

// Acting team per step, one row per schedule segment.
const PHASE1_BANS: [Team; 6] = [
    Team::Blue, Team::Red, Team::Blue, Team::Red, Team::Blue, Team::Red,
];
const PHASE1_PICKS: [Team; 6] = [
    Team::Blue, Team::Red, Team::Red, Team::Blue, Team::Blue, Team::Red,
];
const PHASE2_BANS: [Team; 4] = [Team::Red, Team::Blue, Team::Red, Team::Blue];
const PHASE2_PICKS: [Team; 4] = [Team::Red, Team::Blue, Team::Blue, Team::Red];

/// Build the canonical 20-step schedule.
///
/// Each segment numbers its slots per team starting from the phase's first
/// slot, so a team's third phase-one ban lands in slot 2 and its first
/// phase-two ban in slot 3.
pub fn draft_schedule() -> Vec<DraftStep> {
    let segments: [(ActionKind, Phase, &[Team]); 4] = [
        (ActionKind::Ban, Phase::One, &PHASE1_BANS[..]),
        (ActionKind::Pick, Phase::One, &PHASE1_PICKS[..]),
        (ActionKind::Ban, Phase::Two, &PHASE2_BANS[..]),
        (ActionKind::Pick, Phase::Two, &PHASE2_PICKS[..]),
    ];

    let mut steps = Vec::with_capacity(SCHEDULE_LEN);
    for (kind, phase, order) in segments {
        let mut next = [phase.slot_range().start; 2];
        for &team in order {
            let counter = &mut next[team as usize];
            steps.push(DraftStep {
                kind,
                team,
                phase,
                slot_index: *counter,
            });
            *counter += 1;
        }
    }
    steps
}
