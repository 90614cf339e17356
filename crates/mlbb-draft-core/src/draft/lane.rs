// Lanes, the roster-role synonym table, and lane assignment on a team's
// pick row.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::TeamDraft;
use super::step::TEAM_SLOTS;
use crate::error::DraftError;

/// The five MLBB role positions a pick slot can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Exp,
    Jungler,
    Mid,
    Gold,
    Roam,
}

/// Roster-role synonyms per lane. A roster role matches a lane when it
/// contains one of the lane's synonyms. No synonym may occur inside another
/// lane's synonym; `synonyms_resolve_to_their_own_lane` checks this.
const LANE_SYNONYMS: [(Lane, &[&str]); 5] = [
    (Lane::Exp, &["exp", "offlane", "sidelane"]),
    (Lane::Jungler, &["jungle", "jungler", "jg"]),
    (Lane::Mid, &["mid", "midlane"]),
    (Lane::Gold, &["gold", "marksman", "adc"]),
    (Lane::Roam, &["roam", "roamer", "support"]),
];

impl Lane {
    pub const ALL: [Lane; 5] = [Lane::Exp, Lane::Jungler, Lane::Mid, Lane::Gold, Lane::Roam];

    /// Parse a lane identifier as used in payloads ("exp", "jungler", ...).
    /// Case-insensitive; also accepts "jungle" and "roamer".
    pub fn from_str_lane(s: &str) -> Option<Lane> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exp" => Some(Lane::Exp),
            "jungler" | "jungle" => Some(Lane::Jungler),
            "mid" => Some(Lane::Mid),
            "gold" => Some(Lane::Gold),
            "roam" | "roamer" => Some(Lane::Roam),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Lane::Exp => "exp",
            Lane::Jungler => "jungler",
            Lane::Mid => "mid",
            Lane::Gold => "gold",
            Lane::Roam => "roam",
        }
    }

    pub fn synonyms(&self) -> &'static [&'static str] {
        LANE_SYNONYMS
            .iter()
            .find(|(lane, _)| lane == self)
            .map(|(_, syns)| *syns)
            .unwrap_or(&[])
    }

    /// Whether a free-form roster role string plays this lane.
    ///
    /// Matching ignores case, spaces, dashes and underscores, so "Gold Laner",
    /// "gold-lane" and "GOLD" all match `Lane::Gold`.
    pub fn matches_role(&self, role: &str) -> bool {
        let role = normalize_role(role);
        if role.is_empty() {
            return false;
        }
        self.synonyms().iter().any(|syn| role.contains(syn))
    }

    /// Lanes a roster role string matches. Usually one; a flex role like
    /// "exp/jungle" yields several.
    pub fn lanes_for_role(role: &str) -> Vec<Lane> {
        Lane::ALL.into_iter().filter(|l| l.matches_role(role)).collect()
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

fn normalize_role(role: &str) -> String {
    role.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Lane resolution on a team's pick row
// ---------------------------------------------------------------------------

impl TeamDraft {
    /// Set the lane of a pick slot. The slot's player is left alone; it is
    /// resolved when a hero lands in the slot.
    pub fn assign_lane(&mut self, slot: usize, lane: Lane) -> Result<(), DraftError> {
        self.pick_mut(slot)?.lane = Some(lane);
        Ok(())
    }

    pub fn clear_lane(&mut self, slot: usize) -> Result<(), DraftError> {
        self.pick_mut(slot)?.lane = None;
        Ok(())
    }

    /// Exchange two pick slots as whole units. Lane, hero and player move
    /// together, so they never end up mismatched. Swapping a slot with
    /// itself is a no-op.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<(), DraftError> {
        for index in [a, b] {
            if index >= TEAM_SLOTS {
                return Err(DraftError::SlotOutOfRange(index));
            }
        }
        self.picks.swap(a, b);
        Ok(())
    }

    /// All five pick slots have a lane.
    pub fn lanes_complete(&self) -> bool {
        self.picks.iter().all(|p| p.lane.is_some())
    }

    /// No lane repeats among the assigned slots.
    pub fn lanes_valid(&self) -> bool {
        self.duplicate_lanes().is_empty()
    }

    /// Lanes assigned to more than one slot, in lane order.
    pub fn duplicate_lanes(&self) -> Vec<Lane> {
        Lane::ALL
            .into_iter()
            .filter(|&lane| self.picks.iter().filter(|p| p.lane == Some(lane)).count() > 1)
            .collect()
    }

    /// Lane of each pick slot.
    pub fn lanes(&self) -> [Option<Lane>; TEAM_SLOTS] {
        std::array::from_fn(|i| self.picks[i].lane)
    }
}
