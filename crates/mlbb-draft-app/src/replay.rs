// Draft scripts: a recorded ban/pick sequence replayed through a session.
//
// A script is a TOML file:
//
//     actions = ["ban Ling", "skip", "pick Joy", "choose Kairi", ...]
//
//     [match]
//     played_on = "2024-03-09"
//     blue_team = "ONIC"
//     red_team = "RRQ"
//     winner = "ONIC"
//
//     [lanes]
//     blue = ["exp", "jungler", "mid", "gold", "roam"]
//     red = ["roam", "gold", "mid", "jungler", "exp"]

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use mlbb_draft_core::draft::{BanChoice, DraftSession, Lane, MatchMeta, SlotOutcome, Team};
use mlbb_draft_core::hero::HeroCatalog;
use mlbb_draft_core::DraftError;

use crate::catalog::RosterBook;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse script {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("action {index}: cannot understand `{text}`")]
    BadAction { index: usize, text: String },

    #[error("{team} lanes: expected 5 entries, got {len}")]
    LaneCount { team: Team, len: usize },

    #[error("{team} lanes: unknown lane `{value}`")]
    UnknownLane { team: Team, value: String },

    #[error("action {index} (`{action}`): {source}")]
    Draft {
        index: usize,
        action: ScriptAction,
        source: DraftError,
    },

    #[error(transparent)]
    Setup(#[from] DraftError),
}

// ---------------------------------------------------------------------------
// Script shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DraftScript {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(rename = "match")]
    pub meta: MatchMeta,
    pub lanes: ScriptLanes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptLanes {
    pub blue: Vec<String>,
    pub red: Vec<String>,
}

impl ScriptLanes {
    fn for_team(&self, team: Team) -> &[String] {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }
}

/// One line of the `actions` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAction {
    Ban(String),
    Pick(String),
    /// Let the current turn lapse.
    Skip,
    /// Answer a pending player decision.
    Choose(String),
    Undo,
}

impl ScriptAction {
    pub fn parse(text: &str) -> Option<ScriptAction> {
        let text = text.trim();
        let (verb, rest) = match text.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (text, ""),
        };
        match (verb.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("ban", false) => Some(ScriptAction::Ban(rest.to_string())),
            ("pick", false) => Some(ScriptAction::Pick(rest.to_string())),
            ("choose", false) => Some(ScriptAction::Choose(rest.to_string())),
            ("skip", true) => Some(ScriptAction::Skip),
            ("undo", true) => Some(ScriptAction::Undo),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptAction::Ban(hero) => write!(f, "ban {hero}"),
            ScriptAction::Pick(hero) => write!(f, "pick {hero}"),
            ScriptAction::Skip => f.write_str("skip"),
            ScriptAction::Choose(player) => write!(f, "choose {player}"),
            ScriptAction::Undo => f.write_str("undo"),
        }
    }
}

pub fn parse_script(text: &str, path: &str) -> Result<DraftScript, ReplayError> {
    toml::from_str(text).map_err(|e| ReplayError::Parse {
        path: path.to_string(),
        source: e,
    })
}

pub fn load_script(path: &Path) -> Result<DraftScript, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|e| ReplayError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_script(&text, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Build a session from the script's match and lanes, start it, and run
/// every action in order. The returned session may still be mid-draft if
/// the script stops early.
pub fn replay(
    script: &DraftScript,
    catalog: HeroCatalog,
    rosters: &RosterBook,
) -> Result<DraftSession, ReplayError> {
    let actions = script
        .actions
        .iter()
        .enumerate()
        .map(|(index, text)| {
            ScriptAction::parse(text).ok_or_else(|| ReplayError::BadAction {
                index,
                text: text.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let meta = script.meta.clone();
    let mut session = DraftSession::new(
        catalog,
        rosters.roster_for(&meta.blue_team),
        rosters.roster_for(&meta.red_team),
        meta,
    );

    for team in Team::BOTH {
        let lanes = script.lanes.for_team(team);
        if lanes.len() != 5 {
            return Err(ReplayError::LaneCount {
                team,
                len: lanes.len(),
            });
        }
        for (slot, value) in lanes.iter().enumerate() {
            let lane = Lane::from_str_lane(value).ok_or_else(|| ReplayError::UnknownLane {
                team,
                value: value.clone(),
            })?;
            session.assign_lane(team, slot, lane)?;
        }
    }
    session.start()?;

    for (index, action) in actions.into_iter().enumerate() {
        apply(&mut session, &action).map_err(|source| ReplayError::Draft {
            index,
            action,
            source,
        })?;
    }

    info!(
        "replayed {} actions, finished={}",
        script.actions.len(),
        session.is_finished()
    );
    Ok(session)
}

fn apply(session: &mut DraftSession, action: &ScriptAction) -> Result<(), DraftError> {
    match action {
        ScriptAction::Ban(hero) => session.submit_ban(BanChoice::hero(hero.as_str())),
        ScriptAction::Pick(hero) => {
            if let SlotOutcome::DecisionPending {
                team,
                slot,
                candidates,
            } = session.submit_pick(hero)?
            {
                debug!(
                    "{team} pick {slot} waits on a choice between {:?}",
                    candidates.iter().map(|c| &c.player_name).collect::<Vec<_>>()
                );
            }
            Ok(())
        }
        ScriptAction::Choose(player) => session.resolve_pending(player).map(|_| ()),
        ScriptAction::Skip => session.skip_turn().map(|_| ()),
        ScriptAction::Undo => session.undo().map(|_| ()),
    }
}
