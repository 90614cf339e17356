// Command layer behind the binary: replay a script into the match store,
// list stored matches, show one.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use mlbb_draft_core::draft::{ValidationContext, ValidationError};
use mlbb_draft_core::payload::DraftPayload;
use mlbb_draft_core::DraftError;

use crate::cache::Clock;
use crate::catalog::ReferenceData;
use crate::config::Config;
use crate::db::{Database, MatchSummary, StoredMatch};
use crate::replay::{self, ReplayError};

/// Result of replaying one script.
#[derive(Debug)]
pub enum ScriptOutcome {
    Saved { id: i64, payload: DraftPayload },
    /// The draft ran but is not complete enough to save.
    Invalid(Vec<ValidationError>),
}

/// Replay `script_path`, validate against the configured home team, and
/// save the result when it passes.
pub fn run_script<C: Clock>(
    config: &Config,
    data: &mut ReferenceData<C>,
    db: &Database,
    script_path: &Path,
) -> Result<ScriptOutcome> {
    let script = replay::load_script(script_path)?;
    let catalog = data.catalog().context("failed to load hero catalog")?.clone();
    let rosters = data.rosters().context("failed to load rosters")?.clone();

    let session = match replay::replay(&script, catalog, &rosters) {
        Ok(session) => session,
        Err(ReplayError::Draft { index, action, source }) => {
            return Err(anyhow::Error::new(source))
                .with_context(|| format!("script action {index} (`{action}`) was rejected"));
        }
        Err(e) => return Err(e.into()),
    };

    let ctx = ValidationContext::from_meta(&session.record().meta, config.draft.home_team.clone());
    match session.finalize(&ctx) {
        Ok(payload) => {
            let id = db.save_match(&session.record().meta, &payload)?;
            info!(
                "saved match {id}: {} vs {}",
                session.record().meta.blue_team,
                session.record().meta.red_team
            );
            Ok(ScriptOutcome::Saved { id, payload })
        }
        Err(DraftError::ValidationFailed(errors)) => Ok(ScriptOutcome::Invalid(errors)),
        Err(e) => Err(e).context("failed to finalize draft"),
    }
}

pub fn list_matches(db: &Database) -> Result<Vec<MatchSummary>> {
    db.list_matches()
}

pub fn show_match(db: &Database, id: i64) -> Result<StoredMatch> {
    db.load_match(id)?
        .with_context(|| format!("no match with id {id}"))
}
