// Hero catalog (CSV) and team roster (TOML) loaders.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use mlbb_draft_core::draft::{RosterPlayer, TeamRoster};
use mlbb_draft_core::hero::{HeroCatalog, HeroRef, HeroRole};

use crate::cache::{Clock, SystemClock, TimedCache};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("failed to parse roster file {path}: {source}")]
    Roster {
        path: String,
        source: toml::de::Error,
    },
}

// ---------------------------------------------------------------------------
// Raw file shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawHero {
    name: String,
    role: String,
    #[serde(default)]
    image: String,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    team: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
    #[serde(default)]
    players: Vec<RosterPlayer>,
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

/// Every team's roster, keyed by team name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterBook {
    teams: HashMap<String, TeamRoster>,
}

impl RosterBook {
    /// Roster for `team`, matched case-insensitively after trimming. Teams
    /// with no entry get an empty roster.
    pub fn roster_for(&self, team: &str) -> TeamRoster {
        let wanted = team.trim();
        self.teams
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
            .map(|(_, roster)| roster.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_heroes_from_reader<R: Read>(rdr: R) -> Result<HeroCatalog, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut heroes = Vec::new();
    for result in reader.deserialize::<RawHero>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim();
                if name.is_empty() {
                    warn!("skipping hero row with empty name");
                    continue;
                }
                let Some(role) = HeroRole::from_str_role(&raw.role) else {
                    warn!("skipping hero '{}': unknown role '{}'", name, raw.role);
                    continue;
                };
                heroes.push(HeroRef::new(name, role, raw.image.trim()));
            }
            Err(e) => {
                warn!("skipping malformed hero row: {}", e);
            }
        }
    }
    let total = heroes.len();
    let catalog = HeroCatalog::new(heroes);
    if catalog.len() < total {
        warn!("dropped {} duplicate hero rows", total - catalog.len());
    }
    Ok(catalog)
}

fn parse_rosters(text: &str) -> Result<RosterBook, toml::de::Error> {
    let file: RosterFile = toml::from_str(text)?;
    let mut teams = HashMap::new();
    for raw in file.team {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            warn!("skipping roster with empty team name");
            continue;
        }
        if teams.contains_key(&name) {
            warn!("duplicate roster for '{}', keeping the first", name);
            continue;
        }
        teams.insert(name, TeamRoster::new(raw.players));
    }
    Ok(RosterBook { teams })
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

pub fn load_hero_catalog(path: &Path) -> Result<HeroCatalog, CatalogError> {
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let catalog = load_heroes_from_reader(file).map_err(|e| CatalogError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("loaded {} heroes from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn load_rosters(path: &Path) -> Result<RosterBook, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let book = parse_rosters(&text).map_err(|e| CatalogError::Roster {
        path: path.display().to_string(),
        source: e,
    })?;
    info!("loaded {} team rosters from {}", book.len(), path.display());
    Ok(book)
}

// ---------------------------------------------------------------------------
// Cached reference data
// ---------------------------------------------------------------------------

/// Hero catalog and rosters behind a shared TTL. Each `DraftSession` takes
/// its own snapshot, so a reload only affects sessions created afterwards.
pub struct ReferenceData<C: Clock = SystemClock> {
    heroes_path: PathBuf,
    rosters_path: PathBuf,
    heroes: TimedCache<HeroCatalog, C>,
    rosters: TimedCache<RosterBook, C>,
}

impl ReferenceData<SystemClock> {
    pub fn from_config(config: &Config) -> Self {
        let ttl = config.data_paths.catalog_ttl();
        ReferenceData::with_caches(
            &config.data_paths.heroes,
            &config.data_paths.rosters,
            TimedCache::new(ttl),
            TimedCache::new(ttl),
        )
    }
}

impl<C: Clock> ReferenceData<C> {
    pub fn with_caches(
        heroes_path: impl Into<PathBuf>,
        rosters_path: impl Into<PathBuf>,
        heroes: TimedCache<HeroCatalog, C>,
        rosters: TimedCache<RosterBook, C>,
    ) -> Self {
        ReferenceData {
            heroes_path: heroes_path.into(),
            rosters_path: rosters_path.into(),
            heroes,
            rosters,
        }
    }

    pub fn catalog(&mut self) -> Result<&HeroCatalog, CatalogError> {
        let path = &self.heroes_path;
        self.heroes.get_or_load(|| load_hero_catalog(path))
    }

    pub fn rosters(&mut self) -> Result<&RosterBook, CatalogError> {
        let path = &self.rosters_path;
        self.rosters.get_or_load(|| load_rosters(path))
    }

    /// Force both sources to reload on next access.
    pub fn invalidate(&mut self) {
        self.heroes.invalidate();
        self.rosters.invalidate();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
