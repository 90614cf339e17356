// Hero availability: which heroes are still free to ban or pick.

use std::collections::BTreeSet;

use super::record::DraftRecord;
use super::step::Team;
use crate::hero::{HeroCatalog, HeroRef};

/// Names of every hero sitting in a ban or pick slot on either side.
/// Skipped and empty slots contribute nothing.
pub fn unavailable(record: &DraftRecord) -> BTreeSet<String> {
    Team::BOTH
        .iter()
        .flat_map(|&team| record.team(team).heroes())
        .map(|hero| hero.name.clone())
        .collect()
}

pub fn is_available(record: &DraftRecord, hero_name: &str) -> bool {
    !Team::BOTH
        .iter()
        .flat_map(|&team| record.team(team).heroes())
        .any(|hero| hero.name == hero_name)
}

/// Catalog heroes that can still be banned or picked, in catalog order.
pub fn available_heroes<'a>(catalog: &'a HeroCatalog, record: &DraftRecord) -> Vec<&'a HeroRef> {
    let taken = unavailable(record);
    catalog
        .heroes()
        .iter()
        .filter(|hero| !taken.contains(&hero.name))
        .collect()
}
