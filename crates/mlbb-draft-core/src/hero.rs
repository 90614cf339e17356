// Hero references and the read-only catalog snapshot a session drafts from.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Class tag carried by every hero in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroRole {
    Assassin,
    Fighter,
    Mage,
    Marksman,
    Support,
    Tank,
}

impl HeroRole {
    /// Parse a role string, case-insensitive. Accepts the common "MM"
    /// shorthand for marksman.
    pub fn from_str_role(s: &str) -> Option<HeroRole> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assassin" => Some(HeroRole::Assassin),
            "fighter" => Some(HeroRole::Fighter),
            "mage" => Some(HeroRole::Mage),
            "marksman" | "mm" => Some(HeroRole::Marksman),
            "support" => Some(HeroRole::Support),
            "tank" => Some(HeroRole::Tank),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            HeroRole::Assassin => "Assassin",
            HeroRole::Fighter => "Fighter",
            HeroRole::Mage => "Mage",
            HeroRole::Marksman => "Marksman",
            HeroRole::Support => "Support",
            HeroRole::Tank => "Tank",
        }
    }
}

impl fmt::Display for HeroRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// A selectable hero. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeroRef {
    pub name: String,
    pub role: HeroRole,
    /// Image file name or URL, passed through untouched.
    #[serde(default)]
    pub image_ref: String,
}

impl HeroRef {
    pub fn new(name: impl Into<String>, role: HeroRole, image_ref: impl Into<String>) -> Self {
        HeroRef {
            name: name.into(),
            role,
            image_ref: image_ref.into(),
        }
    }
}

/// Snapshot of the hero list taken when a session is created.
///
/// Heroes keep their catalog order; lookups go through a name index.
#[derive(Debug, Clone, Default)]
pub struct HeroCatalog {
    heroes: Vec<HeroRef>,
    index: HashMap<String, usize>,
}

impl HeroCatalog {
    /// Build a catalog. A repeated name keeps its first occurrence.
    pub fn new(heroes: Vec<HeroRef>) -> Self {
        let mut catalog = HeroCatalog::default();
        for hero in heroes {
            if catalog.index.contains_key(&hero.name) {
                continue;
            }
            catalog.index.insert(hero.name.clone(), catalog.heroes.len());
            catalog.heroes.push(hero);
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&HeroRef> {
        self.index.get(name).map(|&i| &self.heroes[i])
    }

    pub fn heroes(&self) -> &[HeroRef] {
        &self.heroes
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(HeroRole::from_str_role("Tank"), Some(HeroRole::Tank));
        assert_eq!(HeroRole::from_str_role(" mage "), Some(HeroRole::Mage));
        assert_eq!(HeroRole::from_str_role("MM"), Some(HeroRole::Marksman));
        assert_eq!(HeroRole::from_str_role("jungler"), None);
    }

    #[test]
    fn catalog_lookup_by_name() {
        let catalog = HeroCatalog::new(vec![
            HeroRef::new("Tigreal", HeroRole::Tank, "tigreal.png"),
            HeroRef::new("Layla", HeroRole::Marksman, "layla.png"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Layla").map(|h| h.role), Some(HeroRole::Marksman));
        assert!(catalog.get("layla").is_none());
    }

    #[test]
    fn catalog_keeps_first_duplicate() {
        let catalog = HeroCatalog::new(vec![
            HeroRef::new("Layla", HeroRole::Marksman, "a.png"),
            HeroRef::new("Layla", HeroRole::Mage, "b.png"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Layla").unwrap().image_ref, "a.png");
    }
}
