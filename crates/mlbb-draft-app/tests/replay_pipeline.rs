// End-to-end: config + bundled data + script replay + SQLite store.

use std::fs;
use std::path::PathBuf;

use mlbb_draft::app::{self, ScriptOutcome};
use mlbb_draft::catalog::ReferenceData;
use mlbb_draft::config::{Config, DataPaths, DraftConfig};
use mlbb_draft::db::Database;
use mlbb_draft_core::draft::{Team, ValidationError};

// ===========================================================================
// Test helpers
// ===========================================================================

fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn test_config(home_team: &str) -> Config {
    let dir = crate_dir();
    Config {
        draft: DraftConfig {
            home_team: home_team.to_string(),
            turn_seconds: 30,
        },
        data_paths: DataPaths {
            heroes: dir.join("data/heroes.csv").display().to_string(),
            rosters: dir.join("data/rosters.toml").display().to_string(),
            catalog_ttl_secs: 3600,
        },
        db_path: ":memory:".to_string(),
    }
}

fn sample_script() -> PathBuf {
    crate_dir().join("scripts/onic-vs-rrq.toml")
}

/// Copy the sample script with one substitution applied.
fn variant_script(name: &str, from: &str, to: &str) -> PathBuf {
    let text = fs::read_to_string(sample_script()).unwrap();
    assert!(text.contains(from), "sample script no longer contains `{from}`");
    let dir = std::env::temp_dir().join("mlbb_replay_pipeline");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, text.replacen(from, to, 1)).unwrap();
    path
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn sample_script_is_saved_and_listed() {
    let config = test_config("ONIC");
    let mut data = ReferenceData::from_config(&config);
    let db = Database::open(&config.db_path).unwrap();

    let outcome = app::run_script(&config, &mut data, &db, &sample_script()).unwrap();
    let (id, payload) = match outcome {
        ScriptOutcome::Saved { id, payload } => (id, payload),
        ScriptOutcome::Invalid(errors) => panic!("sample script should validate: {errors:?}"),
    };

    assert_eq!(
        payload.blue.banning_phase1,
        vec![Some("Ling".to_string()), Some("Joy".to_string()), None]
    );
    assert_eq!(payload.blue.banning_phase2, vec![Some("Claude".to_string()), None]);
    assert_eq!(payload.blue.picks1[0].hero.as_deref(), Some("Khufra"));
    assert_eq!(payload.blue.picks1[0].player.as_deref(), Some("Kiboy"));
    assert_eq!(payload.blue.picks2[1].player.as_deref(), Some("Butss"));
    assert_eq!(payload.red.picks1[0].hero.as_deref(), Some("Yu Zhong"));
    assert_eq!(payload.red.picks1[0].player.as_deref(), Some("Dyrennn"));

    let listed = app::list_matches(&db).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].winner, "ONIC");

    let stored = app::show_match(&db, id).unwrap();
    assert_eq!(stored.payload, payload);
    assert_eq!(stored.meta.blue_objectives.towers, 9);
}

#[test]
fn unknown_winner_is_reported_not_saved() {
    let config = test_config("ONIC");
    let mut data = ReferenceData::from_config(&config);
    let db = Database::open(&config.db_path).unwrap();
    let script = variant_script("bad_winner.toml", "winner = \"ONIC\"", "winner = \"Blacklist\"");

    match app::run_script(&config, &mut data, &db, &script).unwrap() {
        ScriptOutcome::Invalid(errors) => assert_eq!(
            errors,
            vec![ValidationError::WinnerNotParticipant {
                winner: "Blacklist".into()
            }]
        ),
        ScriptOutcome::Saved { .. } => panic!("invalid draft was saved"),
    }
    assert!(app::list_matches(&db).unwrap().is_empty());
}

#[test]
fn home_team_on_red_requires_red_players() {
    // RRQ's roster covers every lane, so making RRQ home changes nothing.
    let config = test_config("rrq");
    let mut data = ReferenceData::from_config(&config);
    let db = Database::open(&config.db_path).unwrap();
    let outcome = app::run_script(&config, &mut data, &db, &sample_script()).unwrap();
    assert!(matches!(outcome, ScriptOutcome::Saved { .. }));

    // An unregistered red side leaves every red pick without a player.
    let script =
        variant_script("unknown_red.toml", "red_team = \"RRQ\"", "red_team = \"Blacklist\"");
    let config = test_config("Blacklist");
    match app::run_script(&config, &mut data, &db, &script).unwrap() {
        ScriptOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 5, "{errors:?}");
            assert!(errors.contains(&ValidationError::PickMissingPlayer {
                team: Team::Red,
                slot: 0
            }));
        }
        ScriptOutcome::Saved { .. } => panic!("draft without home players was saved"),
    }
}

#[test]
fn rejected_action_names_the_step() {
    let config = test_config("ONIC");
    let mut data = ReferenceData::from_config(&config);
    let db = Database::open(&config.db_path).unwrap();
    // Banning Ling twice.
    let script = variant_script("double_ban.toml", "\"ban Fanny\"", "\"ban Ling\"");

    let err = app::run_script(&config, &mut data, &db, &script).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("script action 1"), "{msg}");
    assert!(msg.contains("already banned or picked"), "{msg}");
}

#[test]
fn missing_choice_leaves_draft_pending() {
    let config = test_config("ONIC");
    let mut data = ReferenceData::from_config(&config);
    let db = Database::open(&config.db_path).unwrap();
    let script = variant_script("no_choice.toml", "\"choose Kiboy\",", "");

    let err = app::run_script(&config, &mut data, &db, &script).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("waiting for a player choice"), "{msg}");
}
