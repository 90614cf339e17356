// mlbb-draft entry point.
//
//   mlbb-draft <script.toml>   replay a draft, validate, save, print payload
//   mlbb-draft list            list saved matches
//   mlbb-draft show <id>       print one saved match

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::info;

use mlbb_draft::app::{self, ScriptOutcome};
use mlbb_draft::catalog::ReferenceData;
use mlbb_draft::config;
use mlbb_draft::db::Database;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing()?;
    info!("mlbb-draft starting up");

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: home team {}", config.draft.home_team);

    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["list"] => {
            for m in app::list_matches(&db)? {
                let date = m
                    .played_on
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!(
                    "{:>4}  {date}  {} vs {}  winner: {}",
                    m.id, m.blue_team, m.red_team, m.winner
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        ["show", id] => {
            let id: i64 = id.parse().with_context(|| format!("bad match id `{id}`"))?;
            let stored = app::show_match(&db, id)?;
            let json = serde_json::json!({
                "id": stored.id,
                "match": stored.meta,
                "draft": stored.payload,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(ExitCode::SUCCESS)
        }
        [script] => {
            let mut data = ReferenceData::from_config(&config);
            match app::run_script(&config, &mut data, &db, Path::new(script))? {
                ScriptOutcome::Saved { id, payload } => {
                    eprintln!("saved as match {id}");
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                    Ok(ExitCode::SUCCESS)
                }
                ScriptOutcome::Invalid(errors) => {
                    eprintln!("draft is not valid:");
                    for e in &errors {
                        eprintln!("  - {e}");
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        _ => bail!("usage: mlbb-draft <script.toml> | list | show <id>"),
    }
}

/// Initialize tracing to log to `logs/mlbb-draft.log`; stdout carries the
/// payload.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("mlbb-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mlbb_draft=info,mlbb_draft_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
