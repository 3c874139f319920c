use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use offenseboard_core::{
    media_type_for_extension, Dataset, FilterSpec, Offense, QueryEngine, Record, SelectionOrigin,
    UploadCandidate, UploadSlot,
};
use offenseboard_storage::InMemoryStore;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "offenseboard")]
#[command(about = "Offense console admin CLI", long_about = None)]
struct Cli {
    /// Log fixture loading and query details to stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Offenses,
    Users,
    Drivers,
}

#[derive(Subcommand)]
enum Cmd {
    /// Filter and search one entity's records
    Query {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long = "type")]
        offense_type: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
        /// JSON dataset; the built-in sample when omitted
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Print statistics over the full collection
    Stats {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Check a local file against the evidence upload rules
    ValidateUpload {
        path: PathBuf,
        #[arg(long)]
        media_type: Option<String>,
    },
}

fn load(fixture: Option<PathBuf>) -> Result<Dataset> {
    match fixture {
        Some(path) => Ok(InMemoryStore::load_fixture(&path)
            .with_context(|| format!("loading {}", path.display()))?
            .snapshot()),
        None => Ok(Dataset::sample()),
    }
}

fn build_spec(
    entity: Entity,
    pairs: [(&str, Option<String>); 4],
    search: String,
) -> Result<FilterSpec> {
    let keys = match entity {
        Entity::Offenses => Offense::FILTER_KEYS,
        Entity::Users => offenseboard_core::User::FILTER_KEYS,
        Entity::Drivers => offenseboard_core::Driver::FILTER_KEYS,
    };
    let mut spec = offenseboard_core::reset_filters(keys).with_search(search);
    for (key, value) in pairs {
        if let Some(v) = value {
            if !keys.contains(&key) {
                bail!("--{key} is not a filter for this entity (accepted: {})", keys.join(", "));
            }
            spec.set(key, v);
        }
    }
    Ok(spec)
}

fn query<R: Record + serde::Serialize>(records: &[R], spec: &FilterSpec) -> Result<Value> {
    Ok(serde_json::to_value(QueryEngine::<R>::new().run(records, spec))?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let report = match cli.cmd {
        Cmd::Query {
            entity,
            status,
            severity,
            offense_type,
            role,
            search,
            fixture,
        } => {
            let spec = build_spec(
                entity,
                [
                    ("status", status),
                    ("severity", severity),
                    ("type", offense_type),
                    ("role", role),
                ],
                search,
            )?;
            tracing::debug!(?spec, "running query");
            let data = load(fixture)?;
            match entity {
                Entity::Offenses => query(&data.offenses, &spec)?,
                Entity::Users => query(&data.users, &spec)?,
                Entity::Drivers => query(&data.drivers, &spec)?,
            }
        }
        Cmd::Stats { entity, fixture } => {
            let data = load(fixture)?;
            match entity {
                Entity::Offenses => {
                    let by_status = QueryEngine::<Offense>::new();
                    let by_severity =
                        by_status.clone().with_predicates(Offense::severity_statistics());
                    json!({
                        "status": by_status.statistics(&data.offenses),
                        "severity": by_severity.statistics(&data.offenses),
                    })
                }
                Entity::Users => serde_json::to_value(QueryEngine::new().statistics(&data.users))?,
                Entity::Drivers => {
                    serde_json::to_value(QueryEngine::new().statistics(&data.drivers))?
                }
            }
        }
        Cmd::ValidateUpload { path, media_type } => {
            let meta = std::fs::metadata(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let media_type = media_type
                .or_else(|| media_type_for_extension(&file_name).map(str::to_string))
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let mut slot = UploadSlot::new();
            match slot.select(
                UploadCandidate::new(file_name, media_type, meta.len()),
                SelectionOrigin::Browse,
            ) {
                Ok(staged) => json!({ "accepted": true, "staged": staged }),
                Err(e) => json!({
                    "accepted": false,
                    "reason": e.reason(),
                    "error": e.to_string(),
                }),
            }
        }
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn spec_from_flags() {
        let spec = build_spec(
            Entity::Offenses,
            [
                ("status", Some("Paid".into())),
                ("severity", None),
                ("type", None),
                ("role", None),
            ],
            "sarah".into(),
        )
        .unwrap();
        let expected = FilterSpec::reset::<Offense>()
            .with("status", "Paid")
            .with_search("sarah");
        assert_eq!(spec, expected);
    }

    #[test]
    fn foreign_flag_is_rejected() {
        let err = build_spec(
            Entity::Drivers,
            [("status", None), ("severity", None), ("type", None), ("role", Some("Admin".into()))],
            String::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--role"));
    }

    #[test]
    fn query_output_shape() {
        let data = Dataset::sample();
        let spec = FilterSpec::default().with_search("sarah");
        let out = query(&data.users, &spec).unwrap();
        assert_eq!(out["matched"], 1);
        assert_eq!(out["statistics"]["total"], 5);
    }
}
