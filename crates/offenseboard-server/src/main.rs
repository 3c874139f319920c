use anyhow::Context;
use offenseboard_storage::{InMemoryStore, RecordSource};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod metrics;
mod routes;

use config::ServerConfig;
use routes::AppState;

/// Configured fixture when set, built-in sample data otherwise. A fixture
/// that cannot be loaded aborts startup.
fn open_source(config: &ServerConfig) -> anyhow::Result<Arc<dyn RecordSource>> {
    let source: Arc<dyn RecordSource> = match &config.fixture_path {
        Some(path) => Arc::new(
            InMemoryStore::load_fixture(path)
                .with_context(|| format!("FIXTURE_PATH {}", path.display()))?,
        ),
        None => Arc::new(InMemoryStore::sample()),
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let source = open_source(&config)?;
    info!("serving records from {}", source.describe());

    let app = routes::router(AppState { source });

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    info!("http listening on {}", config.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use offenseboard_core::Dataset;
    use std::path::PathBuf;

    fn config(fixture_path: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            http_addr: "127.0.0.1:0".parse().unwrap(),
            fixture_path,
        }
    }

    #[tokio::test]
    async fn sample_data_when_no_fixture_configured() {
        let source = open_source(&config(None)).unwrap();
        assert_eq!(source.describe(), "in-memory dataset");
        assert_eq!(source.offenses().await.unwrap().len(), 5);
    }

    #[test]
    fn unreadable_fixture_aborts_startup() {
        let err = match open_source(&config(Some(PathBuf::from("/missing/typo.json")))) {
            Ok(_) => panic!("missing fixture must not fall back to another dataset"),
            Err(e) => e,
        };
        assert!(err.to_string().contains("FIXTURE_PATH /missing/typo.json"));
    }

    #[tokio::test]
    async fn configured_fixture_is_served_as_is() {
        let dir = std::env::temp_dir().join(format!("offenseboard-server-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(&path, serde_json::to_vec(&Dataset::default()).unwrap()).unwrap();

        let source = open_source(&config(Some(path))).unwrap();
        assert!(source.offenses().await.unwrap().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
