use crate::traits::RecordSource;
use offenseboard_core::{ConsoleError, Dataset, Driver, Offense, Result, User};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    data: Dataset,
    origin: Option<PathBuf>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("InMemoryStore")
            .field("origin", &inner.origin)
            .field("offenses", &inner.data.offenses.len())
            .field("users", &inner.data.users.len())
            .field("drivers", &inner.data.drivers.len())
            .finish()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::from_dataset(Dataset::default())
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(data: Dataset) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { data, origin: None })),
        }
    }

    pub fn sample() -> Self {
        Self::from_dataset(Dataset::sample())
    }

    /// Load a JSON fixture file (see [`Dataset`] for the layout).
    pub fn load_fixture(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::Source(format!("{}: {}", path.display(), e)))?;
        let data = Dataset::from_json(&raw)?;
        info!(
            path = %path.display(),
            offenses = data.offenses.len(),
            users = data.users.len(),
            drivers = data.drivers.len(),
            "fixture loaded"
        );
        let store = Self::from_dataset(data);
        store.inner.write().origin = Some(path.to_path_buf());
        Ok(store)
    }

    /// Swap the whole dataset, as a fresh fetch would.
    pub fn replace(&self, data: Dataset) {
        let mut inner = self.inner.write();
        debug!(offenses = data.offenses.len(), "dataset replaced");
        inner.data = data;
    }

    pub fn snapshot(&self) -> Dataset {
        self.inner.read().data.clone()
    }
}

#[async_trait::async_trait]
impl RecordSource for InMemoryStore {
    async fn offenses(&self) -> Result<Vec<Offense>> {
        Ok(self.inner.read().data.offenses.clone())
    }

    async fn users(&self) -> Result<Vec<User>> {
        Ok(self.inner.read().data.users.clone())
    }

    async fn drivers(&self) -> Result<Vec<Driver>> {
        Ok(self.inner.read().data.drivers.clone())
    }

    async fn offense(&self, id: &str) -> Result<Offense> {
        self.inner
            .read()
            .data
            .offenses
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound(id.to_string()))
    }

    fn describe(&self) -> String {
        match &self.inner.read().origin {
            Some(p) => format!("fixture {}", p.display()),
            None => "in-memory dataset".to_string(),
        }
    }
}
