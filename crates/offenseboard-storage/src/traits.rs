use offenseboard_core::{Driver, Offense, Result, User};

/// Where the console's record collections come from.
///
/// Implementations own whatever client or credentials they need; callers
/// hand a constructed source to the layer that queries it.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync + 'static {
    async fn offenses(&self) -> Result<Vec<Offense>>;
    async fn users(&self) -> Result<Vec<User>>;
    async fn drivers(&self) -> Result<Vec<Driver>>;

    async fn offense(&self, id: &str) -> Result<Offense> {
        self.offenses()
            .await?
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| offenseboard_core::ConsoleError::NotFound(id.to_string()))
    }

    fn describe(&self) -> String {
        "record source".to_string()
    }
}
