use offenseboard_core::{ConsoleError, Dataset};
use offenseboard_storage::{InMemoryStore, RecordSource};

#[tokio::test]
async fn sample_store_serves_collections() {
    let store = InMemoryStore::sample();
    assert_eq!(store.offenses().await.unwrap().len(), 5);
    assert_eq!(store.users().await.unwrap().len(), 5);
    assert_eq!(store.drivers().await.unwrap().len(), 5);
    assert_eq!(store.describe(), "in-memory dataset");
}

#[tokio::test]
async fn offense_lookup_by_id() {
    let store = InMemoryStore::sample();
    let o = store.offense("OFF-2023-0453").await.unwrap();
    assert_eq!(o.driver.name, "Sarah Johnson");
    let err = store.offense("OFF-0000").await.unwrap_err();
    assert!(matches!(err, ConsoleError::NotFound(id) if id == "OFF-0000"));
}

#[tokio::test]
async fn replace_swaps_dataset() {
    let store = InMemoryStore::sample();
    let reader = store.clone();
    store.replace(Dataset::default());
    assert!(reader.offenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn fixture_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("offenseboard-fixture-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("dataset.json");
    std::fs::write(&path, serde_json::to_vec(&Dataset::sample()).unwrap()).unwrap();

    let store = InMemoryStore::load_fixture(&path).unwrap();
    assert_eq!(store.snapshot(), Dataset::sample());
    assert!(store.describe().starts_with("fixture "));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_fixture_is_a_source_error() {
    let err = InMemoryStore::load_fixture("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, ConsoleError::Source(_)));
}

#[test]
fn store_debug_reports_collection_sizes() {
    let rendered = format!("{:?}", InMemoryStore::sample());
    assert!(rendered.starts_with("InMemoryStore"));
    assert!(rendered.contains("offenses: 5"));
    assert!(rendered.contains("origin: None"));
}
