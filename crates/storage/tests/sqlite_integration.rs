use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrips_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("topicsLearned").await.unwrap(), None);

    repo.set("topicsLearned", r#"["Rust"]"#).await.unwrap();
    assert_eq!(
        repo.get("topicsLearned").await.unwrap().as_deref(),
        Some(r#"["Rust"]"#)
    );
}

#[tokio::test]
async fn sqlite_set_overwrites_existing_key() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set("quizResults", "[]").await.unwrap();
    repo.set("quizResults", r#"[{"topic":"a"}]"#).await.unwrap();

    assert_eq!(
        repo.get("quizResults").await.unwrap().as_deref(),
        Some(r#"[{"topic":"a"}]"#)
    );
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_kv_store() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.set("k", "v").await.unwrap();
    assert_eq!(storage.kv.get("k").await.unwrap().as_deref(), Some("v"));
}
