use crate::common;
use docserve::db::{init::connect, DatabaseKind};
use std::matches;
use tempfile::tempdir;

#[actix_web::test]
async fn test_connect_when_sqlite_url_expect_migrated_sqlite_connection() {
    let dir = tempdir().unwrap();
    let actual = connect(&common::database_url(dir.path())).await.unwrap();
    assert!(matches!(actual.kind, DatabaseKind::Sqlite));
    assert!(dir.path().join("db.sqlite3").exists());

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'build_job'")
            .fetch_all(&actual.pool)
            .await
            .unwrap();
    assert_eq!(tables.len(), 1);
}

#[actix_web::test]
async fn test_connect_twice_expect_migrations_idempotent() {
    let dir = tempdir().unwrap();
    let url = common::database_url(dir.path());
    connect(&url).await.unwrap();
    let actual = connect(&url).await;
    assert!(actual.is_ok());
}

#[actix_web::test]
async fn test_connect_when_unsupported_url_expect_error() {
    let actual = connect("postgres://localhost/docserve").await.unwrap_err();
    let expected = "Unsupported database URL";
    assert!(
        actual.to_string().contains(expected),
        "\"{actual}\" doesn't contain {expected}"
    );
}

#[actix_web::test]
async fn test_connect_when_directory_missing_expect_error() {
    let dir = tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("missing").join("db.sqlite3").to_string_lossy()
    );
    let actual = connect(&url).await;
    assert!(actual.is_err());
}

#[actix_web::test]
async fn test_create_project_and_version_expect_inserted_ids() {
    use docserve::db::models::{project, version};
    use docserve::db::{DatabaseTransaction, Tx as _};

    let dir = tempdir().unwrap();
    let db = connect(&common::database_url(dir.path())).await.unwrap();
    let mut tx = DatabaseTransaction::begin(db.pool.clone()).await.unwrap();
    let first = project::TxManager::create(&mut tx, &common::project("pip", "github.com/pypa/pip"))
        .await
        .unwrap();
    let second = project::TxManager::create(&mut tx, &common::project("js", "github.com/x/js"))
        .await
        .unwrap();
    assert!(first.is_some());
    assert!(second > first);

    let pip = first.unwrap();
    let latest = version::TxManager::create(&mut tx, &common::Version::new(pip, "latest", "master"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let found = version::Manager::find_by_slug(&db, pip, "latest").await.unwrap();
    assert_eq!(found.map(|version| version.id), latest);
}
