use crate::db::{DatabaseConnection, DatabaseKind, Db as _};

/// Connects to the database at `db_url` and applies migrations.
/// Only `SQLite` URLs are supported for now.
///
/// # Errors
/// Errors if connection to database fails.
/// Connections can fail if the database file can't be opened, or if the database URL is invalid.
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let connection = DatabaseConnection::connect(db_url).await?;
    tracing::info!("Connected to database");
    match connection.kind {
        DatabaseKind::Sqlite => {
            sqlx::migrate!("./migrations/sqlite")
                .run(&connection.pool)
                .await?;
        }
    }
    Ok(connection)
}
