use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use super::MIGRATION_001_DOCUMENTS;

/// A stored document: its key within the collection plus the raw JSON body.
#[derive(Debug, Clone)]
pub struct Document {
    pub key: String,
    pub body: String,
}

/// Per-collection document counts, as reported by [`DocumentStore::collection_stats`].
#[derive(Debug, Clone)]
pub struct CollectionStats {
    pub name: String,
    pub documents: i64,
}

/// Key/value document store over SQLite. Documents are JSON text bodies
/// namespaced by collection name; reads preserve insertion order so that
/// report grouping stays stable across runs.
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Create a store around an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_path: &str) -> Result<Self> {
        let pool = SqlitePool::connect(&format!("sqlite:{}", database_path))
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_DOCUMENTS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database at the given path (create + migrate).
    pub async fn init(database_path: &str) -> Result<Self> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", database_path))
            .await
            .context("Failed to create database")?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    // ========================
    // Document operations
    // ========================

    /// Insert or replace a document. Replacing keeps the document's original
    /// position in the collection.
    pub async fn put(&self, collection: &str, key: &str, body: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, doc_key, body)
            VALUES (?, ?, ?)
            ON CONFLICT (collection, doc_key) DO UPDATE SET body = excluded.body
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(body)
        .execute(&self.pool)
        .await
        .context("Failed to store document")?;
        Ok(())
    }

    /// Get a single document by exact key. Returns `None` when the key (or
    /// the whole collection) does not exist.
    pub async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT doc_key, body FROM documents
            WHERE collection = ? AND doc_key = ?
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        Ok(row.map(|row| Document {
            key: row.get("doc_key"),
            body: row.get("body"),
        }))
    }

    /// List every document in a collection, in insertion order. A collection
    /// that was never written to yields an empty list, not an error.
    pub async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT doc_key, body FROM documents
            WHERE collection = ?
            ORDER BY rowid
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list documents")?;

        Ok(rows
            .iter()
            .map(|row| Document {
                key: row.get("doc_key"),
                body: row.get("body"),
            })
            .collect())
    }

    /// Names of all collections whose name starts with `prefix`. An empty
    /// prefix lists every collection.
    pub async fn collection_names(&self, prefix: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT collection FROM documents
            WHERE collection LIKE ? || '%'
            ORDER BY collection
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list collections")?;

        Ok(rows.iter().map(|row| row.get("collection")).collect())
    }

    /// Per-collection document counts for every collection in the store.
    pub async fn collection_stats(&self) -> Result<Vec<CollectionStats>> {
        let rows = sqlx::query(
            r#"
            SELECT collection, COUNT(*) AS documents FROM documents
            GROUP BY collection
            ORDER BY collection
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to count documents")?;

        Ok(rows
            .iter()
            .map(|row| CollectionStats {
                name: row.get("collection"),
                documents: row.get("documents"),
            })
            .collect())
    }

    /// Number of documents in a single collection.
    pub async fn count(&self, collection: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS documents FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count documents")?;
        Ok(row.get("documents"))
    }

    /// Delete every document in a collection. Returns the number removed.
    pub async fn delete_collection(&self, collection: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(collection)
            .execute(&self.pool)
            .await
            .context("Failed to delete collection")?;
        Ok(result.rows_affected())
    }
}
