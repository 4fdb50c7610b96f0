use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use super::drink::{Drink, Ingredient};

/// Errors from the drink store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored recipe is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Raw table row. Recipe stays serialized until the row leaves the store.
#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl DrinkRow {
    fn into_drink(self) -> Result<Drink, StoreError> {
        let recipe: Vec<Ingredient> = serde_json::from_str(&self.recipe)?;
        Ok(Drink {
            id: self.id,
            title: self.title,
            recipe,
        })
    }
}

/// Single-table persistence for the drinks menu. Owns the connection pool;
/// nothing outside the store touches the table.
#[derive(Clone)]
pub struct DrinkStore {
    pool: SqlitePool,
}

impl DrinkStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("Connected drink store: {}", url);
        Ok(Self { pool })
    }

    /// Create the drinks table if it does not exist. Runs at startup.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drinks (
                id     INTEGER PRIMARY KEY AUTOINCREMENT,
                title  TEXT NOT NULL UNIQUE,
                recipe TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All drinks in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Drink>, StoreError> {
        let rows: Vec<DrinkRow> =
            sqlx::query_as("SELECT id, title, recipe FROM drinks ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(DrinkRow::into_drink).collect()
    }

    pub async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".into()));
        }

        let recipe_json = serde_json::to_string(recipe)?;
        let row: DrinkRow = sqlx::query_as(
            "INSERT INTO drinks (title, recipe) VALUES (?, ?) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(&recipe_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Validation(format!("a drink titled '{}' already exists", title))
            } else {
                StoreError::Sqlx(e)
            }
        })?;

        row.into_drink()
    }

    pub async fn find(&self, id: i64) -> Result<Drink, StoreError> {
        let row: Option<DrinkRow> =
            sqlx::query_as("SELECT id, title, recipe FROM drinks WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or(StoreError::NotFound)?.into_drink()
    }

    /// Apply field changes to an existing drink. Title is the only mutable
    /// field; a None title leaves the record untouched.
    pub async fn update(&self, id: i64, title: Option<&str>) -> Result<Drink, StoreError> {
        let existing = self.find(id).await?;

        let Some(title) = title else {
            return Ok(existing);
        };
        if title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".into()));
        }

        sqlx::query("UPDATE drinks SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Validation(format!("a drink titled '{}' already exists", title))
                } else {
                    StoreError::Sqlx(e)
                }
            })?;

        self.find(id).await
    }

    /// Remove a drink, returning its id.
    pub async fn delete(&self, id: i64) -> Result<i64, StoreError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(id)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> DrinkStore {
        let store = DrinkStore::connect("sqlite::memory:", 1)
            .await
            .expect("connect in-memory store");
        store.migrate().await.expect("migrate");
        store
    }

    fn espresso_recipe() -> Vec<Ingredient> {
        vec![Ingredient {
            name: "espresso".to_string(),
            color: "brown".to_string(),
            parts: 1,
        }]
    }

    #[tokio::test]
    async fn create_then_list_round_trips() {
        let store = memory_store().await;
        let created = store.create("Espresso", &espresso_recipe()).await.unwrap();
        assert!(created.id > 0);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Espresso");
        assert_eq!(all[0].recipe, espresso_recipe());
    }

    #[tokio::test]
    async fn duplicate_title_is_validation_error() {
        let store = memory_store().await;
        store.create("Espresso", &espresso_recipe()).await.unwrap();

        let err = store
            .create("Espresso", &espresso_recipe())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let store = memory_store().await;
        let err = store.create("  ", &espresso_recipe()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let store = memory_store().await;
        assert!(matches!(store.find(999).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_changes_title_only() {
        let store = memory_store().await;
        let created = store.create("Expresso", &espresso_recipe()).await.unwrap();

        let updated = store.update(created.id, Some("Espresso")).await.unwrap();
        assert_eq!(updated.title, "Espresso");
        assert_eq!(updated.recipe, espresso_recipe());

        // None leaves the record untouched
        let untouched = store.update(created.id, None).await.unwrap();
        assert_eq!(untouched.title, "Espresso");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = memory_store().await;
        let err = store.update(42, Some("Latte")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_row_and_returns_id() {
        let store = memory_store().await;
        let created = store.create("Espresso", &espresso_recipe()).await.unwrap();

        assert_eq!(store.delete(created.id).await.unwrap(), created.id);
        assert!(matches!(
            store.delete(created.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
