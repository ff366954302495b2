//! PostgreSQL implementation of FoodJournalRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use buddy::{DomainError, FoodEntry, FoodJournalRepository};

use super::map_sqlx;

pub struct PgFoodJournalRepository {
    pool: PgPool,
}

impl PgFoodJournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FoodEntryRow {
    id: Uuid,
    buddy_id: Uuid,
    name: String,
    image_url: Option<String>,
    confidence: f32,
    is_healthy: bool,
    labels: Vec<String>,
    hp_gain: i32,
    eaten_at: DateTime<Utc>,
}

impl From<FoodEntryRow> for FoodEntry {
    fn from(row: FoodEntryRow) -> Self {
        Self {
            id: row.id,
            buddy_id: row.buddy_id,
            name: row.name,
            image_url: row.image_url,
            confidence: row.confidence,
            is_healthy: row.is_healthy,
            labels: row.labels,
            hp_gain: row.hp_gain,
            eaten_at: row.eaten_at,
        }
    }
}

#[async_trait]
impl FoodJournalRepository for PgFoodJournalRepository {
    async fn add(&self, entry: &FoodEntry) -> Result<FoodEntry, DomainError> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            INSERT INTO food_entries (id, buddy_id, name, image_url, confidence, is_healthy, labels, hp_gain, eaten_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.buddy_id)
        .bind(&entry.name)
        .bind(&entry.image_url)
        .bind(entry.confidence)
        .bind(entry.is_healthy)
        .bind(&entry.labels)
        .bind(entry.hp_gain)
        .bind(entry.eaten_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.into())
    }

    async fn list(&self, buddy_id: Uuid, limit: usize) -> Result<Vec<FoodEntry>, DomainError> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            "SELECT * FROM food_entries WHERE buddy_id = $1 ORDER BY eaten_at DESC LIMIT $2",
        )
        .bind(buddy_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn clear(&self, buddy_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM food_entries WHERE buddy_id = $1")
            .bind(buddy_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() as usize)
    }
}
