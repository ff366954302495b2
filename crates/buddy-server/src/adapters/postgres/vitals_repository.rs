//! PostgreSQL implementation of VitalsRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;
use uuid::Uuid;

use buddy::{BuddyVitals, DomainError, VitalsRepository};

use super::map_sqlx;

/// PostgreSQL implementation of VitalsRepository
pub struct PgVitalsRepository {
    pool: PgPool,
}

impl PgVitalsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct BuddyRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    image_url: Option<String>,
    timezone: String,
    hp: i32,
    energy: i32,
    steps: i32,
    is_sleeping: bool,
    sleep_start_time: Option<DateTime<Utc>>,
    total_sleep_hours: f64,
    last_sleep_date: Option<NaiveDate>,
    water_consumed: i32,
    last_updated: DateTime<Utc>,
    last_fed: Option<DateTime<Utc>>,
    last_drank: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BuddyRow> for BuddyVitals {
    type Error = DomainError;

    fn try_from(row: BuddyRow) -> Result<Self, Self::Error> {
        let timezone: Tz = row.timezone.parse().map_err(|_| {
            DomainError::Repository(format!(
                "buddy {} has unknown timezone {:?}",
                row.id, row.timezone
            ))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            image_url: row.image_url,
            timezone,
            hp: row.hp,
            energy: row.energy,
            steps: row.steps,
            is_sleeping: row.is_sleeping,
            sleep_start_time: row.sleep_start_time,
            total_sleep_hours: row.total_sleep_hours,
            last_sleep_date: row.last_sleep_date,
            water_consumed: row.water_consumed,
            last_updated: row.last_updated,
            last_fed: row.last_fed,
            last_drank: row.last_drank,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl VitalsRepository for PgVitalsRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuddyVitals>, DomainError> {
        let row = sqlx::query_as::<_, BuddyRow>("SELECT * FROM buddies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.map(BuddyVitals::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<BuddyVitals>, DomainError> {
        let row = sqlx::query_as::<_, BuddyRow>(
            "SELECT * FROM buddies WHERE user_id = $1 ORDER BY last_updated DESC, created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(BuddyVitals::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<BuddyVitals>, DomainError> {
        let rows = sqlx::query_as::<_, BuddyRow>("SELECT * FROM buddies ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(BuddyVitals::try_from).collect()
    }

    async fn save(&self, vitals: &BuddyVitals) -> Result<BuddyVitals, DomainError> {
        let row = sqlx::query_as::<_, BuddyRow>(
            r#"
            INSERT INTO buddies (
                id, user_id, name, image_url, timezone, hp, energy, steps,
                is_sleeping, sleep_start_time, total_sleep_hours, last_sleep_date,
                water_consumed, last_updated, last_fed, last_drank, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                image_url = EXCLUDED.image_url,
                timezone = EXCLUDED.timezone,
                hp = EXCLUDED.hp,
                energy = EXCLUDED.energy,
                steps = EXCLUDED.steps,
                is_sleeping = EXCLUDED.is_sleeping,
                sleep_start_time = EXCLUDED.sleep_start_time,
                total_sleep_hours = EXCLUDED.total_sleep_hours,
                last_sleep_date = EXCLUDED.last_sleep_date,
                water_consumed = EXCLUDED.water_consumed,
                last_updated = EXCLUDED.last_updated,
                last_fed = EXCLUDED.last_fed,
                last_drank = EXCLUDED.last_drank
            RETURNING *
            "#,
        )
        .bind(vitals.id)
        .bind(vitals.user_id)
        .bind(&vitals.name)
        .bind(&vitals.image_url)
        .bind(vitals.timezone.name())
        .bind(vitals.hp)
        .bind(vitals.energy)
        .bind(vitals.steps)
        .bind(vitals.is_sleeping)
        .bind(vitals.sleep_start_time)
        .bind(vitals.total_sleep_hours)
        .bind(vitals.last_sleep_date)
        .bind(vitals.water_consumed)
        .bind(vitals.last_updated)
        .bind(vitals.last_fed)
        .bind(vitals.last_drank)
        .bind(vitals.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        BuddyVitals::try_from(row)
    }

    async fn remove_duplicates(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM buddies
            WHERE user_id = $1
              AND id <> (
                SELECT id FROM buddies
                WHERE user_id = $1
                ORDER BY last_updated DESC, created_at DESC
                LIMIT 1
              )
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() as usize)
    }
}
