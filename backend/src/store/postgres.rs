//! PostgreSQL donor store
//!
//! Donors live in one table as JSONB documents keyed by UUID. Partial
//! updates merge into the document with `||`, so keys that are absent from
//! the patch keep their stored value.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    DeleteResult, Donor, DonorDetails, DonorId, DonorPatch, DonorQuery, NewDonor, UpdateResult,
};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

use super::{DonorStore, StoreResult};
use crate::config::DatabaseConfig;

/// Row of the `donors` table
#[derive(Debug, sqlx::FromRow)]
struct DonorRow {
    id: Uuid,
    doc: Json<DonorDetails>,
}

impl From<DonorRow> for Donor {
    fn from(row: DonorRow) -> Self {
        Donor::new(DonorId::from(row.id), row.doc.0)
    }
}

/// Donor store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgDonorStore {
    pool: PgPool,
}

impl PgDonorStore {
    /// Open the connection pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let mut options = PgConnectOptions::from_str(&config.url)?;
        if let Some(name) = &config.name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DonorStore for PgDonorStore {
    async fn create(&self, donor: NewDonor) -> StoreResult<DonorId> {
        let id = DonorId::new();
        let details = donor.into_details(Utc::now());

        sqlx::query(
            r#"
            INSERT INTO donors (id, doc)
            VALUES ($1, $2)
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(&details))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(&self, query: &DonorQuery) -> StoreResult<Vec<Donor>> {
        let rows = sqlx::query_as::<_, DonorRow>(
            r#"
            SELECT id, doc
            FROM donors
            WHERE ($1::text IS NULL OR doc->>'bloodGroup' = $1)
              AND ($2::text IS NULL OR doc->>'availability' = $2)
              AND ($3::text IS NULL OR doc->>'locationCity' = $3)
            ORDER BY inserted_at ASC, id ASC
            "#,
        )
        .bind(query.blood_group.map(|g| g.as_str()))
        .bind(query.availability.map(|a| a.as_str()))
        .bind(query.city.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Donor::from).collect())
    }

    async fn get(&self, id: DonorId) -> StoreResult<Option<Donor>> {
        let row = sqlx::query_as::<_, DonorRow>(
            r#"
            SELECT id, doc
            FROM donors
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Donor::from))
    }

    async fn update(&self, id: DonorId, patch: &DonorPatch) -> StoreResult<UpdateResult> {
        let changes = serde_json::to_value(patch)?;

        // Only rewrite the row when the merge changes the document
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, doc FROM donors WHERE id = $1
            ),
            updated AS (
                UPDATE donors AS d
                SET doc = d.doc || $2::jsonb,
                    updated_at = NOW()
                FROM target AS t
                WHERE d.id = t.id
                  AND t.doc <> t.doc || $2::jsonb
                RETURNING d.id
            )
            SELECT (SELECT COUNT(*) FROM target) AS matched_count,
                   (SELECT COUNT(*) FROM updated) AS modified_count
            "#,
        )
        .bind(id.as_uuid())
        .bind(changes)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: matched as u64,
            modified_count: modified as u64,
        })
    }

    async fn delete(&self, id: DonorId) -> StoreResult<DeleteResult> {
        let result = sqlx::query("DELETE FROM donors WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
