//! PostgreSQL implementation of the report store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plantwatch_core::{Marker, NewReport, Report, ReportId, ReportStore, StoreError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed report store over the `plant_info` table.
#[derive(Clone)]
pub struct PostgresReportStore {
    pool: PgPool,
}

/// Row type for `plant_info` queries.
#[derive(FromRow)]
struct ReportRow {
    id: Uuid,
    user_email: String,
    plant_name: String,
    image: Vec<u8>,
    lat: String,
    lng: String,
    description: String,
    invasive_info: bool,
    removed: bool,
    created_at: DateTime<Utc>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            user_email: row.user_email,
            plant_name: row.plant_name,
            image: row.image,
            lat: row.lat,
            lng: row.lng,
            description: row.description,
            invasive_info: row.invasive_info,
            removed: row.removed,
            created_at: row.created_at,
        }
    }
}

fn query_err(err: sqlx::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

impl PostgresReportStore {
    /// Connect a pool sized by the given limits.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(
            max_connections,
            min_connections,
            "Connected to PostgreSQL database"
        );
        Ok(Self { pool })
    }

    /// Create a report store from an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pool shared with the other repositories.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        tracing::info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl ReportStore for PostgresReportStore {
    async fn create(&self, report: NewReport) -> Result<Report, StoreError> {
        let row: ReportRow = sqlx::query_as(
            r#"
            INSERT INTO plant_info
                (id, user_email, plant_name, image, lat, lng, description, invasive_info, removed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_email, plant_name, image, lat, lng, description,
                      invasive_info, removed, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&report.user_email)
        .bind(&report.plant_name)
        .bind(&report.image)
        .bind(&report.lat)
        .bind(&report.lng)
        .bind(&report.description)
        .bind(report.invasive_info)
        .bind(report.removed)
        .fetch_one(&self.pool)
        .await
        .map_err(query_err)?;

        tracing::debug!(report_id = %row.id, "Stored report");
        Ok(row.into())
    }

    async fn find_by_user(&self, email: &str) -> Result<Vec<Report>, StoreError> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            r#"
            SELECT id, user_email, plant_name, image, lat, lng, description,
                   invasive_info, removed, created_at
            FROM plant_info
            WHERE user_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_location_and_species(
        &self,
        lat: &str,
        lng: &str,
        plant_name: &str,
    ) -> Result<Vec<Report>, StoreError> {
        let rows: Vec<ReportRow> = sqlx::query_as(
            r#"
            SELECT id, user_email, plant_name, image, lat, lng, description,
                   invasive_info, removed, created_at
            FROM plant_info
            WHERE lat = $1 AND lng = $2 AND plant_name = $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(lat)
        .bind(lng)
        .bind(plant_name)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_active_invasive_markers(&self) -> Result<Vec<Marker>, StoreError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT plant_name, lat, lng
            FROM plant_info
            WHERE removed = FALSE AND invasive_info = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        let total = rows.len();
        let markers: Vec<Marker> = rows
            .into_iter()
            .filter_map(|(plant_name, lat, lng)| Marker::from_coordinates(plant_name, &lat, &lng))
            .collect();

        if markers.len() < total {
            tracing::warn!(
                skipped = total - markers.len(),
                "Skipped reports with unparseable coordinates"
            );
        }
        Ok(markers)
    }

    async fn mark_removed(&self, id: ReportId, removed: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE plant_info SET removed = $2 WHERE id = $1")
            .bind(id)
            .bind(removed)
            .execute(&self.pool)
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
