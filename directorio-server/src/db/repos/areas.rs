//! Area repository
//!
//! Soft-deleted areas keep their row; `deleted_at` is the tombstone.
//! - list_with_count: LEFT JOIN over live persons (no N+1)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{AreaRepository, DbError};
use crate::models::{AreaId, NewArea};

const AREA_COLUMNS: &str = "id, nombre, descripcion, created_at, updated_at, deleted_at";

/// Area record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Area {
    pub id: AreaId,
    pub nombre: String,
    pub descripcion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Area with its live person count
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AreaWithCount {
    pub id: AreaId,
    pub nombre: String,
    pub descripcion: String,
    pub personas: i64,
}

/// PostgreSQL-backed area repository
#[derive(Clone)]
pub struct PgAreaRepo {
    pool: PgPool,
}

impl PgAreaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AreaRepository for PgAreaRepo {
    async fn create(&self, area: &NewArea) -> Result<Area, DbError> {
        let sql = format!(
            "INSERT INTO areas (nombre, descripcion) VALUES ($1, $2) RETURNING {AREA_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Area>(&sql)
            .bind(area.nombre.as_str())
            .bind(&area.descripcion)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Area>, DbError> {
        let sql = format!(
            "SELECT {AREA_COLUMNS} FROM areas WHERE ($1 OR deleted_at IS NULL) ORDER BY id"
        );
        let areas = sqlx::query_as::<_, Area>(&sql)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;

        Ok(areas)
    }

    async fn get(&self, id: AreaId, include_deleted: bool) -> Result<Area, DbError> {
        let sql = format!(
            "SELECT {AREA_COLUMNS} FROM areas WHERE id = $1 AND ($2 OR deleted_at IS NULL)"
        );
        sqlx::query_as::<_, Area>(&sql)
            .bind(id)
            .bind(include_deleted)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("area", id))
    }

    async fn update(&self, id: AreaId, area: &NewArea) -> Result<Area, DbError> {
        let sql = format!(
            r#"
            UPDATE areas
            SET nombre = $2, descripcion = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {AREA_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Area>(&sql)
            .bind(id)
            .bind(area.nombre.as_str())
            .bind(&area.descripcion)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("area", id))
    }

    async fn delete(&self, id: AreaId) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE areas SET deleted_at = NOW()
            WHERE id = $1
              AND deleted_at IS NULL
              AND NOT EXISTS (
                  SELECT 1 FROM personas WHERE area_id = $1 AND deleted_at IS NULL
              )
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either gone or still referenced
            let members = self.count_members(id).await?;
            if members > 0 {
                return Err(DbError::InUse { members });
            }
            return Err(DbError::not_found("area", id));
        }
        Ok(())
    }

    /// Uses LEFT JOIN to get counts in a single query (no N+1).
    async fn list_with_count(&self) -> Result<Vec<AreaWithCount>, DbError> {
        let rows = sqlx::query_as::<_, AreaWithCount>(
            r#"
            SELECT
                a.id,
                a.nombre,
                a.descripcion,
                COUNT(p.id) AS personas
            FROM areas a
            LEFT JOIN personas p ON p.area_id = a.id AND p.deleted_at IS NULL
            WHERE a.deleted_at IS NULL
            GROUP BY a.id, a.nombre, a.descripcion
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_members(&self, id: AreaId) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM personas WHERE area_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
