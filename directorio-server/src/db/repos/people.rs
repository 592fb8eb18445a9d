//! Person repository
//!
//! Every read LEFT JOINs the live area so callers get the nested record
//! in the same round trip. Writes use a CTE so the returned row carries
//! the area too.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{Area, DbError, PersonRepository};
use crate::models::{AreaId, NewPerson, PersonId};

/// Projection shared by every person query; `p` is the person row
/// (table or CTE), `a` the joined area.
const PERSON_SELECT: &str = r#"
    SELECT
        p.id, p.nombre, p.email, p.area_id,
        p.created_at, p.updated_at, p.deleted_at,
        a.id AS area_ref_id,
        a.nombre AS area_nombre,
        a.descripcion AS area_descripcion,
        a.created_at AS area_created_at,
        a.updated_at AS area_updated_at
"#;

const AREA_JOIN: &str = "LEFT JOIN areas a ON a.id = p.area_id AND a.deleted_at IS NULL";

/// Person record from database, with its live area attached
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub nombre: String,
    pub email: String,
    pub area_id: AreaId,
    pub area: Option<Area>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Person {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let area = match row.try_get::<Option<AreaId>, _>("area_ref_id")? {
            Some(id) => Some(Area {
                id,
                nombre: row.try_get("area_nombre")?,
                descripcion: row.try_get("area_descripcion")?,
                created_at: row.try_get("area_created_at")?,
                updated_at: row.try_get("area_updated_at")?,
                deleted_at: None,
            }),
            None => None,
        };

        Ok(Self {
            id: row.try_get("id")?,
            nombre: row.try_get("nombre")?,
            email: row.try_get("email")?,
            area_id: row.try_get("area_id")?,
            area,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

/// PostgreSQL-backed person repository
#[derive(Clone)]
pub struct PgPersonRepo {
    pool: PgPool,
}

impl PgPersonRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepo {
    async fn create(&self, person: &NewPerson) -> Result<Person, DbError> {
        let sql = format!(
            r#"
            WITH p AS (
                INSERT INTO personas (nombre, email, area_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            {PERSON_SELECT}
            FROM p
            {AREA_JOIN}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(person.nombre.as_str())
            .bind(person.email.as_str())
            .bind(person.area_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Person::from_row(&row)?)
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Person>, DbError> {
        let sql = format!(
            r#"
            {PERSON_SELECT}
            FROM personas p
            {AREA_JOIN}
            WHERE ($1 OR p.deleted_at IS NULL)
            ORDER BY p.id
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await?;

        let people = rows
            .iter()
            .map(Person::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(people)
    }

    async fn get(&self, id: PersonId, include_deleted: bool) -> Result<Person, DbError> {
        let sql = format!(
            r#"
            {PERSON_SELECT}
            FROM personas p
            {AREA_JOIN}
            WHERE p.id = $1 AND ($2 OR p.deleted_at IS NULL)
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(include_deleted)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("persona", id))?;

        Ok(Person::from_row(&row)?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Person, DbError> {
        let sql = format!(
            r#"
            {PERSON_SELECT}
            FROM personas p
            {AREA_JOIN}
            WHERE p.email = $1 AND p.deleted_at IS NULL
            "#
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("persona", email))?;

        Ok(Person::from_row(&row)?)
    }

    async fn update(&self, id: PersonId, person: &NewPerson) -> Result<Person, DbError> {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE personas
                SET nombre = $2, email = $3, area_id = $4, updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
            )
            {PERSON_SELECT}
            FROM p
            {AREA_JOIN}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(person.nombre.as_str())
            .bind(person.email.as_str())
            .bind(person.area_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("persona", id))?;

        Ok(Person::from_row(&row)?)
    }

    async fn delete(&self, id: PersonId) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE personas SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("persona", id));
        }
        Ok(())
    }
}
