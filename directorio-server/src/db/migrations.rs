//! Database migrations for the directory tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so this runs on each
//! start.

use sqlx::PgPool;

/// Partial unique index on live area names
pub const AREA_NAME_UNIQUE: &str = "areas_nombre_active_key";

/// Partial unique index on live person emails
pub const PERSON_EMAIL_UNIQUE: &str = "personas_email_active_key";

/// Foreign key from personas.area_id to areas.id
pub const PERSON_AREA_FK: &str = "personas_area_id_fkey";

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    // Create areas table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS areas (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(100) NOT NULL,
            descripcion TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create personas table
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS personas (
            id BIGSERIAL PRIMARY KEY,
            nombre VARCHAR(200) NOT NULL,
            email VARCHAR(200) NOT NULL,
            area_id BIGINT NOT NULL
                CONSTRAINT {PERSON_AREA_FK} REFERENCES areas(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#
    ))
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Database migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Uniqueness only among live rows, so a soft-deleted name/email can be reused
    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {AREA_NAME_UNIQUE} ON areas(nombre) WHERE deleted_at IS NULL"
    ))
    .execute(pool)
    .await?;
    sqlx::query(&format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {PERSON_EMAIL_UNIQUE} ON personas(email) WHERE deleted_at IS NULL"
    ))
    .execute(pool)
    .await?;

    // Soft-delete and join indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_areas_deleted_at ON areas(deleted_at)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_personas_deleted_at ON personas(deleted_at)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_personas_area_id ON personas(area_id)")
        .execute(pool)
        .await?;

    Ok(())
}
