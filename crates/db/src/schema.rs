use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create times table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS times (
            id BIGSERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time <> start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create fields table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fields (
            id BIGSERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            price_per_hour BIGINT NOT NULL,
            images TEXT[] NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create field_schedules table; the unique constraint is what keeps
    // concurrent generate/create calls from double-booking a slot
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS field_schedules (
            id BIGSERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE DEFAULT gen_random_uuid(),
            field_id BIGINT NOT NULL REFERENCES fields(id),
            time_id BIGINT NOT NULL REFERENCES times(id),
            date DATE NOT NULL,
            status SMALLINT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT uq_field_schedules_field_time_date UNIQUE (field_id, time_id, date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_field_schedules_field_id_date ON field_schedules(field_id, date)",
        "CREATE INDEX IF NOT EXISTS idx_field_schedules_status ON field_schedules(status)",
        "CREATE INDEX IF NOT EXISTS idx_field_schedules_created_at ON field_schedules(created_at)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
