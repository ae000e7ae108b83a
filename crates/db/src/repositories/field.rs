use crate::models::DbField;
use chrono::Utc;
use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Fields are managed outside the schedule engine; this exists for seeding
/// and integration tests.
pub async fn create_field(
    pool: &Pool<Postgres>,
    name: &str,
    price_per_hour: i64,
    images: &[String],
) -> Result<DbField> {
    let uuid = Uuid::new_v4();
    let now = Utc::now();

    let field = sqlx::query_as::<_, DbField>(
        r#"
        INSERT INTO fields (uuid, name, price_per_hour, images, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, uuid, name, price_per_hour, images, created_at, updated_at
        "#,
    )
    .bind(uuid)
    .bind(name)
    .bind(price_per_hour)
    .bind(images)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(field)
}

pub async fn get_all_fields(pool: &Pool<Postgres>) -> Result<Vec<DbField>> {
    let fields = sqlx::query_as::<_, DbField>(
        r#"
        SELECT id, uuid, name, price_per_hour, images, created_at, updated_at
        FROM fields
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(fields)
}

pub async fn get_fields_with_pagination(
    pool: &Pool<Postgres>,
    limit: u64,
    offset: u64,
) -> Result<(Vec<DbField>, i64)> {
    let limit = i64::try_from(limit).wrap_err("limit out of range")?;
    // Offsets past i64::MAX still select nothing
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);

    let fields = sqlx::query_as::<_, DbField>(
        r#"
        SELECT id, uuid, name, price_per_hour, images, created_at, updated_at
        FROM fields
        ORDER BY id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields")
        .fetch_one(pool)
        .await?;

    Ok((fields, total))
}

pub async fn get_field_by_uuid(pool: &Pool<Postgres>, uuid: Uuid) -> Result<Option<DbField>> {
    let field = sqlx::query_as::<_, DbField>(
        r#"
        SELECT id, uuid, name, price_per_hour, images, created_at, updated_at
        FROM fields
        WHERE uuid = $1
        "#,
    )
    .bind(uuid)
    .fetch_optional(pool)
    .await?;

    Ok(field)
}

pub async fn get_field_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbField>> {
    let field = sqlx::query_as::<_, DbField>(
        r#"
        SELECT id, uuid, name, price_per_hour, images, created_at, updated_at
        FROM fields
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(field)
}
