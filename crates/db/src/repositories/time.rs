use crate::models::DbTime;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_time(
    pool: &Pool<Postgres>,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbTime> {
    let uuid = Uuid::new_v4();
    let now = Utc::now();

    let time = sqlx::query_as::<_, DbTime>(
        r#"
        INSERT INTO times (uuid, start_time, end_time, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING id, uuid, start_time, end_time, created_at, updated_at
        "#,
    )
    .bind(uuid)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(time)
}

pub async fn get_all_times(pool: &Pool<Postgres>) -> Result<Vec<DbTime>> {
    let times = sqlx::query_as::<_, DbTime>(
        r#"
        SELECT id, uuid, start_time, end_time, created_at, updated_at
        FROM times
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(times)
}

pub async fn get_time_by_uuid(pool: &Pool<Postgres>, uuid: Uuid) -> Result<Option<DbTime>> {
    let time = sqlx::query_as::<_, DbTime>(
        r#"
        SELECT id, uuid, start_time, end_time, created_at, updated_at
        FROM times
        WHERE uuid = $1
        "#,
    )
    .bind(uuid)
    .fetch_optional(pool)
    .await?;

    Ok(time)
}

pub async fn get_time_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbTime>> {
    let time = sqlx::query_as::<_, DbTime>(
        r#"
        SELECT id, uuid, start_time, end_time, created_at, updated_at
        FROM times
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time)
}
