use crate::models::{DbFieldSchedule, DbFieldScheduleDetail};
use chrono::{NaiveDate, Utc};
use eyre::{Result, WrapErr};
use fieldslot_core::models::field_schedule::{
    FieldScheduleFilter, NewFieldSchedule, SlotKey, SortColumn, SortOrder,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SCHEDULE_COLUMNS: &str =
    "id, uuid, field_id, time_id, date, status, created_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT fs.id, fs.uuid, fs.field_id, fs.time_id, fs.date, fs.status,
           fs.created_at, fs.updated_at,
           f.uuid AS field_uuid, f.name AS field_name,
           f.price_per_hour AS field_price_per_hour, f.images AS field_images,
           f.created_at AS field_created_at, f.updated_at AS field_updated_at,
           t.uuid AS time_uuid, t.start_time AS time_start_time,
           t.end_time AS time_end_time,
           t.created_at AS time_created_at, t.updated_at AS time_updated_at
    FROM field_schedules fs
    JOIN fields f ON f.id = fs.field_id
    JOIN times t ON t.id = fs.time_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::BIGINT IS NULL OR fs.field_id = $1)
      AND ($2::DATE IS NULL OR fs.date = $2)
      AND ($3::SMALLINT IS NULL OR fs.status = $3)
"#;

/// `ORDER BY` clause for a listing. Built from closed enums only.
pub fn order_clause(column: SortColumn, order: SortOrder) -> String {
    let column = match column {
        SortColumn::CreatedAt => "fs.created_at",
        SortColumn::UpdatedAt => "fs.updated_at",
        SortColumn::Date => "fs.date",
    };
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("ORDER BY {column} {direction}, fs.id {direction}")
}

pub async fn get_field_schedule_by_slot(
    pool: &Pool<Postgres>,
    key: SlotKey,
) -> Result<Option<DbFieldSchedule>> {
    let query = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM field_schedules \
         WHERE field_id = $1 AND time_id = $2 AND date = $3"
    );

    let schedule = sqlx::query_as::<_, DbFieldSchedule>(&query)
        .bind(key.field_id)
        .bind(key.time_id)
        .bind(key.date)
        .fetch_optional(pool)
        .await?;

    Ok(schedule)
}

/// Inserts every row in one statement, so a uniqueness violation on any row
/// leaves the table untouched.
pub async fn create_field_schedules(
    pool: &Pool<Postgres>,
    schedules: &[NewFieldSchedule],
) -> Result<Vec<DbFieldSchedule>> {
    let now = Utc::now();
    let uuids: Vec<Uuid> = schedules.iter().map(|s| s.uuid).collect();
    let field_ids: Vec<i64> = schedules.iter().map(|s| s.field_id).collect();
    let time_ids: Vec<i64> = schedules.iter().map(|s| s.time_id).collect();
    let dates: Vec<NaiveDate> = schedules.iter().map(|s| s.date).collect();
    let statuses: Vec<i16> = schedules.iter().map(|s| s.status.code()).collect();

    tracing::debug!("Inserting {} field schedules", schedules.len());

    let query = format!(
        "INSERT INTO field_schedules (uuid, field_id, time_id, date, status, created_at, updated_at) \
         SELECT u, f, t, d, s, $6, $6 \
         FROM UNNEST($1::UUID[], $2::BIGINT[], $3::BIGINT[], $4::DATE[], $5::SMALLINT[]) \
              WITH ORDINALITY AS src(u, f, t, d, s, n) \
         ORDER BY n \
         RETURNING {SCHEDULE_COLUMNS}"
    );

    let mut created = sqlx::query_as::<_, DbFieldSchedule>(&query)
        .bind(uuids)
        .bind(field_ids)
        .bind(time_ids)
        .bind(dates)
        .bind(statuses)
        .bind(now)
        .fetch_all(pool)
        .await?;

    created.sort_by_key(|schedule| schedule.id);
    Ok(created)
}

pub async fn get_field_schedules_by_field_and_date(
    pool: &Pool<Postgres>,
    field_id: i64,
    date: NaiveDate,
) -> Result<Vec<DbFieldScheduleDetail>> {
    let query = format!("{DETAIL_SELECT} WHERE fs.field_id = $1 AND fs.date = $2 ORDER BY fs.id ASC");

    let schedules = sqlx::query_as::<_, DbFieldScheduleDetail>(&query)
        .bind(field_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

    Ok(schedules)
}

pub async fn get_field_schedules_with_pagination(
    pool: &Pool<Postgres>,
    filter: &FieldScheduleFilter,
) -> Result<(Vec<DbFieldScheduleDetail>, i64)> {
    let limit = i64::try_from(filter.limit).wrap_err("limit out of range")?;
    // Offsets past i64::MAX still select nothing
    let offset = i64::try_from(filter.offset).unwrap_or(i64::MAX);
    let status = filter.status.map(|status| status.code());

    let query = format!(
        "{DETAIL_SELECT} {FILTER_CLAUSE} {} LIMIT $4 OFFSET $5",
        order_clause(filter.sort_column, filter.sort_order)
    );

    let schedules = sqlx::query_as::<_, DbFieldScheduleDetail>(&query)
        .bind(filter.field_id)
        .bind(filter.date)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let count_query = format!("SELECT COUNT(*) FROM field_schedules fs {FILTER_CLAUSE}");
    let total = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(filter.field_id)
        .bind(filter.date)
        .bind(status)
        .fetch_one(pool)
        .await?;

    Ok((schedules, total))
}

pub async fn get_field_schedule_by_uuid(
    pool: &Pool<Postgres>,
    uuid: Uuid,
) -> Result<Option<DbFieldScheduleDetail>> {
    let query = format!("{DETAIL_SELECT} WHERE fs.uuid = $1");

    let schedule = sqlx::query_as::<_, DbFieldScheduleDetail>(&query)
        .bind(uuid)
        .fetch_optional(pool)
        .await?;

    Ok(schedule)
}

pub async fn update_field_schedule(
    pool: &Pool<Postgres>,
    id: i64,
    key: SlotKey,
) -> Result<Option<DbFieldSchedule>> {
    let query = format!(
        "UPDATE field_schedules \
         SET field_id = $2, time_id = $3, date = $4, updated_at = $5 \
         WHERE id = $1 \
         RETURNING {SCHEDULE_COLUMNS}"
    );

    let schedule = sqlx::query_as::<_, DbFieldSchedule>(&query)
        .bind(id)
        .bind(key.field_id)
        .bind(key.time_id)
        .bind(key.date)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    Ok(schedule)
}

/// Sets `status` on every listed row inside a transaction. The change is
/// committed only if all ids matched; otherwise it is rolled back and the
/// number of matched rows is returned for the caller to report.
pub async fn update_field_schedule_status(
    pool: &Pool<Postgres>,
    ids: &[i64],
    status: i16,
) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE field_schedules
        SET status = $2, updated_at = $3
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .bind(status)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let updated = result.rows_affected();
    if updated == ids.len() as u64 {
        tx.commit().await?;
    } else {
        tx.rollback().await?;
    }

    Ok(updated)
}

pub async fn delete_field_schedule(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM field_schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
