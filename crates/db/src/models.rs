use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fieldslot_core::{
    errors::ScheduleError,
    models::{
        field::Field,
        field_schedule::{FieldSchedule, FieldScheduleDetail, SlotStatus},
        time::TimeRange,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTime {
    pub id: i64,
    pub uuid: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbField {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub price_per_hour: i64,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFieldSchedule {
    pub id: i64,
    pub uuid: Uuid,
    pub field_id: i64,
    pub time_id: i64,
    pub date: NaiveDate,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `field_schedules` row joined with its field and time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFieldScheduleDetail {
    pub id: i64,
    pub uuid: Uuid,
    pub field_id: i64,
    pub time_id: i64,
    pub date: NaiveDate,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub field_uuid: Uuid,
    pub field_name: String,
    pub field_price_per_hour: i64,
    pub field_images: Vec<String>,
    pub field_created_at: DateTime<Utc>,
    pub field_updated_at: DateTime<Utc>,
    pub time_uuid: Uuid,
    pub time_start_time: NaiveTime,
    pub time_end_time: NaiveTime,
    pub time_created_at: DateTime<Utc>,
    pub time_updated_at: DateTime<Utc>,
}

impl From<DbTime> for TimeRange {
    fn from(row: DbTime) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            start_time: row.start_time,
            end_time: row.end_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbField> for Field {
    fn from(row: DbField) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            price_per_hour: row.price_per_hour,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbFieldSchedule> for FieldSchedule {
    type Error = ScheduleError;

    fn try_from(row: DbFieldSchedule) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            uuid: row.uuid,
            field_id: row.field_id,
            time_id: row.time_id,
            date: row.date,
            status: SlotStatus::from_code(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbFieldScheduleDetail> for FieldScheduleDetail {
    type Error = ScheduleError;

    fn try_from(row: DbFieldScheduleDetail) -> Result<Self, Self::Error> {
        Ok(Self {
            schedule: FieldSchedule {
                id: row.id,
                uuid: row.uuid,
                field_id: row.field_id,
                time_id: row.time_id,
                date: row.date,
                status: SlotStatus::from_code(row.status)?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            field: Field {
                id: row.field_id,
                uuid: row.field_uuid,
                name: row.field_name,
                price_per_hour: row.field_price_per_hour,
                images: row.field_images,
                created_at: row.field_created_at,
                updated_at: row.field_updated_at,
            },
            time: TimeRange {
                id: row.time_id,
                uuid: row.time_uuid,
                start_time: row.time_start_time,
                end_time: row.time_end_time,
                created_at: row.time_created_at,
                updated_at: row.time_updated_at,
            },
        })
    }
}
