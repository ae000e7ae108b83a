use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::ScheduleError,
    models::{field::Field, time::TimeRange},
};

/// Booking status of a slot.
///
/// The set is closed so that unknown labels and codes can be rejected as
/// [`ScheduleError::InvalidStatus`]. Transitions between variants are not
/// policed here; reservation flows decide which changes are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotStatus {
    #[default]
    Available,
    Booked,
}

impl SlotStatus {
    pub const ALL: [SlotStatus; 2] = [SlotStatus::Available, SlotStatus::Booked];

    pub fn label(self) -> &'static str {
        match self {
            SlotStatus::Available => "Available",
            SlotStatus::Booked => "Booked",
        }
    }

    /// Numeric code used by persistent storage.
    pub fn code(self) -> i16 {
        match self {
            SlotStatus::Available => 100,
            SlotStatus::Booked => 200,
        }
    }

    pub fn from_code(code: i16) -> Result<Self, ScheduleError> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| ScheduleError::InvalidStatus(code.to_string()))
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SlotStatus {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScheduleError::InvalidStatus(s.to_string()))
    }
}

/// A dated, bookable unit identified by (field, time range, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchedule {
    pub id: i64,
    pub uuid: Uuid,
    pub field_id: i64,
    pub time_id: i64,
    pub date: NaiveDate,
    pub status: SlotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FieldSchedule {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            field_id: self.field_id,
            time_id: self.time_id,
            date: self.date,
        }
    }
}

/// Uniqueness key of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub field_id: i64,
    pub time_id: i64,
    pub date: NaiveDate,
}

/// A slot that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFieldSchedule {
    pub uuid: Uuid,
    pub field_id: i64,
    pub time_id: i64,
    pub date: NaiveDate,
    pub status: SlotStatus,
}

impl NewFieldSchedule {
    pub fn available(field_id: i64, time_id: i64, date: NaiveDate) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            field_id,
            time_id,
            date,
            status: SlotStatus::Available,
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            field_id: self.field_id,
            time_id: self.time_id,
            date: self.date,
        }
    }
}

/// A slot together with the field and time range it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldScheduleDetail {
    pub schedule: FieldSchedule,
    pub field: Field,
    pub time: TimeRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    CreatedAt,
    UpdatedAt,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Resolved listing filter handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldScheduleFilter {
    pub field_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<SlotStatus>,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFieldScheduleRequest {
    pub field_id: Uuid,
    #[serde(default)]
    pub window_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldScheduleRequest {
    pub field_id: Uuid,
    pub date: NaiveDate,
    pub time_ids: Vec<Uuid>,
}

/// Changes to a slot's identifying tuple. Absent members are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFieldScheduleRequest {
    #[serde(default)]
    pub field_id: Option<Uuid>,
    #[serde(default)]
    pub time_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusBatchRequest {
    pub field_schedule_ids: Vec<Uuid>,
    pub status: String,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldScheduleRequestParam {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub field_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_column: Option<SortColumn>,
    #[serde(default)]
    pub sort_order: Option<SortOrder>,
}

impl Default for FieldScheduleRequestParam {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            field_id: None,
            date: None,
            status: None,
            sort_column: None,
            sort_order: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldScheduleByDateParam {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScheduleResponse {
    pub uuid: Uuid,
    pub field_name: String,
    pub price_per_hour: i64,
    pub date: String,
    pub status: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking-facing view of a slot, with display labels instead of raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScheduleForBookingResponse {
    pub uuid: Uuid,
    pub price_per_hour: String,
    pub date: String,
    pub status: String,
    pub time: String,
}
