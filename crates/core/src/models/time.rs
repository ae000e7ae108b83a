use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format used for every time-of-day label shown to callers.
pub const TIME_LABEL_FORMAT: &str = "%H:%M:%S";

/// A reusable time-of-day range that schedules are built from.
///
/// Ranges are catalog-wide rather than per field, and may overlap in
/// wall-clock terms; each one is still a distinct schedulable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub id: i64,
    pub uuid: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeRange {
    pub fn start_label(&self) -> String {
        self.start_time.format(TIME_LABEL_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end_time.format(TIME_LABEL_FORMAT).to_string()
    }

    /// Combined `"start - end"` label used by listing views.
    pub fn range_label(&self) -> String {
        format!("{} - {}", self.start_label(), self.end_label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRequest {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub uuid: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TimeRange> for TimeResponse {
    fn from(time: TimeRange) -> Self {
        Self {
            uuid: time.uuid,
            start_time: time.start_label(),
            end_time: time.end_label(),
            created_at: time.created_at,
            updated_at: time.updated_at,
        }
    }
}
