//! Schedule generation and slot booking.
//!
//! The engine keeps no state between calls. Every conflict check is a fresh
//! read against the [`SlotStore`], and the store's own uniqueness guarantee
//! backs the pre-checks done here when calls race.

mod booking;
mod generation;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clock::Clock,
    errors::{ScheduleError, ScheduleResult},
    locale::{booking_date_label, format_rupiah},
    models::{
        field::Field,
        field_schedule::{FieldScheduleDetail, FieldScheduleForBookingResponse, FieldScheduleResponse},
        time::TimeRange,
    },
    store::{FieldStore, SlotStore, TimeStore},
};

pub use generation::schedule_window;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Clone)]
pub struct FieldScheduleEngine {
    fields: Arc<dyn FieldStore>,
    times: Arc<dyn TimeStore>,
    slots: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    window_days: u32,
}

impl FieldScheduleEngine {
    pub fn new(
        fields: Arc<dyn FieldStore>,
        times: Arc<dyn TimeStore>,
        slots: Arc<dyn SlotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            fields,
            times,
            slots,
            clock,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Overrides the number of days generated when a request names none.
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    async fn resolve_field(&self, uuid: Uuid) -> ScheduleResult<Field> {
        self.fields
            .find_field_by_uuid(uuid)
            .await?
            .ok_or_else(|| ScheduleError::field_not_found(uuid))
    }

    async fn resolve_time(&self, uuid: Uuid) -> ScheduleResult<TimeRange> {
        self.times
            .find_time_by_uuid(uuid)
            .await?
            .ok_or_else(|| ScheduleError::time_not_found(uuid))
    }

    async fn resolve_schedule(&self, uuid: Uuid) -> ScheduleResult<FieldScheduleDetail> {
        self.slots
            .find_slot_by_uuid(uuid)
            .await?
            .ok_or_else(|| ScheduleError::schedule_not_found(uuid))
    }
}

impl From<FieldScheduleDetail> for FieldScheduleResponse {
    fn from(detail: FieldScheduleDetail) -> Self {
        Self {
            uuid: detail.schedule.uuid,
            field_name: detail.field.name,
            price_per_hour: detail.field.price_per_hour,
            date: detail.schedule.date.format("%Y-%m-%d").to_string(),
            status: detail.schedule.status.label().to_string(),
            time: detail.time.range_label(),
            created_at: detail.schedule.created_at,
            updated_at: detail.schedule.updated_at,
        }
    }
}

impl From<FieldScheduleDetail> for FieldScheduleForBookingResponse {
    fn from(detail: FieldScheduleDetail) -> Self {
        Self {
            uuid: detail.schedule.uuid,
            price_per_hour: format_rupiah(detail.field.price_per_hour),
            date: booking_date_label(detail.schedule.date),
            status: detail.schedule.status.label().to_string(),
            time: detail.time.start_label(),
        }
    }
}
