//! Storage interface consumed by the catalogs and the engine.
//!
//! Implementations must reject a write that would create a second slot for
//! the same (field, time range, date) with
//! [`ScheduleError::ScheduleAlreadyExists`](crate::errors::ScheduleError::ScheduleAlreadyExists),
//! atomically with respect to concurrent writers. Any other backend failure
//! is reported as `ScheduleError::Storage`.

pub mod memory;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    errors::ScheduleResult,
    models::{
        field::Field,
        field_schedule::{
            FieldSchedule, FieldScheduleDetail, FieldScheduleFilter, NewFieldSchedule, SlotKey,
            SlotStatus,
        },
        time::TimeRange,
    },
};

pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeStore: Send + Sync {
    /// All ranges in registration order.
    async fn find_all_times(&self) -> ScheduleResult<Vec<TimeRange>>;

    async fn find_time_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<TimeRange>>;

    async fn find_time_by_id(&self, id: i64) -> ScheduleResult<Option<TimeRange>>;

    async fn create_time(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> ScheduleResult<TimeRange>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FieldStore: Send + Sync {
    async fn find_all_fields(&self) -> ScheduleResult<Vec<Field>>;

    /// One page of fields plus the total field count.
    async fn find_fields_with_pagination(
        &self,
        limit: u64,
        offset: u64,
    ) -> ScheduleResult<(Vec<Field>, u64)>;

    async fn find_field_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<Field>>;

    async fn find_field_by_id(&self, id: i64) -> ScheduleResult<Option<Field>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn find_slot(&self, key: SlotKey) -> ScheduleResult<Option<FieldSchedule>>;

    /// Persists every slot or none of them.
    async fn create_slots(
        &self,
        slots: Vec<NewFieldSchedule>,
    ) -> ScheduleResult<Vec<FieldSchedule>>;

    /// Slots of one field on one date, in creation order.
    async fn find_slots_by_field_and_date(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<FieldScheduleDetail>>;

    /// One filtered page of slots plus the total number of matches.
    async fn find_slots_with_pagination(
        &self,
        filter: &FieldScheduleFilter,
    ) -> ScheduleResult<(Vec<FieldScheduleDetail>, u64)>;

    async fn find_slot_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<FieldScheduleDetail>>;

    /// Moves a slot to a new key, rejecting the move if another slot holds it.
    async fn update_slot(&self, id: i64, key: SlotKey) -> ScheduleResult<FieldSchedule>;

    /// Sets the status of every listed slot. Unknown ids fail the whole call.
    async fn update_slot_status(&self, ids: &[i64], status: SlotStatus) -> ScheduleResult<u64>;

    /// Returns `false` when no slot had the id.
    async fn delete_slot(&self, id: i64) -> ScheduleResult<bool>;
}
