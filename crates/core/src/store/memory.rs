use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, HashSet},
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::eyre;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        field::Field,
        field_schedule::{
            FieldSchedule, FieldScheduleDetail, FieldScheduleFilter, NewFieldSchedule, SlotKey,
            SlotStatus, SortColumn, SortOrder,
        },
        time::TimeRange,
    },
    store::{FieldStore, SlotStore, TimeStore},
};

#[derive(Default)]
struct Tables {
    times: Vec<TimeRange>,
    fields: Vec<Field>,
    schedules: BTreeMap<i64, FieldSchedule>,
    keys: HashMap<SlotKey, i64>,
    last_time_id: i64,
    last_field_id: i64,
    last_schedule_id: i64,
}

impl Tables {
    fn time(&self, id: i64) -> Option<&TimeRange> {
        self.times.iter().find(|time| time.id == id)
    }

    fn field(&self, id: i64) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    fn detail(&self, schedule: &FieldSchedule) -> ScheduleResult<FieldScheduleDetail> {
        let field = self
            .field(schedule.field_id)
            .ok_or_else(|| eyre!("field {} missing for schedule {}", schedule.field_id, schedule.id))?;
        let time = self
            .time(schedule.time_id)
            .ok_or_else(|| eyre!("time {} missing for schedule {}", schedule.time_id, schedule.id))?;

        Ok(FieldScheduleDetail {
            schedule: schedule.clone(),
            field: field.clone(),
            time: time.clone(),
        })
    }

    fn check_references(&self, key: &SlotKey) -> ScheduleResult<()> {
        if self.field(key.field_id).is_none() {
            return Err(ScheduleError::field_not_found(key.field_id));
        }
        if self.time(key.time_id).is_none() {
            return Err(ScheduleError::time_not_found(key.time_id));
        }
        Ok(())
    }
}

/// Process-local store. A single lock serializes the uniqueness check and
/// the write, so concurrent generate/create calls cannot both succeed for
/// the same slot.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field. Fields are owned outside the engine, so this is
    /// only exposed on the concrete store for seeding.
    pub async fn insert_field(&self, name: &str, price_per_hour: i64, images: Vec<String>) -> Field {
        let mut tables = self.tables.write().await;
        tables.last_field_id += 1;
        let now = Utc::now();
        let field = Field {
            id: tables.last_field_id,
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            price_per_hour,
            images,
            created_at: now,
            updated_at: now,
        };
        tables.fields.push(field.clone());
        field
    }

    pub async fn slot_count(&self) -> usize {
        self.tables.read().await.schedules.len()
    }
}

#[async_trait]
impl TimeStore for MemoryStore {
    async fn find_all_times(&self) -> ScheduleResult<Vec<TimeRange>> {
        Ok(self.tables.read().await.times.clone())
    }

    async fn find_time_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<TimeRange>> {
        let tables = self.tables.read().await;
        Ok(tables.times.iter().find(|time| time.uuid == uuid).cloned())
    }

    async fn find_time_by_id(&self, id: i64) -> ScheduleResult<Option<TimeRange>> {
        Ok(self.tables.read().await.time(id).cloned())
    }

    async fn create_time(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> ScheduleResult<TimeRange> {
        let mut tables = self.tables.write().await;
        tables.last_time_id += 1;
        let now = Utc::now();
        let time = TimeRange {
            id: tables.last_time_id,
            uuid: Uuid::new_v4(),
            start_time,
            end_time,
            created_at: now,
            updated_at: now,
        };
        tables.times.push(time.clone());
        Ok(time)
    }
}

#[async_trait]
impl FieldStore for MemoryStore {
    async fn find_all_fields(&self) -> ScheduleResult<Vec<Field>> {
        Ok(self.tables.read().await.fields.clone())
    }

    async fn find_fields_with_pagination(
        &self,
        limit: u64,
        offset: u64,
    ) -> ScheduleResult<(Vec<Field>, u64)> {
        let tables = self.tables.read().await;
        let page = tables
            .fields
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, tables.fields.len() as u64))
    }

    async fn find_field_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<Field>> {
        let tables = self.tables.read().await;
        Ok(tables.fields.iter().find(|field| field.uuid == uuid).cloned())
    }

    async fn find_field_by_id(&self, id: i64) -> ScheduleResult<Option<Field>> {
        Ok(self.tables.read().await.field(id).cloned())
    }
}

fn compare(a: &FieldSchedule, b: &FieldSchedule, column: SortColumn) -> Ordering {
    let primary = match column {
        SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortColumn::Date => a.date.cmp(&b.date),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn find_slot(&self, key: SlotKey) -> ScheduleResult<Option<FieldSchedule>> {
        let tables = self.tables.read().await;
        Ok(tables
            .keys
            .get(&key)
            .and_then(|id| tables.schedules.get(id))
            .cloned())
    }

    async fn create_slots(
        &self,
        slots: Vec<NewFieldSchedule>,
    ) -> ScheduleResult<Vec<FieldSchedule>> {
        let mut tables = self.tables.write().await;

        let mut batch_keys = HashSet::with_capacity(slots.len());
        for slot in &slots {
            let key = slot.slot_key();
            tables.check_references(&key)?;
            if tables.keys.contains_key(&key) || !batch_keys.insert(key) {
                return Err(ScheduleError::ScheduleAlreadyExists);
            }
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(slots.len());
        for slot in slots {
            tables.last_schedule_id += 1;
            let schedule = FieldSchedule {
                id: tables.last_schedule_id,
                uuid: slot.uuid,
                field_id: slot.field_id,
                time_id: slot.time_id,
                date: slot.date,
                status: slot.status,
                created_at: now,
                updated_at: now,
            };
            tables.keys.insert(schedule.slot_key(), schedule.id);
            tables.schedules.insert(schedule.id, schedule.clone());
            created.push(schedule);
        }

        Ok(created)
    }

    async fn find_slots_by_field_and_date(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<FieldScheduleDetail>> {
        let tables = self.tables.read().await;
        tables
            .schedules
            .values()
            .filter(|schedule| schedule.field_id == field_id && schedule.date == date)
            .map(|schedule| tables.detail(schedule))
            .collect()
    }

    async fn find_slots_with_pagination(
        &self,
        filter: &FieldScheduleFilter,
    ) -> ScheduleResult<(Vec<FieldScheduleDetail>, u64)> {
        let tables = self.tables.read().await;

        let mut matches: Vec<&FieldSchedule> = tables
            .schedules
            .values()
            .filter(|schedule| filter.field_id.is_none_or(|id| schedule.field_id == id))
            .filter(|schedule| filter.date.is_none_or(|date| schedule.date == date))
            .filter(|schedule| filter.status.is_none_or(|status| schedule.status == status))
            .collect();

        matches.sort_by(|a, b| {
            let ordering = compare(a, b, filter.sort_column);
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let count = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|schedule| tables.detail(schedule))
            .collect::<ScheduleResult<Vec<_>>>()?;

        Ok((page, count))
    }

    async fn find_slot_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<FieldScheduleDetail>> {
        let tables = self.tables.read().await;
        tables
            .schedules
            .values()
            .find(|schedule| schedule.uuid == uuid)
            .map(|schedule| tables.detail(schedule))
            .transpose()
    }

    async fn update_slot(&self, id: i64, key: SlotKey) -> ScheduleResult<FieldSchedule> {
        let mut tables = self.tables.write().await;
        tables.check_references(&key)?;

        let current_key = tables
            .schedules
            .get(&id)
            .map(FieldSchedule::slot_key)
            .ok_or_else(|| ScheduleError::schedule_not_found(id))?;

        if let Some(&holder) = tables.keys.get(&key) {
            if holder != id {
                return Err(ScheduleError::ScheduleAlreadyExists);
            }
        }

        tables.keys.remove(&current_key);
        tables.keys.insert(key, id);

        let schedule = tables
            .schedules
            .get_mut(&id)
            .ok_or_else(|| ScheduleError::schedule_not_found(id))?;
        schedule.field_id = key.field_id;
        schedule.time_id = key.time_id;
        schedule.date = key.date;
        schedule.updated_at = Utc::now();

        Ok(schedule.clone())
    }

    async fn update_slot_status(&self, ids: &[i64], status: SlotStatus) -> ScheduleResult<u64> {
        let mut tables = self.tables.write().await;

        if let Some(missing) = ids.iter().find(|id| !tables.schedules.contains_key(*id)) {
            return Err(ScheduleError::schedule_not_found(missing));
        }

        let now = Utc::now();
        let mut updated = 0;
        for id in ids {
            if let Some(schedule) = tables.schedules.get_mut(id) {
                schedule.status = status;
                schedule.updated_at = now;
                updated += 1;
            }
        }

        Ok(updated)
    }

    async fn delete_slot(&self, id: i64) -> ScheduleResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.schedules.remove(&id) {
            Some(schedule) => {
                tables.keys.remove(&schedule.slot_key());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
