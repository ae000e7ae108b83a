//! Read surfaces over time ranges and fields.

use std::sync::Arc;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::{field::Field, time::TimeRange},
    pagination::{PageRequest, PaginationParams, PaginationResult},
    store::{FieldStore, TimeStore},
};

#[derive(Clone)]
pub struct TimeCatalog {
    store: Arc<dyn TimeStore>,
}

impl TimeCatalog {
    pub fn new(store: Arc<dyn TimeStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> ScheduleResult<Vec<TimeRange>> {
        self.store.find_all_times().await
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ScheduleResult<TimeRange> {
        self.store
            .find_time_by_uuid(uuid)
            .await?
            .ok_or_else(|| ScheduleError::time_not_found(uuid))
    }

    pub async fn get_by_id(&self, id: i64) -> ScheduleResult<TimeRange> {
        self.store
            .find_time_by_id(id)
            .await?
            .ok_or_else(|| ScheduleError::time_not_found(id))
    }

    /// Registers a new range under a fresh token.
    ///
    /// Overlap with existing ranges is allowed and ranges may wrap midnight.
    /// A zero-length range is rejected.
    pub async fn register(&self, start_time: NaiveTime, end_time: NaiveTime) -> ScheduleResult<TimeRange> {
        if start_time == end_time {
            return Err(ScheduleError::Validation(
                "start_time and end_time must differ".to_string(),
            ));
        }

        let time = self.store.create_time(start_time, end_time).await?;
        tracing::info!("Registered time range: uuid={}, {}", time.uuid, time.range_label());
        Ok(time)
    }
}

#[derive(Clone)]
pub struct FieldCatalog {
    store: Arc<dyn FieldStore>,
}

impl FieldCatalog {
    pub fn new(store: Arc<dyn FieldStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> ScheduleResult<Vec<Field>> {
        self.store.find_all_fields().await
    }

    pub async fn list_with_pagination(
        &self,
        params: PaginationParams,
    ) -> ScheduleResult<PaginationResult<Field>> {
        let request = PageRequest::try_from(params)?;
        let (fields, count) = self
            .store
            .find_fields_with_pagination(request.limit(), request.offset())
            .await?;
        Ok(PaginationResult::new(request, count, fields))
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Field> {
        self.store
            .find_field_by_uuid(uuid)
            .await?
            .ok_or_else(|| ScheduleError::field_not_found(uuid))
    }

    pub async fn get_by_id(&self, id: i64) -> ScheduleResult<Field> {
        self.store
            .find_field_by_id(id)
            .await?
            .ok_or_else(|| ScheduleError::field_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockTimeStore};
    use pretty_assertions::assert_eq;

    fn hour(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn registers_and_resolves_times() {
        let catalog = TimeCatalog::new(Arc::new(MemoryStore::new()));

        let first = catalog.register(hour(8), hour(9)).await.unwrap();
        let second = catalog.register(hour(8), hour(10)).await.unwrap();

        assert_ne!(first.uuid, second.uuid);
        assert_eq!(catalog.get_by_uuid(second.uuid).await.unwrap(), second);
        assert_eq!(catalog.get_by_id(first.id).await.unwrap(), first);
        assert_eq!(catalog.list_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn rejects_zero_length_range() {
        let catalog = TimeCatalog::new(Arc::new(MemoryStore::new()));
        let result = catalog.register(hour(8), hour(8)).await;
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_time_is_not_found() {
        let catalog = TimeCatalog::new(Arc::new(MemoryStore::new()));
        let result = catalog.get_by_uuid(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
    }

    #[tokio::test]
    async fn propagates_storage_failures() {
        let mut store = MockTimeStore::new();
        store
            .expect_find_all_times()
            .times(1)
            .returning(|| Err(ScheduleError::Storage(eyre::eyre!("connection reset"))));

        let catalog = TimeCatalog::new(Arc::new(store));

        assert!(matches!(catalog.list_all().await, Err(ScheduleError::Storage(_))));
    }

    #[tokio::test]
    async fn paginates_fields() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..3 {
            store.insert_field(&format!("Court {}", i), 50_000, vec![]).await;
        }
        let catalog = FieldCatalog::new(store);

        let page = catalog
            .list_with_pagination(PaginationParams { page: 2, limit: 2 })
            .await
            .unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(page.total_page, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Court 2");
    }
}
