use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use super::FieldScheduleEngine;
use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::field_schedule::{
        FieldScheduleDetail, FieldScheduleFilter, FieldScheduleForBookingResponse,
        FieldScheduleRequest, FieldScheduleRequestParam, FieldScheduleResponse, NewFieldSchedule,
        SlotKey, SlotStatus, UpdateFieldScheduleRequest, UpdateStatusBatchRequest,
    },
    pagination::{PageRequest, PaginationResult},
};

impl FieldScheduleEngine {
    /// Creates one `Available` slot per requested time range on a single date.
    ///
    /// Any conflicting member, including a time token listed twice, aborts
    /// the whole batch with `ScheduleAlreadyExists`.
    pub async fn create(&self, request: &FieldScheduleRequest) -> ScheduleResult<usize> {
        if request.time_ids.is_empty() {
            return Err(ScheduleError::Validation("time_ids must not be empty".to_string()));
        }

        let field = self.resolve_field(request.field_id).await?;

        let mut requested = HashSet::with_capacity(request.time_ids.len());
        let mut schedules = Vec::with_capacity(request.time_ids.len());
        for time_id in &request.time_ids {
            if !requested.insert(*time_id) {
                return Err(ScheduleError::ScheduleAlreadyExists);
            }

            let time = self.resolve_time(*time_id).await?;
            let key = SlotKey {
                field_id: field.id,
                time_id: time.id,
                date: request.date,
            };

            if self.slots.find_slot(key).await?.is_some() {
                tracing::warn!(
                    "Schedule creation aborted: field={} already has a slot on {} at {}",
                    field.uuid,
                    request.date,
                    time.start_label()
                );
                return Err(ScheduleError::ScheduleAlreadyExists);
            }

            schedules.push(NewFieldSchedule::available(field.id, time.id, request.date));
        }

        let created = self.slots.create_slots(schedules).await?;
        tracing::info!(
            "Created {} schedules for field={} on {}",
            created.len(),
            field.uuid,
            request.date
        );

        Ok(created.len())
    }

    /// Booking view of every slot a field has on `date`, in creation order.
    pub async fn get_all_by_field_and_date(
        &self,
        field_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<FieldScheduleForBookingResponse>> {
        let field = self.resolve_field(field_id).await?;
        let schedules = self.slots.find_slots_by_field_and_date(field.id, date).await?;

        Ok(schedules.into_iter().map(Into::into).collect())
    }

    pub async fn get_all_with_pagination(
        &self,
        params: &FieldScheduleRequestParam,
    ) -> ScheduleResult<PaginationResult<FieldScheduleResponse>> {
        let request = PageRequest::new(params.page, params.limit)?;

        let status = params
            .status
            .as_deref()
            .map(str::parse::<SlotStatus>)
            .transpose()?;

        let field_id = match params.field_id {
            Some(uuid) => Some(self.resolve_field(uuid).await?.id),
            None => None,
        };

        let filter = FieldScheduleFilter {
            field_id,
            date: params.date,
            status,
            sort_column: params.sort_column.unwrap_or_default(),
            sort_order: params.sort_order.unwrap_or_default(),
            limit: request.limit(),
            offset: request.offset(),
        };

        let (schedules, count) = self.slots.find_slots_with_pagination(&filter).await?;
        Ok(PaginationResult::new(request, count, schedules).map(Into::into))
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> ScheduleResult<FieldScheduleResponse> {
        Ok(self.resolve_schedule(uuid).await?.into())
    }

    /// Overwrites a slot's status. Any recognized status may follow any other.
    pub async fn update_status(&self, uuid: Uuid, status: &str) -> ScheduleResult<()> {
        let status: SlotStatus = status.parse()?;
        let detail = self.resolve_schedule(uuid).await?;

        self.slots
            .update_slot_status(&[detail.schedule.id], status)
            .await?;

        tracing::debug!("Updated schedule status: uuid={}, status={}", uuid, status);
        Ok(())
    }

    /// Sets one status on several slots. Every token must resolve before
    /// any slot changes.
    pub async fn update_status_batch(&self, request: &UpdateStatusBatchRequest) -> ScheduleResult<u64> {
        let status: SlotStatus = request.status.parse()?;
        if request.field_schedule_ids.is_empty() {
            return Err(ScheduleError::Validation(
                "field_schedule_ids must not be empty".to_string(),
            ));
        }

        let mut ids = Vec::with_capacity(request.field_schedule_ids.len());
        for uuid in &request.field_schedule_ids {
            let id = self.resolve_schedule(*uuid).await?.schedule.id;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let updated = self.slots.update_slot_status(&ids, status).await?;
        tracing::info!("Updated {} schedules to status={}", updated, status);
        Ok(updated)
    }

    /// Moves a slot to another field, time range or date.
    ///
    /// The new tuple is checked against every slot except this one.
    pub async fn update(
        &self,
        uuid: Uuid,
        request: &UpdateFieldScheduleRequest,
    ) -> ScheduleResult<FieldScheduleResponse> {
        let current = self.resolve_schedule(uuid).await?;

        let field = match request.field_id {
            Some(field_id) if field_id != current.field.uuid => self.resolve_field(field_id).await?,
            _ => current.field.clone(),
        };
        let time = match request.time_id {
            Some(time_id) if time_id != current.time.uuid => self.resolve_time(time_id).await?,
            _ => current.time.clone(),
        };
        let key = SlotKey {
            field_id: field.id,
            time_id: time.id,
            date: request.date.unwrap_or(current.schedule.date),
        };

        if key == current.schedule.slot_key() {
            return Ok(current.into());
        }

        if let Some(existing) = self.slots.find_slot(key).await? {
            if existing.id != current.schedule.id {
                return Err(ScheduleError::ScheduleAlreadyExists);
            }
        }

        let schedule = self.slots.update_slot(current.schedule.id, key).await?;
        tracing::debug!(
            "Updated schedule: uuid={}, field={}, date={}, time={}",
            uuid,
            field.uuid,
            schedule.date,
            time.start_label()
        );

        Ok(FieldScheduleDetail {
            schedule,
            field,
            time,
        }
        .into())
    }

    pub async fn delete(&self, uuid: Uuid) -> ScheduleResult<()> {
        let detail = self.resolve_schedule(uuid).await?;

        if !self.slots.delete_slot(detail.schedule.id).await? {
            return Err(ScheduleError::schedule_not_found(uuid));
        }

        tracing::debug!("Deleted schedule: uuid={}", uuid);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        clock::FixedClock,
        engine::test_support::{date, fixture, hour},
        models::field_schedule::{GenerateFieldScheduleRequest, SortColumn, SortOrder},
        store::{MemoryStore, MockSlotStore, TimeStore},
    };

    fn create_request(field_id: Uuid, day: &str, time_ids: Vec<Uuid>) -> FieldScheduleRequest {
        FieldScheduleRequest {
            field_id,
            date: date(day),
            time_ids,
        }
    }

    #[tokio::test]
    async fn creates_one_slot_per_time() {
        let fx = fixture(2).await;
        let request = create_request(
            fx.field.uuid,
            "2025-03-10",
            vec![fx.times[0].uuid, fx.times[1].uuid],
        );

        assert_eq!(fx.engine.create(&request).await.unwrap(), 2);
        assert_eq!(fx.store.slot_count().await, 2);
    }

    #[tokio::test]
    async fn repeated_create_fails_entirely() {
        let fx = fixture(3).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();

        // times[1] is free, times[0] is not: nothing may be written
        let result = fx
            .engine
            .create(&create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[1].uuid, fx.times[0].uuid],
            ))
            .await;

        assert!(matches!(result, Err(ScheduleError::ScheduleAlreadyExists)));
        assert_eq!(fx.store.slot_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_time_in_batch_is_a_conflict() {
        let fx = fixture(1).await;
        let result = fx
            .engine
            .create(&create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[0].uuid, fx.times[0].uuid],
            ))
            .await;

        assert!(matches!(result, Err(ScheduleError::ScheduleAlreadyExists)));
        assert_eq!(fx.store.slot_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_time_aborts_batch() {
        let fx = fixture(1).await;
        let result = fx
            .engine
            .create(&create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[0].uuid, Uuid::new_v4()],
            ))
            .await;

        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
        assert_eq!(fx.store.slot_count().await, 0);
    }

    #[tokio::test]
    async fn empty_time_list_is_rejected() {
        let fx = fixture(1).await;
        let result = fx
            .engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![]))
            .await;

        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[tokio::test]
    async fn booking_view_is_in_creation_order() {
        let fx = fixture(3).await;
        fx.engine
            .create(&create_request(
                fx.field.uuid,
                "2025-08-17",
                vec![fx.times[2].uuid, fx.times[0].uuid],
            ))
            .await
            .unwrap();

        let views = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-08-17"))
            .await
            .unwrap();

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].time, "10:00:00");
        assert_eq!(views[1].time, "08:00:00");
        assert_eq!(views[0].date, "17 Agu");
        assert_eq!(views[0].status, "Available");
        assert_eq!(views[0].price_per_hour, "Rp. 150.000");
    }

    #[tokio::test]
    async fn booking_view_requires_known_field() {
        let fx = fixture(1).await;
        let result = fx
            .engine
            .get_all_by_field_and_date(Uuid::new_v4(), date("2025-03-10"))
            .await;

        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
    }

    #[tokio::test]
    async fn paginates_matching_slots() {
        let fx = fixture(5).await;
        fx.engine
            .generate_month(&GenerateFieldScheduleRequest {
                field_id: fx.field.uuid,
                window_days: Some(5),
            })
            .await
            .unwrap();

        let mut params = FieldScheduleRequestParam {
            page: 1,
            limit: 10,
            field_id: Some(fx.field.uuid),
            ..Default::default()
        };
        let page = fx.engine.get_all_with_pagination(&params).await.unwrap();
        assert_eq!(page.count, 25);
        assert_eq!(page.total_page, 3);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].field_name, "Lapangan Futsal A");
        assert_eq!(page.data[0].time, "08:00:00 - 09:00:00");

        params.page = 3;
        assert_eq!(fx.engine.get_all_with_pagination(&params).await.unwrap().data.len(), 5);

        params.page = 4;
        let past_end = fx.engine.get_all_with_pagination(&params).await.unwrap();
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.count, 25);
    }

    #[tokio::test]
    async fn filters_by_date_and_status() {
        let fx = fixture(2).await;
        fx.engine
            .generate_month(&GenerateFieldScheduleRequest {
                field_id: fx.field.uuid,
                window_days: Some(3),
            })
            .await
            .unwrap();

        let views = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-03"))
            .await
            .unwrap();
        fx.engine.update_status(views[0].uuid, "Booked").await.unwrap();

        let params = FieldScheduleRequestParam {
            date: Some(date("2025-03-03")),
            status: Some("Booked".to_string()),
            ..Default::default()
        };
        let page = fx.engine.get_all_with_pagination(&params).await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].uuid, views[0].uuid);
        assert_eq!(page.data[0].date, "2025-03-03");
    }

    #[tokio::test]
    async fn sorts_by_date_descending() {
        let fx = fixture(1).await;
        fx.engine
            .generate_month(&GenerateFieldScheduleRequest {
                field_id: fx.field.uuid,
                window_days: Some(3),
            })
            .await
            .unwrap();

        let params = FieldScheduleRequestParam {
            sort_column: Some(SortColumn::Date),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let page = fx.engine.get_all_with_pagination(&params).await.unwrap();
        let dates: Vec<_> = page.data.iter().map(|view| view.date.as_str()).collect();

        assert_eq!(dates, vec!["2025-03-04", "2025-03-03", "2025-03-02"]);
    }

    #[tokio::test]
    async fn invalid_status_filter_is_rejected() {
        let fx = fixture(1).await;
        let params = FieldScheduleRequestParam {
            status: Some("Cancelled".to_string()),
            ..Default::default()
        };

        let result = fx.engine.get_all_with_pagination(&params).await;
        assert!(matches!(result, Err(ScheduleError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn zero_page_is_rejected() {
        let fx = fixture(1).await;
        let params = FieldScheduleRequestParam {
            page: 0,
            ..Default::default()
        };

        let result = fx.engine.get_all_with_pagination(&params).await;
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[tokio::test]
    async fn status_update_round_trips() {
        let fx = fixture(1).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
        let uuid = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()[0]
            .uuid;

        fx.engine.update_status(uuid, "Booked").await.unwrap();
        assert_eq!(fx.engine.get_by_uuid(uuid).await.unwrap().status, "Booked");

        let result = fx.engine.update_status(uuid, "Reserved").await;
        assert!(matches!(result, Err(ScheduleError::InvalidStatus(_))));
        assert_eq!(fx.engine.get_by_uuid(uuid).await.unwrap().status, "Booked");

        fx.engine.update_status(uuid, "Available").await.unwrap();
        assert_eq!(fx.engine.get_by_uuid(uuid).await.unwrap().status, "Available");
    }

    #[tokio::test]
    async fn batch_status_update_requires_every_slot() {
        let fx = fixture(2).await;
        fx.engine
            .create(&create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[0].uuid, fx.times[1].uuid],
            ))
            .await
            .unwrap();
        let views = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap();

        let missing = UpdateStatusBatchRequest {
            field_schedule_ids: vec![views[0].uuid, Uuid::new_v4()],
            status: "Booked".to_string(),
        };
        assert!(matches!(
            fx.engine.update_status_batch(&missing).await,
            Err(ScheduleError::NotFound(_))
        ));
        assert_eq!(fx.engine.get_by_uuid(views[0].uuid).await.unwrap().status, "Available");

        let request = UpdateStatusBatchRequest {
            field_schedule_ids: vec![views[0].uuid, views[1].uuid, views[0].uuid],
            status: "Booked".to_string(),
        };
        assert_eq!(fx.engine.update_status_batch(&request).await.unwrap(), 2);
        assert_eq!(fx.engine.get_by_uuid(views[1].uuid).await.unwrap().status, "Booked");
    }

    #[tokio::test]
    async fn update_moves_slot_to_free_tuple() {
        let fx = fixture(2).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
        let uuid = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()[0]
            .uuid;

        let updated = fx
            .engine
            .update(
                uuid,
                &UpdateFieldScheduleRequest {
                    time_id: Some(fx.times[1].uuid),
                    date: Some(date("2025-03-11")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.uuid, uuid);
        assert_eq!(updated.date, "2025-03-11");
        assert_eq!(updated.time, "09:00:00 - 10:00:00");
        assert!(fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_rejects_occupied_tuple() {
        let fx = fixture(2).await;
        fx.engine
            .create(&create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[0].uuid, fx.times[1].uuid],
            ))
            .await
            .unwrap();
        let views = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap();

        let result = fx
            .engine
            .update(
                views[0].uuid,
                &UpdateFieldScheduleRequest {
                    time_id: Some(fx.times[1].uuid),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ScheduleError::ScheduleAlreadyExists)));
        assert_eq!(fx.engine.get_by_uuid(views[0].uuid).await.unwrap().time, "08:00:00 - 09:00:00");
    }

    #[tokio::test]
    async fn update_to_own_tuple_is_a_no_op() {
        let fx = fixture(1).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
        let uuid = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()[0]
            .uuid;

        let updated = fx
            .engine
            .update(
                uuid,
                &UpdateFieldScheduleRequest {
                    field_id: Some(fx.field.uuid),
                    time_id: Some(fx.times[0].uuid),
                    date: Some(date("2025-03-10")),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.date, "2025-03-10");
    }

    #[tokio::test]
    async fn update_to_unknown_field_is_not_found() {
        let fx = fixture(1).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
        let uuid = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()[0]
            .uuid;

        let result = fx
            .engine
            .update(
                uuid,
                &UpdateFieldScheduleRequest {
                    field_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ScheduleError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_slot() {
        let fx = fixture(1).await;
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
        let uuid = fx
            .engine
            .get_all_by_field_and_date(fx.field.uuid, date("2025-03-10"))
            .await
            .unwrap()[0]
            .uuid;

        fx.engine.delete(uuid).await.unwrap();

        assert!(matches!(fx.engine.get_by_uuid(uuid).await, Err(ScheduleError::NotFound(_))));
        assert!(matches!(fx.engine.delete(uuid).await, Err(ScheduleError::NotFound(_))));

        // the tuple is free again
        fx.engine
            .create(&create_request(fx.field.uuid, "2025-03-10", vec![fx.times[0].uuid]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_by_unknown_uuid_is_not_found() {
        let fx = fixture(1).await;
        assert!(matches!(
            fx.engine.get_by_uuid(Uuid::new_v4()).await,
            Err(ScheduleError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_creates_book_slot_once() {
        let fx = fixture(2).await;

        let mut handles = Vec::new();
        for _ in 0..6 {
            let engine = fx.engine.clone();
            let request = create_request(
                fx.field.uuid,
                "2025-03-10",
                vec![fx.times[0].uuid, fx.times[1].uuid],
            );
            handles.push(tokio::spawn(async move { engine.create(&request).await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(fx.store.slot_count().await, 2);
    }

    #[tokio::test]
    async fn storage_failure_during_listing_propagates() {
        let store = Arc::new(MemoryStore::new());
        store.create_time(hour(8), hour(9)).await.unwrap();

        let mut slots = MockSlotStore::new();
        slots
            .expect_find_slots_with_pagination()
            .times(1)
            .returning(|_| Err(ScheduleError::Storage(eyre::eyre!("pool timed out"))));

        let engine = FieldScheduleEngine::new(
            store.clone(),
            store.clone(),
            Arc::new(slots),
            Arc::new(FixedClock(date("2025-03-01"))),
        );

        let result = engine
            .get_all_with_pagination(&FieldScheduleRequestParam::default())
            .await;
        assert!(matches!(result, Err(ScheduleError::Storage(_))));
    }
}
