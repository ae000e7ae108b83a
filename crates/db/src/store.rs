use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use eyre::Report;
use fieldslot_core::{
    errors::{ScheduleError, ScheduleResult},
    models::{
        field::Field,
        field_schedule::{
            FieldSchedule, FieldScheduleDetail, FieldScheduleFilter, NewFieldSchedule, SlotKey,
            SlotStatus,
        },
        time::TimeRange,
    },
    store::{FieldStore, SlotStore, TimeStore},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{field, field_schedule, time},
};

const UNIQUE_VIOLATION: &str = "23505";
const SLOT_UNIQUE_CONSTRAINT: &str = "uq_field_schedules_field_time_date";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres-backed store. Slot uniqueness is enforced by the
/// `uq_field_schedules_field_time_date` constraint.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Maps a repository error onto the domain error taxonomy.
fn classify(err: Report) -> ScheduleError {
    let (code, constraint) = match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => (
            db_err.code().map(|code| code.into_owned()),
            db_err.constraint().map(str::to_string),
        ),
        _ => (None, None),
    };

    match (code.as_deref(), constraint.as_deref()) {
        (Some(UNIQUE_VIOLATION), Some(SLOT_UNIQUE_CONSTRAINT)) => {
            tracing::debug!("Unique violation on field_schedules: {}", err);
            ScheduleError::ScheduleAlreadyExists
        }
        (Some(FOREIGN_KEY_VIOLATION), _) => {
            tracing::debug!("Foreign key violation on field_schedules: {}", err);
            ScheduleError::NotFound("Referenced field or time does not exist".to_string())
        }
        _ => ScheduleError::Storage(err),
    }
}

fn to_count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

#[async_trait]
impl TimeStore for PgStore {
    async fn find_all_times(&self) -> ScheduleResult<Vec<TimeRange>> {
        let rows = time::get_all_times(&self.pool).await.map_err(classify)?;
        Ok(rows.into_iter().map(TimeRange::from).collect())
    }

    async fn find_time_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<TimeRange>> {
        let row = time::get_time_by_uuid(&self.pool, uuid)
            .await
            .map_err(classify)?;
        Ok(row.map(TimeRange::from))
    }

    async fn find_time_by_id(&self, id: i64) -> ScheduleResult<Option<TimeRange>> {
        let row = time::get_time_by_id(&self.pool, id).await.map_err(classify)?;
        Ok(row.map(TimeRange::from))
    }

    async fn create_time(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> ScheduleResult<TimeRange> {
        let row = time::create_time(&self.pool, start_time, end_time)
            .await
            .map_err(classify)?;
        Ok(row.into())
    }
}

#[async_trait]
impl FieldStore for PgStore {
    async fn find_all_fields(&self) -> ScheduleResult<Vec<Field>> {
        let rows = field::get_all_fields(&self.pool).await.map_err(classify)?;
        Ok(rows.into_iter().map(Field::from).collect())
    }

    async fn find_fields_with_pagination(
        &self,
        limit: u64,
        offset: u64,
    ) -> ScheduleResult<(Vec<Field>, u64)> {
        let (rows, total) = field::get_fields_with_pagination(&self.pool, limit, offset)
            .await
            .map_err(classify)?;
        Ok((rows.into_iter().map(Field::from).collect(), to_count(total)))
    }

    async fn find_field_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<Field>> {
        let row = field::get_field_by_uuid(&self.pool, uuid)
            .await
            .map_err(classify)?;
        Ok(row.map(Field::from))
    }

    async fn find_field_by_id(&self, id: i64) -> ScheduleResult<Option<Field>> {
        let row = field::get_field_by_id(&self.pool, id)
            .await
            .map_err(classify)?;
        Ok(row.map(Field::from))
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn find_slot(&self, key: SlotKey) -> ScheduleResult<Option<FieldSchedule>> {
        field_schedule::get_field_schedule_by_slot(&self.pool, key)
            .await
            .map_err(classify)?
            .map(FieldSchedule::try_from)
            .transpose()
    }

    async fn create_slots(
        &self,
        slots: Vec<NewFieldSchedule>,
    ) -> ScheduleResult<Vec<FieldSchedule>> {
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        let rows = field_schedule::create_field_schedules(&self.pool, &slots)
            .await
            .map_err(classify)?;
        rows.into_iter().map(FieldSchedule::try_from).collect()
    }

    async fn find_slots_by_field_and_date(
        &self,
        field_id: i64,
        date: NaiveDate,
    ) -> ScheduleResult<Vec<FieldScheduleDetail>> {
        let rows = field_schedule::get_field_schedules_by_field_and_date(&self.pool, field_id, date)
            .await
            .map_err(classify)?;
        rows.into_iter().map(FieldScheduleDetail::try_from).collect()
    }

    async fn find_slots_with_pagination(
        &self,
        filter: &FieldScheduleFilter,
    ) -> ScheduleResult<(Vec<FieldScheduleDetail>, u64)> {
        let (rows, total) = field_schedule::get_field_schedules_with_pagination(&self.pool, filter)
            .await
            .map_err(classify)?;
        let details = rows
            .into_iter()
            .map(FieldScheduleDetail::try_from)
            .collect::<ScheduleResult<Vec<_>>>()?;
        Ok((details, to_count(total)))
    }

    async fn find_slot_by_uuid(&self, uuid: Uuid) -> ScheduleResult<Option<FieldScheduleDetail>> {
        field_schedule::get_field_schedule_by_uuid(&self.pool, uuid)
            .await
            .map_err(classify)?
            .map(FieldScheduleDetail::try_from)
            .transpose()
    }

    async fn update_slot(&self, id: i64, key: SlotKey) -> ScheduleResult<FieldSchedule> {
        field_schedule::update_field_schedule(&self.pool, id, key)
            .await
            .map_err(classify)?
            .ok_or_else(|| ScheduleError::schedule_not_found(id))
            .and_then(FieldSchedule::try_from)
    }

    async fn update_slot_status(&self, ids: &[i64], status: SlotStatus) -> ScheduleResult<u64> {
        let updated = field_schedule::update_field_schedule_status(&self.pool, ids, status.code())
            .await
            .map_err(classify)?;

        if updated != ids.len() as u64 {
            tracing::warn!(
                "Status update matched {} of {} field schedules, rolled back",
                updated,
                ids.len()
            );
            return Err(ScheduleError::NotFound(
                "One or more field schedules not found".to_string(),
            ));
        }

        Ok(updated)
    }

    async fn delete_slot(&self, id: i64) -> ScheduleResult<bool> {
        field_schedule::delete_field_schedule(&self.pool, id)
            .await
            .map_err(classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    #[derive(Debug)]
    struct PgFailure {
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for PgFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.code)
        }
    }

    impl StdError for PgFailure {}

    impl DatabaseError for PgFailure {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    fn database_error(code: &'static str, constraint: Option<&'static str>) -> Report {
        Report::new(sqlx::Error::Database(Box::new(PgFailure { code, constraint })))
    }

    #[test]
    fn slot_constraint_violation_is_already_exists() {
        let err = classify(database_error(UNIQUE_VIOLATION, Some(SLOT_UNIQUE_CONSTRAINT)));
        assert!(matches!(err, ScheduleError::ScheduleAlreadyExists));
    }

    #[test]
    fn other_unique_violations_are_storage_errors() {
        let err = classify(database_error(UNIQUE_VIOLATION, Some("field_schedules_uuid_key")));
        assert!(matches!(err, ScheduleError::Storage(_)));

        let err = classify(database_error(UNIQUE_VIOLATION, None));
        assert!(matches!(err, ScheduleError::Storage(_)));
    }

    #[test]
    fn foreign_key_violation_is_not_found() {
        let err = classify(database_error(FOREIGN_KEY_VIOLATION, Some("field_schedules_field_id_fkey")));
        assert!(matches!(err, ScheduleError::NotFound(_)));
    }

    #[test]
    fn plain_reports_are_storage_errors() {
        let err = classify(eyre!("connection reset"));
        assert!(matches!(err, ScheduleError::Storage(_)));
    }

    #[test]
    fn non_database_sqlx_errors_are_storage_errors() {
        let err = classify(Report::new(sqlx::Error::RowNotFound));
        assert!(matches!(err, ScheduleError::Storage(_)));
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(to_count(-1), 0);
        assert_eq!(to_count(42), 42);
    }
}
