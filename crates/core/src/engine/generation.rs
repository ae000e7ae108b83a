use chrono::{Days, NaiveDate};

use super::FieldScheduleEngine;
use crate::{
    errors::{ScheduleError, ScheduleResult},
    models::field_schedule::{GenerateFieldScheduleRequest, NewFieldSchedule, SlotKey},
};

/// Dates covered by a generation run: `window_days` consecutive days
/// starting the day after `today`.
pub fn schedule_window(today: NaiveDate, window_days: u32) -> ScheduleResult<Vec<NaiveDate>> {
    if window_days == 0 {
        return Err(ScheduleError::Validation(
            "window_days must be at least 1".to_string(),
        ));
    }

    (1..=u64::from(window_days))
        .map(|offset| {
            today.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ScheduleError::Validation(format!("date window overflows after {}", today))
            })
        })
        .collect()
}

impl FieldScheduleEngine {
    /// Materializes one `Available` slot per (date, time range) for the
    /// field over the window starting tomorrow.
    ///
    /// The run is all-or-nothing: if any slot in the window already exists
    /// nothing is written and `ScheduleAlreadyExists` is returned. Returns
    /// the number of slots created.
    pub async fn generate_month(&self, request: &GenerateFieldScheduleRequest) -> ScheduleResult<usize> {
        let field = self.resolve_field(request.field_id).await?;
        let times = self.times.find_all_times().await?;

        let window_days = request.window_days.unwrap_or(self.window_days);
        let dates = schedule_window(self.clock.today(), window_days)?;

        tracing::debug!(
            "Generating schedule: field={}, days={}, times={}",
            field.uuid,
            dates.len(),
            times.len()
        );

        let mut schedules = Vec::with_capacity(dates.len() * times.len());
        for date in &dates {
            for time in &times {
                let key = SlotKey {
                    field_id: field.id,
                    time_id: time.id,
                    date: *date,
                };

                if self.slots.find_slot(key).await?.is_some() {
                    tracing::warn!(
                        "Schedule generation aborted: field={} already has a slot on {} at {}",
                        field.uuid,
                        date,
                        time.start_label()
                    );
                    return Err(ScheduleError::ScheduleAlreadyExists);
                }

                schedules.push(NewFieldSchedule::available(field.id, time.id, *date));
            }
        }

        if schedules.is_empty() {
            tracing::info!("No time ranges registered, nothing to generate for field={}", field.uuid);
            return Ok(0);
        }

        let created = self.slots.create_slots(schedules).await?;

        tracing::info!(
            "Generated {} schedules for field={} from {} to {}",
            created.len(),
            field.uuid,
            dates[0],
            dates[dates.len() - 1]
        );

        Ok(created.len())
    }
}
