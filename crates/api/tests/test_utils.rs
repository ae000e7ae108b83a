use std::sync::Arc;

use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime};
use fieldslot_api::{ApiState, build_router};
use fieldslot_core::{
    clock::FixedClock,
    models::{field::Field, time::TimeRange},
    store::{MemoryStore, TimeStore},
};

pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub field: Field,
    pub times: Vec<TimeRange>,
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

impl TestContext {
    /// Router over an in-memory store seeded with one field and
    /// `time_count` hourly ranges starting at 08:00.
    pub async fn new(time_count: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        let field = store
            .insert_field("Lapangan Futsal A", 150_000, vec!["a.jpg".to_string()])
            .await;

        let mut times = Vec::new();
        for offset in 0..time_count {
            let start = NaiveTime::from_hms_opt(8 + offset, 0, 0).unwrap();
            let end = NaiveTime::from_hms_opt(9 + offset, 0, 0).unwrap();
            times.push(store.create_time(start, end).await.unwrap());
        }

        let state = Arc::new(ApiState::new(store.clone(), Arc::new(FixedClock(today())), 30));
        let server = TestServer::new(build_router(state)).unwrap();

        Self {
            server,
            store,
            field,
            times,
        }
    }
}
