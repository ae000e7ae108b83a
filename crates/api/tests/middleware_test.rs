use axum::{body::to_bytes, http::StatusCode, response::Response};
use fieldslot_api::middleware::error_handling::map_error;
use fieldslot_core::errors::ScheduleError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case(ScheduleError::NotFound("Field with ID 7 not found".into()), StatusCode::NOT_FOUND)]
#[case(ScheduleError::ScheduleAlreadyExists, StatusCode::CONFLICT)]
#[case(ScheduleError::InvalidStatus("Reserved".into()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ScheduleError::Validation("time_ids must not be empty".into()), StatusCode::BAD_REQUEST)]
#[case(ScheduleError::Storage(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn maps_errors_to_status_codes(#[case] error: ScheduleError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn error_body_carries_message() {
    let response = map_error(ScheduleError::InvalidStatus("Reserved".into()));

    assert_eq!(
        body_json(response).await,
        json!({ "error": "Invalid status: Reserved" })
    );
}

#[tokio::test]
async fn storage_details_are_not_exposed() {
    let response = map_error(ScheduleError::Storage(eyre::eyre!(
        "password authentication failed for user fieldslot"
    )));

    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal server error" })
    );
}
