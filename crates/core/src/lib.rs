//! # Fieldslot Core
//!
//! Domain model and engine for bookable field time slots: the time and field
//! catalogs, month-ahead schedule generation, and the booking/status
//! operations that keep one slot per (field, time range, date).
//!
//! Storage is abstracted behind the traits in [`store`]; [`store::MemoryStore`]
//! is a process-local implementation and the Postgres driver lives in
//! `fieldslot-db`.

pub mod catalog;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod locale;
pub mod models;
pub mod pagination;
pub mod store;
