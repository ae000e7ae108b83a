use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable physical field. Owned outside the engine, which only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    /// Hourly price in whole currency units.
    pub price_per_hour: i64,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResponse {
    pub uuid: Uuid,
    pub name: String,
    pub price_per_hour: i64,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Field> for FieldResponse {
    fn from(field: Field) -> Self {
        Self {
            uuid: field.uuid,
            name: field.name,
            price_per_hour: field.price_per_hour,
            images: field.images,
            created_at: field.created_at,
            updated_at: field.updated_at,
        }
    }
}
