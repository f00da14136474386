use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One logged body-weight measurement. Immutable once written; only deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: i64,
    pub weight: f64,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
