use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Cached snapshot of one upstream job. Columns are the promoted subset of
/// the upstream payload; `raw_data` always holds the complete original
/// object so unmapped fields are never lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i64,
    pub title_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub estimated_delivery_details: Option<String>,
    pub job_value: Option<f64>,
    pub date_modified: Option<DateTime<Utc>>,
    pub brand_code: Option<String>,
    pub branch_code: Option<String>,
    pub company_code: Option<String>,

    pub measures_volume_gross_f3: Option<f64>,
    pub measures_volume_gross_m3: Option<f64>,
    pub measures_volume_net_f3: Option<f64>,
    pub measures_volume_net_m3: Option<f64>,
    pub measures_weight_gross_kg: Option<f64>,
    pub measures_weight_gross_lb: Option<f64>,
    pub measures_weight_net_kg: Option<f64>,
    pub measures_weight_net_lb: Option<f64>,

    pub uplift_line1: Option<String>,
    pub uplift_line2: Option<String>,
    pub uplift_city: Option<String>,
    pub uplift_state: Option<String>,
    pub uplift_postcode: Option<String>,
    pub uplift_country: Option<String>,

    pub delivery_line1: Option<String>,
    pub delivery_line2: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,
    pub delivery_postcode: Option<String>,
    pub delivery_country: Option<String>,

    pub raw_data: Value,
}

/// One line item of goods within a job. The set for a job is replaced
/// wholesale on force-sync, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemRow {
    pub id: i64,
    pub job_id: i64,
    pub description: Option<String>,
    pub room: Option<String>,
    pub quantity: Option<f64>,
    pub destination: Option<String>,
    pub cube: Option<f64>,
    pub type_code: Option<String>,
    pub barcode: Option<String>,
    pub raw_data: Value,
}
