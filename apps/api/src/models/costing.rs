use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A priced service option in a company's costing catalog. Per-job
/// associations are inferred by query (active items for the job's company);
/// the customer's selection is recorded on the quote, not here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CostingItemRow {
    pub id: String,
    pub company_id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub total_price: f64,
    pub tax_included: bool,
    /// JSON arrays of strings.
    pub inclusions: Value,
    pub exclusions: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CostingCategoryRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sort_order: i32,
}
