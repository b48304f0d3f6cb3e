use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Quote lifecycle. Transitions are one-way: `pending` moves to `accepted`
/// or `declined`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Declined,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The customer-facing proposal and its acceptance state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRow {
    pub id: Uuid,
    pub quote_number: String,
    pub job_id: i64,
    pub selected_costing_id: Option<String>,
    pub accepted_by: Option<String>,
    pub relo_from_date: Option<NaiveDate>,
    pub insured_value: Option<String>,
    pub purchase_order_number: Option<String>,
    pub special_requirements: Option<String>,
    pub signature_data: Option<String>,
    pub terms_accepted: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl QuoteRow {
    pub fn is_pending(&self) -> bool {
        self.status == QuoteStatus::Pending.as_str()
    }
}
