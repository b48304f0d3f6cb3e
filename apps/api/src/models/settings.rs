use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-company visual identity shown by the portal pages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BrandingRow {
    pub company_id: String,
    pub company_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub tertiary_color: String,
    pub font_family: String,
    pub favicon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-company hero banner content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HeroRow {
    pub company_id: String,
    pub title: String,
    pub subtitle: String,
    pub background_image_url: Option<String>,
    pub cta_button_text: String,
    pub cta_button_link: String,
    pub overlay_opacity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One editable copy block, keyed by `(company, section, key)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CopyBlockRow {
    pub company_id: String,
    pub section: String,
    pub key: String,
    pub value: String,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
