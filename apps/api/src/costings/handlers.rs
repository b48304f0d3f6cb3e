use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::costings::catalog;
use crate::costings::totals::line_total;
use crate::errors::AppError;
use crate::models::costing::{CostingCategoryRow, CostingItemRow};
use crate::routes::{ok, require_company, ApiResponse, CompanyQuery};
use crate::state::AppState;

/// GET /jobs/:job_id/costings?coId=
///
/// The customer-facing costing options for a job: the active catalog of the
/// job's company. Associations are inferred by query, not stored per job.
pub async fn handle_job_costings(
    State(state): State<AppState>,
    Path(_job_id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<CostingItemRow>>>, AppError> {
    let company = require_company(&query)?;
    let items = catalog::list_catalog(&state.db, &company, true).await?;
    Ok(ok(items))
}

/// GET /costings?coId=
pub async fn handle_list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<CostingItemRow>>>, AppError> {
    let company = require_company(&query)?;
    let items = catalog::list_catalog(&state.db, &company, false).await?;
    Ok(ok(items))
}

/// GET /costings/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CostingCategoryRow>>>, AppError> {
    let categories = catalog::list_categories(&state.db).await?;
    Ok(ok(categories))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCostingRequest {
    pub id: Option<String>,
    pub category_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub quantity: Option<f64>,
    pub rate: Option<f64>,
    #[serde(default)]
    pub tax_included: bool,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// POST /costings?coId=
pub async fn handle_create_item(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(request): Json<CreateCostingRequest>,
) -> Result<Json<ApiResponse<CostingItemRow>>, AppError> {
    let company = require_company(&query)?;

    let mut invalid = Vec::new();
    if request.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        invalid.push("name");
    }
    if request.rate.is_none() {
        invalid.push("rate");
    }
    if !invalid.is_empty() {
        return Err(AppError::invalid_fields(invalid));
    }

    let quantity = request.quantity.unwrap_or(1.0);
    let rate = request.rate.unwrap_or_default();
    let now = Utc::now();
    let item = CostingItemRow {
        id: request
            .id
            .unwrap_or_else(|| format!("item-{}", Uuid::new_v4())),
        company_id: company.as_str().to_string(),
        category_id: request.category_id,
        name: request.name.unwrap_or_default(),
        description: request.description,
        quantity,
        rate,
        total_price: line_total(quantity, rate),
        tax_included: request.tax_included,
        inclusions: json!(request.inclusions),
        exclusions: json!(request.exclusions),
        is_active: request.is_active,
        created_at: now,
        updated_at: now,
    };

    let stored = catalog::upsert_item(&state.db, &item).await?;
    Ok(ok(stored))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCostingRequest {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub rate: Option<f64>,
    pub tax_included: Option<bool>,
    pub inclusions: Option<Vec<String>>,
    pub exclusions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// PATCH /costings/:item_id
///
/// Partial update: absent fields keep their current values. The total is
/// recomputed whenever quantity or rate changes.
pub async fn handle_update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateCostingRequest>,
) -> Result<Json<ApiResponse<CostingItemRow>>, AppError> {
    let mut item = catalog::find_item(&state.db, &item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Costing item {item_id} not found")))?;

    if let Some(category_id) = request.category_id {
        item.category_id = Some(category_id);
    }
    if let Some(name) = request.name {
        item.name = name;
    }
    if let Some(description) = request.description {
        item.description = description;
    }
    if let Some(quantity) = request.quantity {
        item.quantity = quantity;
    }
    if let Some(rate) = request.rate {
        item.rate = rate;
    }
    if let Some(tax_included) = request.tax_included {
        item.tax_included = tax_included;
    }
    if let Some(inclusions) = request.inclusions {
        item.inclusions = json!(inclusions);
    }
    if let Some(exclusions) = request.exclusions {
        item.exclusions = json!(exclusions);
    }
    if let Some(is_active) = request.is_active {
        item.is_active = is_active;
    }
    item.total_price = line_total(item.quantity, item.rate);

    let stored = catalog::upsert_item(&state.db, &item).await?;
    Ok(ok(stored))
}

/// DELETE /costings/:item_id
pub async fn handle_delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !catalog::delete_item(&state.db, &item_id).await? {
        return Err(AppError::NotFound(format!(
            "Costing item {item_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
