pub mod health;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::costings;
use crate::errors::AppError;
use crate::moveware::CompanyId;
use crate::quotes;
use crate::settings;
use crate::state::AppState;
use crate::sync;

/// Standard success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

/// Query parameters carrying the company scope. `coId` is required wherever
/// this extractor is used; `require_company` reports its absence as a
/// validation error on that field.
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    #[serde(rename = "coId")]
    pub co_id: Option<String>,
}

pub fn require_company(query: &CompanyQuery) -> Result<CompanyId, AppError> {
    match query.co_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(CompanyId::from(id)),
        _ => Err(AppError::invalid_fields(["coId"])),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs: cache-aside reads and force-sync
        .route("/jobs/:job_id", get(sync::handlers::handle_get_job))
        .route(
            "/jobs/:job_id/inventory",
            get(sync::handlers::handle_get_inventory),
        )
        .route(
            "/jobs/:job_id/questions",
            get(sync::handlers::handle_get_questions),
        )
        .route(
            "/jobs/:job_id/costings",
            get(costings::handlers::handle_job_costings),
        )
        .route("/jobs/:job_id/sync", post(sync::handlers::handle_force_sync))
        .route("/review/submit", post(sync::handlers::handle_submit_review))
        // Quotes: acceptance workflow
        .route("/quotes/accept", post(quotes::handlers::handle_accept))
        .route("/quotes/decline", post(quotes::handlers::handle_decline))
        .route("/quotes/:id", get(quotes::handlers::handle_get_quote))
        // Costing catalog maintenance
        .route(
            "/costings",
            get(costings::handlers::handle_list_catalog)
                .post(costings::handlers::handle_create_item),
        )
        .route(
            "/costings/categories",
            get(costings::handlers::handle_list_categories),
        )
        .route(
            "/costings/:item_id",
            axum::routing::patch(costings::handlers::handle_update_item)
                .delete(costings::handlers::handle_delete_item),
        )
        // Per-company presentation settings
        .route(
            "/settings/branding",
            get(settings::handlers::handle_get_branding)
                .put(settings::handlers::handle_put_branding),
        )
        .route(
            "/settings/hero",
            get(settings::handlers::handle_get_hero).put(settings::handlers::handle_put_hero),
        )
        .route(
            "/settings/copy",
            get(settings::handlers::handle_get_copy).put(settings::handlers::handle_put_copy),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_company_accepts_id() {
        let query = CompanyQuery {
            co_id: Some("65700".to_string()),
        };
        assert_eq!(require_company(&query).unwrap().as_str(), "65700");
    }

    #[test]
    fn test_require_company_rejects_missing_and_blank() {
        for co_id in [None, Some(String::new()), Some("   ".to_string())] {
            let err = require_company(&CompanyQuery { co_id }).unwrap_err();
            match err {
                AppError::Validation(fields) => assert_eq!(fields, vec!["coId"]),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }
}
