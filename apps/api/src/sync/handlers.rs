use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::job::{InventoryItemRow, JobRow};
use crate::routes::{ok, require_company, ApiResponse, CompanyQuery};
use crate::state::AppState;
use crate::sync::questions::{normalize_questions, Question};
use crate::sync::service::{self, SyncReport};
use crate::sync::upstream::{CompanyUpstream, UpstreamJobs};

/// GET /jobs/:job_id?coId=
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<JobRow>>, AppError> {
    let company = require_company(&query)?;
    let upstream = CompanyUpstream::new(state.moveware.clone(), company);
    let job = service::get_job(state.jobs.as_ref(), &upstream, job_id).await?;
    Ok(ok(job))
}

/// GET /jobs/:job_id/inventory?coId=
pub async fn handle_get_inventory(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<InventoryItemRow>>>, AppError> {
    let company = require_company(&query)?;
    let upstream = CompanyUpstream::new(state.moveware.clone(), company);
    let items = service::get_inventory(state.jobs.as_ref(), &upstream, job_id).await?;
    Ok(ok(items))
}

/// GET /jobs/:job_id/questions?coId=
///
/// Proxied from upstream on every request; questions are not cached.
pub async fn handle_get_questions(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<Vec<Question>>>, AppError> {
    let company = require_company(&query)?;
    let upstream = CompanyUpstream::new(state.moveware.clone(), company);
    let raw = upstream.fetch_questions(job_id).await?;
    Ok(ok(normalize_questions(&raw)))
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub synced: SyncReport,
}

/// POST /jobs/:job_id/sync?coId=
///
/// Force resynchronization. Partial success is a 200 with the failed step's
/// reason in `synced.errors`; the request fails only when both steps failed.
pub async fn handle_force_sync(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<SyncResponse>, AppError> {
    let company = require_company(&query)?;
    let upstream = CompanyUpstream::new(state.moveware.clone(), company.clone());

    tracing::info!("Force sync requested for job {job_id} (company {company})");
    let report = service::force_sync(state.jobs.as_ref(), &upstream, job_id).await;

    if report.failed() {
        return Err(AppError::Sync {
            errors: report.errors,
        });
    }
    Ok(Json(SyncResponse {
        success: true,
        synced: report,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReviewRequest {
    pub job_id: Option<i64>,
    pub token: Option<String>,
    pub brand: Option<String>,
    pub answers: Option<Value>,
}

/// POST /review/submit?coId=
///
/// Forwards a completed performance review to the upstream reviews endpoint
/// for the job. Nothing is persisted locally.
pub async fn handle_submit_review(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let company = require_company(&query)?;

    let mut invalid = Vec::new();
    if request.job_id.is_none() {
        invalid.push("jobId");
    }
    if request.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        invalid.push("token");
    }
    if request.answers.is_none() {
        invalid.push("answers");
    }
    if !invalid.is_empty() {
        return Err(AppError::invalid_fields(invalid));
    }
    let job_id = request.job_id.unwrap_or_default();

    let client = state.moveware.client(company)?;
    let payload = json!({
        "token": request.token,
        "brand": request.brand,
        "answers": request.answers,
    });
    let response: Value = client
        .post(&format!("/jobs/{job_id}/reviews"), &payload)
        .await?;

    tracing::info!("Performance review submitted for job {job_id}");
    Ok(ok(response))
}
