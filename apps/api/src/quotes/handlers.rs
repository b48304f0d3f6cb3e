use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::quote::QuoteRow;
use crate::quotes::acceptance::{
    accept_quote, decline_quote, AcceptQuoteRequest, DeclineQuoteRequest,
};
use crate::quotes::store::QuoteStore;
use crate::routes::{ok, ApiResponse};
use crate::state::AppState;

/// POST /quotes/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    Json(request): Json<AcceptQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteRow>>, AppError> {
    tracing::info!(
        "Received quote acceptance request (quote {:?}, job {:?})",
        request.quote_number,
        request.job_id
    );
    let quote = accept_quote(state.quotes.as_ref(), &request).await?;
    Ok(ok(quote))
}

/// POST /quotes/decline
pub async fn handle_decline(
    State(state): State<AppState>,
    Json(request): Json<DeclineQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteRow>>, AppError> {
    let quote = decline_quote(state.quotes.as_ref(), &request).await?;
    Ok(ok(quote))
}

/// GET /quotes/:id
pub async fn handle_get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuoteRow>>, AppError> {
    let quote = state
        .quotes
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quote {id} not found")))?;
    Ok(ok(quote))
}
