//! The quote acceptance workflow.
//!
//! Validation is collect-all: every required field is checked independently
//! and all violations are reported together, so a form can highlight every
//! invalid field at once rather than one per round-trip.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::quote::QuoteRow;
use crate::quotes::store::QuoteStore;

/// Accepted date format for `reloFromDate`.
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceptQuoteRequest {
    pub quote_number: Option<String>,
    pub job_id: Option<i64>,
    pub selected_costing_id: Option<String>,
    pub signature_name: Option<String>,
    pub relo_from_date: Option<String>,
    pub insured_value: Option<String>,
    pub purchase_order_number: Option<String>,
    pub special_requirements: Option<String>,
    /// Drawn-canvas image data URI, or a generated typed-signature image.
    pub signature_data: Option<String>,
    pub agreed_to_terms: bool,
}

/// The validated, parsed form of an acceptance request. Producing this type
/// is the only way past validation.
#[derive(Debug, Clone)]
pub struct AcceptanceFields {
    pub job_id: i64,
    pub selected_costing_id: String,
    pub signature_name: String,
    pub relo_from_date: NaiveDate,
    pub insured_value: String,
    pub purchase_order_number: String,
    pub special_requirements: Option<String>,
    pub signature_data: String,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Validates an acceptance request, collecting every violation. Returns the
/// parsed fields on success, or the names of all invalid fields.
pub fn validate(request: &AcceptQuoteRequest) -> Result<AcceptanceFields, Vec<String>> {
    let mut invalid = Vec::new();

    let job_id = request.job_id;
    if job_id.is_none() {
        invalid.push("jobId".to_string());
    }

    let selected_costing_id = non_empty(request.selected_costing_id.as_deref());
    if selected_costing_id.is_none() {
        invalid.push("selectedCostingId".to_string());
    }

    let signature_name = non_empty(request.signature_name.as_deref());
    if signature_name.is_none() {
        invalid.push("signatureName".to_string());
    }

    let relo_from_date = non_empty(request.relo_from_date.as_deref())
        .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());
    if relo_from_date.is_none() {
        invalid.push("reloFromDate".to_string());
    }

    let insured_value = non_empty(request.insured_value.as_deref());
    if insured_value.is_none() {
        invalid.push("insuredValue".to_string());
    }

    let purchase_order_number = non_empty(request.purchase_order_number.as_deref());
    if purchase_order_number.is_none() {
        invalid.push("purchaseOrderNumber".to_string());
    }

    let signature_data = non_empty(request.signature_data.as_deref());
    if signature_data.is_none() {
        invalid.push("signatureData".to_string());
    }

    if !request.agreed_to_terms {
        invalid.push("agreedToTerms".to_string());
    }

    match (
        job_id,
        selected_costing_id,
        signature_name,
        relo_from_date,
        insured_value,
        purchase_order_number,
        signature_data,
    ) {
        (
            Some(job_id),
            Some(selected_costing_id),
            Some(signature_name),
            Some(relo_from_date),
            Some(insured_value),
            Some(purchase_order_number),
            Some(signature_data),
        ) if invalid.is_empty() => Ok(AcceptanceFields {
            job_id,
            selected_costing_id,
            signature_name,
            relo_from_date,
            insured_value,
            purchase_order_number,
            special_requirements: non_empty(request.special_requirements.as_deref()),
            signature_data,
        }),
        _ => Err(invalid),
    }
}

/// Validates and records a customer's binding acceptance. The quote must
/// exist and still be pending; re-acceptance is rejected rather than
/// silently overwritten.
pub async fn accept_quote(
    store: &dyn QuoteStore,
    request: &AcceptQuoteRequest,
) -> Result<QuoteRow, AppError> {
    let fields = validate(request).map_err(AppError::Validation)?;

    let quote_number = non_empty(request.quote_number.as_deref());
    let quote = store
        .find_quote(quote_number.as_deref(), Some(fields.job_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quote for job {} not found", fields.job_id)))?;

    if !quote.is_pending() {
        return Err(AppError::Conflict(format!(
            "Quote {} has already been {}",
            quote.quote_number, quote.status
        )));
    }

    let accepted = store.record_acceptance(quote.id, &fields).await?;
    info!(
        "Quote {} accepted by {}",
        accepted.quote_number, fields.signature_name
    );
    Ok(accepted)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclineQuoteRequest {
    pub quote_number: Option<String>,
    pub job_id: Option<i64>,
}

/// Records a decline. Same lookup and same pending-only guard as
/// acceptance; no customer fields are required.
pub async fn decline_quote(
    store: &dyn QuoteStore,
    request: &DeclineQuoteRequest,
) -> Result<QuoteRow, AppError> {
    let quote_number = non_empty(request.quote_number.as_deref());
    if quote_number.is_none() && request.job_id.is_none() {
        return Err(AppError::invalid_fields(["jobId"]));
    }

    let quote = store
        .find_quote(quote_number.as_deref(), request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quote not found".to_string()))?;

    if !quote.is_pending() {
        return Err(AppError::Conflict(format!(
            "Quote {} has already been {}",
            quote.quote_number, quote.status
        )));
    }

    let declined = store.record_decline(quote.id).await?;
    info!("Quote {} declined", declined.quote_number);
    Ok(declined)
}
