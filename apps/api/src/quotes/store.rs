use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::quote::{QuoteRow, QuoteStatus};
use crate::quotes::acceptance::AcceptanceFields;

/// Persistence seam for quotes. Quotes are created out-of-band (seeded when
/// a customer enters the quote flow); this store only reads them and records
/// the accept/decline transition.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRow>, AppError>;

    /// Exact-match lookup by quote number when given, else the most recent
    /// quote for the job.
    async fn find_quote(
        &self,
        quote_number: Option<&str>,
        job_id: Option<i64>,
    ) -> Result<Option<QuoteRow>, AppError>;

    /// Applies the acceptance in a single update and returns the new row.
    async fn record_acceptance(
        &self,
        id: Uuid,
        fields: &AcceptanceFields,
    ) -> Result<QuoteRow, AppError>;

    async fn record_decline(&self, id: Uuid) -> Result<QuoteRow, AppError>;
}

pub struct PgQuoteStore {
    pool: PgPool,
}

impl PgQuoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteRow>, AppError> {
        Ok(
            sqlx::query_as::<_, QuoteRow>("SELECT * FROM quotes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_quote(
        &self,
        quote_number: Option<&str>,
        job_id: Option<i64>,
    ) -> Result<Option<QuoteRow>, AppError> {
        if let Some(quote_number) = quote_number {
            return Ok(sqlx::query_as::<_, QuoteRow>(
                "SELECT * FROM quotes WHERE quote_number = $1",
            )
            .bind(quote_number)
            .fetch_optional(&self.pool)
            .await?);
        }
        if let Some(job_id) = job_id {
            return Ok(sqlx::query_as::<_, QuoteRow>(
                "SELECT * FROM quotes WHERE job_id = $1 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?);
        }
        Ok(None)
    }

    async fn record_acceptance(
        &self,
        id: Uuid,
        fields: &AcceptanceFields,
    ) -> Result<QuoteRow, AppError> {
        Ok(sqlx::query_as::<_, QuoteRow>(
            r#"
            UPDATE quotes SET
                status = $2,
                terms_accepted = true,
                accepted_at = now(),
                accepted_by = $3,
                signature_data = $4,
                selected_costing_id = $5,
                relo_from_date = $6,
                insured_value = $7,
                purchase_order_number = $8,
                special_requirements = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(QuoteStatus::Accepted.as_str())
        .bind(&fields.signature_name)
        .bind(&fields.signature_data)
        .bind(&fields.selected_costing_id)
        .bind(fields.relo_from_date)
        .bind(&fields.insured_value)
        .bind(&fields.purchase_order_number)
        .bind(&fields.special_requirements)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn record_decline(&self, id: Uuid) -> Result<QuoteRow, AppError> {
        Ok(sqlx::query_as::<_, QuoteRow>(
            "UPDATE quotes SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(QuoteStatus::Declined.as_str())
        .fetch_one(&self.pool)
        .await?)
    }
}
