use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::job::{InventoryItemRow, JobRow};

/// Persistence seam for cached job and inventory data.
///
/// Rows are addressed by the upstream primary key: jobs are replaced
/// wholesale by upsert, and a job's inventory set is replaced
/// delete-all-then-reinsert on force-sync. Nothing here deletes a job.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError>;
    async fn upsert_job(&self, job: &JobRow) -> Result<JobRow, AppError>;
    async fn list_inventory(&self, job_id: i64) -> Result<Vec<InventoryItemRow>, AppError>;
    async fn upsert_inventory(&self, items: &[InventoryItemRow]) -> Result<(), AppError>;
    /// Deletes the job's current inventory, then inserts the new set.
    /// Returns the number of items written.
    async fn replace_inventory(
        &self,
        job_id: i64,
        items: &[InventoryItemRow],
    ) -> Result<usize, AppError>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_inventory_item(&self, item: &InventoryItemRow) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items
                (id, job_id, description, room, quantity, destination, cube,
                 type_code, barcode, raw_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                job_id = EXCLUDED.job_id,
                description = EXCLUDED.description,
                room = EXCLUDED.room,
                quantity = EXCLUDED.quantity,
                destination = EXCLUDED.destination,
                cube = EXCLUDED.cube,
                type_code = EXCLUDED.type_code,
                barcode = EXCLUDED.barcode,
                raw_data = EXCLUDED.raw_data
            "#,
        )
        .bind(item.id)
        .bind(item.job_id)
        .bind(&item.description)
        .bind(&item.room)
        .bind(item.quantity)
        .bind(&item.destination)
        .bind(item.cube)
        .bind(&item.type_code)
        .bind(&item.barcode)
        .bind(&item.raw_data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find_job(&self, job_id: i64) -> Result<Option<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn upsert_job(&self, job: &JobRow) -> Result<JobRow, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, title_name, first_name, last_name, estimated_delivery_details,
                 job_value, date_modified, brand_code, branch_code, company_code,
                 measures_volume_gross_f3, measures_volume_gross_m3,
                 measures_volume_net_f3, measures_volume_net_m3,
                 measures_weight_gross_kg, measures_weight_gross_lb,
                 measures_weight_net_kg, measures_weight_net_lb,
                 uplift_line1, uplift_line2, uplift_city, uplift_state,
                 uplift_postcode, uplift_country,
                 delivery_line1, delivery_line2, delivery_city, delivery_state,
                 delivery_postcode, delivery_country,
                 raw_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18,
                    $19, $20, $21, $22, $23, $24,
                    $25, $26, $27, $28, $29, $30,
                    $31)
            ON CONFLICT (id) DO UPDATE SET
                title_name = EXCLUDED.title_name,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                estimated_delivery_details = EXCLUDED.estimated_delivery_details,
                job_value = EXCLUDED.job_value,
                date_modified = EXCLUDED.date_modified,
                brand_code = EXCLUDED.brand_code,
                branch_code = EXCLUDED.branch_code,
                company_code = EXCLUDED.company_code,
                measures_volume_gross_f3 = EXCLUDED.measures_volume_gross_f3,
                measures_volume_gross_m3 = EXCLUDED.measures_volume_gross_m3,
                measures_volume_net_f3 = EXCLUDED.measures_volume_net_f3,
                measures_volume_net_m3 = EXCLUDED.measures_volume_net_m3,
                measures_weight_gross_kg = EXCLUDED.measures_weight_gross_kg,
                measures_weight_gross_lb = EXCLUDED.measures_weight_gross_lb,
                measures_weight_net_kg = EXCLUDED.measures_weight_net_kg,
                measures_weight_net_lb = EXCLUDED.measures_weight_net_lb,
                uplift_line1 = EXCLUDED.uplift_line1,
                uplift_line2 = EXCLUDED.uplift_line2,
                uplift_city = EXCLUDED.uplift_city,
                uplift_state = EXCLUDED.uplift_state,
                uplift_postcode = EXCLUDED.uplift_postcode,
                uplift_country = EXCLUDED.uplift_country,
                delivery_line1 = EXCLUDED.delivery_line1,
                delivery_line2 = EXCLUDED.delivery_line2,
                delivery_city = EXCLUDED.delivery_city,
                delivery_state = EXCLUDED.delivery_state,
                delivery_postcode = EXCLUDED.delivery_postcode,
                delivery_country = EXCLUDED.delivery_country,
                raw_data = EXCLUDED.raw_data,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(&job.title_name)
        .bind(&job.first_name)
        .bind(&job.last_name)
        .bind(&job.estimated_delivery_details)
        .bind(job.job_value)
        .bind(job.date_modified)
        .bind(&job.brand_code)
        .bind(&job.branch_code)
        .bind(&job.company_code)
        .bind(job.measures_volume_gross_f3)
        .bind(job.measures_volume_gross_m3)
        .bind(job.measures_volume_net_f3)
        .bind(job.measures_volume_net_m3)
        .bind(job.measures_weight_gross_kg)
        .bind(job.measures_weight_gross_lb)
        .bind(job.measures_weight_net_kg)
        .bind(job.measures_weight_net_lb)
        .bind(&job.uplift_line1)
        .bind(&job.uplift_line2)
        .bind(&job.uplift_city)
        .bind(&job.uplift_state)
        .bind(&job.uplift_postcode)
        .bind(&job.uplift_country)
        .bind(&job.delivery_line1)
        .bind(&job.delivery_line2)
        .bind(&job.delivery_city)
        .bind(&job.delivery_state)
        .bind(&job.delivery_postcode)
        .bind(&job.delivery_country)
        .bind(&job.raw_data)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_inventory(&self, job_id: i64) -> Result<Vec<InventoryItemRow>, AppError> {
        Ok(sqlx::query_as::<_, InventoryItemRow>(
            "SELECT * FROM inventory_items WHERE job_id = $1 ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_inventory(&self, items: &[InventoryItemRow]) -> Result<(), AppError> {
        for item in items {
            self.upsert_inventory_item(item).await?;
        }
        Ok(())
    }

    async fn replace_inventory(
        &self,
        job_id: i64,
        items: &[InventoryItemRow],
    ) -> Result<usize, AppError> {
        // The delete and the reinserts are separately committed; the job and
        // inventory sync steps are independent by design, so no transaction
        // spans them either.
        sqlx::query("DELETE FROM inventory_items WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        self.upsert_inventory(items).await?;
        Ok(items.len())
    }
}
