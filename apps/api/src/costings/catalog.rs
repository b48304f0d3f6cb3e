use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::costing::{CostingCategoryRow, CostingItemRow};
use crate::moveware::CompanyId;

/// Catalog entries for one company. `only_active` restricts to customer-
/// visible items (the per-job view); the staff view lists everything.
pub async fn list_catalog(
    pool: &PgPool,
    company: &CompanyId,
    only_active: bool,
) -> Result<Vec<CostingItemRow>, AppError> {
    let query = if only_active {
        "SELECT * FROM costing_items WHERE company_id = $1 AND is_active ORDER BY id"
    } else {
        "SELECT * FROM costing_items WHERE company_id = $1 ORDER BY id"
    };
    Ok(sqlx::query_as::<_, CostingItemRow>(query)
        .bind(company.as_str())
        .fetch_all(pool)
        .await?)
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<CostingCategoryRow>, AppError> {
    Ok(sqlx::query_as::<_, CostingCategoryRow>(
        "SELECT * FROM costing_categories ORDER BY sort_order, id",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn find_item(pool: &PgPool, item_id: &str) -> Result<Option<CostingItemRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CostingItemRow>("SELECT * FROM costing_items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Inserts or wholesale-replaces a catalog item.
pub async fn upsert_item(pool: &PgPool, item: &CostingItemRow) -> Result<CostingItemRow, AppError> {
    Ok(sqlx::query_as::<_, CostingItemRow>(
        r#"
        INSERT INTO costing_items
            (id, company_id, category_id, name, description, quantity, rate,
             total_price, tax_included, inclusions, exclusions, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (id) DO UPDATE SET
            company_id = EXCLUDED.company_id,
            category_id = EXCLUDED.category_id,
            name = EXCLUDED.name,
            description = EXCLUDED.description,
            quantity = EXCLUDED.quantity,
            rate = EXCLUDED.rate,
            total_price = EXCLUDED.total_price,
            tax_included = EXCLUDED.tax_included,
            inclusions = EXCLUDED.inclusions,
            exclusions = EXCLUDED.exclusions,
            is_active = EXCLUDED.is_active,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(&item.id)
    .bind(&item.company_id)
    .bind(&item.category_id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.quantity)
    .bind(item.rate)
    .bind(item.total_price)
    .bind(item.tax_included)
    .bind(&item.inclusions)
    .bind(&item.exclusions)
    .bind(item.is_active)
    .fetch_one(pool)
    .await?)
}

/// Removes a catalog item. Returns whether a row existed.
pub async fn delete_item(pool: &PgPool, item_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM costing_items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
