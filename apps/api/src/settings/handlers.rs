use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::settings::{BrandingRow, CopyBlockRow, HeroRow};
use crate::routes::{ok, require_company, ApiResponse, CompanyQuery};
use crate::state::AppState;

/// GET /settings/branding?coId=
pub async fn handle_get_branding(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<BrandingRow>>, AppError> {
    let company = require_company(&query)?;
    let branding =
        sqlx::query_as::<_, BrandingRow>("SELECT * FROM branding WHERE company_id = $1")
            .bind(company.as_str())
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No branding for company {company}")))?;
    Ok(ok(branding))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutBrandingRequest {
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub tertiary_color: Option<String>,
    pub font_family: Option<String>,
    pub favicon: Option<String>,
}

/// PUT /settings/branding?coId=
///
/// Upsert; absent fields keep their current values (or the column default
/// on first write).
pub async fn handle_put_branding(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(request): Json<PutBrandingRequest>,
) -> Result<Json<ApiResponse<BrandingRow>>, AppError> {
    let company = require_company(&query)?;
    let branding = sqlx::query_as::<_, BrandingRow>(
        r#"
        INSERT INTO branding
            (company_id, company_name, logo_url, primary_color,
             secondary_color, tertiary_color, font_family, favicon)
        VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''), $8)
        ON CONFLICT (company_id) DO UPDATE SET
            company_name = COALESCE($2, branding.company_name),
            logo_url = COALESCE($3, branding.logo_url),
            primary_color = COALESCE($4, branding.primary_color),
            secondary_color = COALESCE($5, branding.secondary_color),
            tertiary_color = COALESCE($6, branding.tertiary_color),
            font_family = COALESCE($7, branding.font_family),
            favicon = COALESCE($8, branding.favicon),
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(company.as_str())
    .bind(&request.company_name)
    .bind(&request.logo_url)
    .bind(&request.primary_color)
    .bind(&request.secondary_color)
    .bind(&request.tertiary_color)
    .bind(&request.font_family)
    .bind(&request.favicon)
    .fetch_one(&state.db)
    .await?;
    Ok(ok(branding))
}

/// GET /settings/hero?coId=
pub async fn handle_get_hero(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> Result<Json<ApiResponse<HeroRow>>, AppError> {
    let company = require_company(&query)?;
    let hero = sqlx::query_as::<_, HeroRow>("SELECT * FROM hero WHERE company_id = $1")
        .bind(company.as_str())
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No hero content for company {company}")))?;
    Ok(ok(hero))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PutHeroRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image_url: Option<String>,
    pub cta_button_text: Option<String>,
    pub cta_button_link: Option<String>,
    pub overlay_opacity: Option<f64>,
}

/// PUT /settings/hero?coId=
pub async fn handle_put_hero(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(request): Json<PutHeroRequest>,
) -> Result<Json<ApiResponse<HeroRow>>, AppError> {
    let company = require_company(&query)?;
    let hero = sqlx::query_as::<_, HeroRow>(
        r#"
        INSERT INTO hero
            (company_id, title, subtitle, background_image_url,
             cta_button_text, cta_button_link, overlay_opacity)
        VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), $4,
                COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, 0.4))
        ON CONFLICT (company_id) DO UPDATE SET
            title = COALESCE($2, hero.title),
            subtitle = COALESCE($3, hero.subtitle),
            background_image_url = COALESCE($4, hero.background_image_url),
            cta_button_text = COALESCE($5, hero.cta_button_text),
            cta_button_link = COALESCE($6, hero.cta_button_link),
            overlay_opacity = COALESCE($7, hero.overlay_opacity),
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(company.as_str())
    .bind(&request.title)
    .bind(&request.subtitle)
    .bind(&request.background_image_url)
    .bind(&request.cta_button_text)
    .bind(&request.cta_button_link)
    .bind(request.overlay_opacity)
    .fetch_one(&state.db)
    .await?;
    Ok(ok(hero))
}

#[derive(Debug, Deserialize)]
pub struct CopyQuery {
    #[serde(rename = "coId")]
    pub co_id: Option<String>,
    pub section: Option<String>,
}

/// GET /settings/copy?coId=&section=
///
/// All copy blocks for a company, optionally restricted to one section.
pub async fn handle_get_copy(
    State(state): State<AppState>,
    Query(query): Query<CopyQuery>,
) -> Result<Json<ApiResponse<Vec<CopyBlockRow>>>, AppError> {
    let company = require_company(&CompanyQuery {
        co_id: query.co_id.clone(),
    })?;
    let blocks = match &query.section {
        Some(section) => {
            sqlx::query_as::<_, CopyBlockRow>(
                "SELECT * FROM copy_blocks WHERE company_id = $1 AND section = $2 ORDER BY key",
            )
            .bind(company.as_str())
            .bind(section)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, CopyBlockRow>(
                "SELECT * FROM copy_blocks WHERE company_id = $1 ORDER BY section, key",
            )
            .bind(company.as_str())
            .fetch_all(&state.db)
            .await?
        }
    };
    Ok(ok(blocks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutCopyRequest {
    pub section: Option<String>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub locale: Option<String>,
}

/// PUT /settings/copy?coId=
pub async fn handle_put_copy(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(request): Json<PutCopyRequest>,
) -> Result<Json<ApiResponse<CopyBlockRow>>, AppError> {
    let company = require_company(&query)?;

    let mut invalid = Vec::new();
    if request
        .section
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        invalid.push("section");
    }
    if request.key.as_deref().map_or(true, |s| s.trim().is_empty()) {
        invalid.push("key");
    }
    if request.value.is_none() {
        invalid.push("value");
    }
    if !invalid.is_empty() {
        return Err(AppError::invalid_fields(invalid));
    }

    let block = sqlx::query_as::<_, CopyBlockRow>(
        r#"
        INSERT INTO copy_blocks (company_id, section, key, value, locale)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (company_id, section, key) DO UPDATE SET
            value = EXCLUDED.value,
            locale = EXCLUDED.locale,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(company.as_str())
    .bind(request.section.unwrap_or_default())
    .bind(request.key.unwrap_or_default())
    .bind(request.value.unwrap_or_default())
    .bind(&request.locale)
    .fetch_one(&state.db)
    .await?;
    Ok(ok(block))
}
