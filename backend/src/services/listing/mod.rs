//! Listings catalog service: filtered queries and owner-scoped mutations
//!
//! Reads degrade gracefully: a failed catalog query is logged server-side
//! and surfaces as an empty result with a localized error string, never as a
//! propagated error. Mutations validate before touching the store and are
//! single atomic statements, so a retry after a transient failure either
//! succeeds once or fails the same way.

pub mod filter;
pub mod model;
pub mod row;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::PlatformConfig;
use crate::error::{AppError, AppResult};

use filter::{CompiledListingQuery, ListingListOptions};
use model::{
    FlowType, ListingDetail, ListingPage, ListingType, ListingWriteInput, OwnerFetchError,
    OwnerListingDetail,
};
use row::{ListingRow, LISTING_SELECT};

/// Localized message surfaced when a catalog read fails
const LISTINGS_LOAD_ERROR_SQ: &str = "Nuk mund të ngarkohen shpalljet. Ju lutemi provoni përsëri.";
const LISTING_LOAD_ERROR_SQ: &str = "Nuk mund të ngarkohet shpallja. Ju lutemi provoni përsëri.";

/// Listings service for catalog queries and owner-scoped mutations
#[derive(Clone)]
pub struct ListingService {
    db: PgPool,
    platform: PlatformConfig,
}

impl ListingService {
    /// Create a new ListingService instance
    pub fn new(db: PgPool, platform: PlatformConfig) -> Self {
        Self { db, platform }
    }

    /// Public catalog query: filter, paginate, map.
    ///
    /// Always restricted to ACTIVE/PUBLIC rows by the compiled baseline
    /// predicate.
    pub async fn fetch_listings(&self, options: &ListingListOptions) -> ListingPage {
        let compiled = filter::compile(options);
        match self.run_list_query(&compiled).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, detail = ?e, "public listings query failed");
                ListingPage {
                    data: Vec::new(),
                    has_more: false,
                    error: Some(LISTINGS_LOAD_ERROR_SQ.to_string()),
                }
            }
        }
    }

    /// Owner-scoped list: every status and visibility, newest first, no
    /// pagination.
    pub async fn fetch_user_listings(&self, user_id: Uuid) -> ListingPage {
        let compiled = filter::compile_for_owner(user_id);
        match self.run_list_query(&compiled).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, detail = ?e, %user_id, "owner listings query failed");
                ListingPage {
                    data: Vec::new(),
                    has_more: false,
                    error: Some(LISTINGS_LOAD_ERROR_SQ.to_string()),
                }
            }
        }
    }

    /// Public detail query, visibility-filtered like the list
    pub async fn fetch_listing_by_id(&self, id: Uuid) -> ListingDetail {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" AND l.status = 'ACTIVE' AND l.visibility = 'PUBLIC' AND l.id = ");
        qb.push_bind(id);

        match qb
            .build_query_as::<ListingRow>()
            .fetch_optional(&self.db)
            .await
        {
            Ok(row) => ListingDetail {
                data: row.map(ListingRow::into_listing),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, detail = ?e, listing_id = %id, "listing detail query failed");
                ListingDetail {
                    data: None,
                    error: Some(LISTING_LOAD_ERROR_SQ.to_string()),
                }
            }
        }
    }

    /// Owner-scoped detail query: no visibility filter, restricted by
    /// creator identity. Archived listings remain reachable here.
    pub async fn fetch_listing_by_id_for_owner(
        &self,
        listing_id: Uuid,
        user_id: Uuid,
    ) -> OwnerListingDetail {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" AND l.id = ");
        qb.push_bind(listing_id);
        qb.push(" AND l.created_by_user_id = ");
        qb.push_bind(user_id);

        match qb
            .build_query_as::<ListingRow>()
            .fetch_optional(&self.db)
            .await
        {
            Ok(Some(row)) => OwnerListingDetail {
                data: Some(row.into_listing()),
                error: None,
            },
            Ok(None) => OwnerListingDetail {
                data: None,
                error: Some(OwnerFetchError::NotFound),
            },
            Err(e) => {
                tracing::error!(error = %e, detail = ?e, %listing_id, "owner listing query failed");
                OwnerListingDetail {
                    data: None,
                    error: Some(OwnerFetchError::QueryError),
                }
            }
        }
    }

    /// Create a listing on behalf of a user.
    ///
    /// Created ACTIVE/PUBLIC with the platform currency and country; the
    /// listing belongs to the user's approved organization when one exists.
    pub async fn create_user_listing(
        &self,
        user_id: Uuid,
        input: ListingWriteInput,
    ) -> AppResult<Uuid> {
        let prepared = self.prepare_write(&input).await?;

        let organization_id = self.resolve_member_organization(user_id).await?;

        let listing_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO eco_listings
                (title, description, price, currency, pricing_type, quantity, unit,
                 category_id, flow_type, city, region, country,
                 status, visibility, created_by_user_id, organization_id,
                 eco_labels, tags)
            VALUES ($1, $2, $3, $4, 'FIXED', $5, $6, $7, $8, $9, $10, $11,
                    'ACTIVE', 'PUBLIC', $12, $13, '{}', '{}')
            RETURNING id
            "#,
        )
        .bind(&prepared.title)
        .bind(&prepared.description)
        .bind(prepared.price)
        .bind(&self.platform.currency)
        .bind(prepared.quantity)
        .bind(&prepared.unit)
        .bind(prepared.category_id)
        .bind(prepared.flow_type.as_str())
        .bind(&prepared.city)
        .bind(&prepared.region)
        .bind(&self.platform.country)
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.db)
        .await?;

        Ok(listing_id)
    }

    /// Update a listing in place, scoped to its creator.
    ///
    /// The WHERE clause conjoins listing id and creator id: zero affected
    /// rows means "does not exist" or "not yours", and the two are
    /// deliberately indistinguishable.
    pub async fn update_user_listing(
        &self,
        listing_id: Uuid,
        user_id: Uuid,
        input: ListingWriteInput,
    ) -> AppResult<()> {
        let prepared = self.prepare_write(&input).await?;

        let result = sqlx::query(
            r#"
            UPDATE eco_listings
            SET title = $1, description = $2, price = $3, quantity = $4, unit = $5,
                category_id = $6, flow_type = $7, city = $8, region = $9,
                status = 'ACTIVE', visibility = 'PUBLIC', updated_at = NOW()
            WHERE id = $10 AND created_by_user_id = $11
            "#,
        )
        .bind(&prepared.title)
        .bind(&prepared.description)
        .bind(prepared.price)
        .bind(prepared.quantity)
        .bind(&prepared.unit)
        .bind(prepared.category_id)
        .bind(prepared.flow_type.as_str())
        .bind(&prepared.city)
        .bind(&prepared.region)
        .bind(listing_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFoundOrUnauthorized);
        }
        Ok(())
    }

    /// Soft-delete: ARCHIVED/PRIVATE instead of row removal, so the listing
    /// stays reachable through the owner-scoped fetch.
    pub async fn delete_user_listing(&self, listing_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE eco_listings
            SET status = 'ARCHIVED', visibility = 'PRIVATE', updated_at = NOW()
            WHERE id = $1 AND created_by_user_id = $2
            "#,
        )
        .bind(listing_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFoundOrUnauthorized);
        }
        Ok(())
    }

    async fn run_list_query(&self, compiled: &CompiledListingQuery) -> AppResult<ListingPage> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(LISTING_SELECT);
        compiled.apply_to(&mut qb);

        let rows: Vec<ListingRow> = qb.build_query_as().fetch_all(&self.db).await?;

        let (rows, has_more) = match compiled.page_size {
            Some(size) => filter::trim_overfetch(rows, size as usize),
            None => (rows, false),
        };

        Ok(ListingPage {
            data: rows.into_iter().map(ListingRow::into_listing).collect(),
            has_more,
            error: None,
        })
    }

    /// Shared create/update validation and foreign-key resolution. Rejects
    /// before any write statement runs.
    async fn prepare_write(&self, input: &ListingWriteInput) -> AppResult<PreparedWrite> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation {
                field: "title".to_string(),
                message: "Title cannot be empty".to_string(),
                message_sq: "Titulli nuk mund të jetë bosh".to_string(),
            });
        }

        let price = format_price(input.price)?;
        let category_id = self.resolve_category(&input.category).await?;

        let quantity = input
            .quantity
            .as_deref()
            .and_then(|q| Decimal::from_str(q.trim()).ok());
        let (city, region) = split_location(input.location.as_deref());

        Ok(PreparedWrite {
            title,
            description: input.description.trim().to_string(),
            price,
            quantity,
            unit: input.unit.as_deref().map(|u| u.trim().to_string()),
            category_id,
            flow_type: flow_for_write(input.listing_type),
            city,
            region,
        })
    }

    /// Resolve free-text category input to a catalog id.
    ///
    /// Slug match first, then a fuzzy match against either localized name,
    /// then the catalog's first category. Only an empty catalog fails the
    /// write.
    async fn resolve_category(&self, raw: &str) -> AppResult<Uuid> {
        let trimmed = raw.trim();

        let slug = slugify(trimmed);
        if !slug.is_empty() {
            let by_slug = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM categories WHERE slug = $1",
            )
            .bind(&slug)
            .fetch_optional(&self.db)
            .await?;
            if let Some(id) = by_slug {
                return Ok(id);
            }
        }

        if !trimmed.is_empty() {
            let pattern = format!("%{}%", trimmed);
            let by_name = sqlx::query_scalar::<_, Uuid>(
                r#"
                SELECT id FROM categories
                WHERE name_en ILIKE $1 OR name_sq ILIKE $1
                ORDER BY sort_order, slug
                LIMIT 1
                "#,
            )
            .bind(&pattern)
            .fetch_optional(&self.db)
            .await?;
            if let Some(id) = by_name {
                return Ok(id);
            }
        }

        let fallback = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM categories ORDER BY sort_order, slug LIMIT 1",
        )
        .fetch_optional(&self.db)
        .await?;

        fallback.ok_or_else(|| AppError::Validation {
            field: "category".to_string(),
            message: "Invalid or missing category".to_string(),
            message_sq: "Kategori e pavlefshme ose mungon".to_string(),
        })
    }

    /// The catalog organization a user's listings belong to, if the user has
    /// an approved membership. Unaffiliated users create personal listings.
    async fn resolve_member_organization(&self, user_id: Uuid) -> AppResult<Option<Uuid>> {
        let organization_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT m.organization_id
            FROM organization_members m
            JOIN organizations o ON o.id = m.organization_id
            WHERE m.user_id = $1 AND m.status = 'APPROVED'
            ORDER BY m.created_at
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(organization_id)
    }
}

/// Validated, FK-resolved write payload
struct PreparedWrite {
    title: String,
    description: String,
    price: Decimal,
    quantity: Option<Decimal>,
    unit: Option<String>,
    category_id: Uuid,
    flow_type: FlowType,
    city: Option<String>,
    region: Option<String>,
}

/// The V1 payload cannot express the richer flow variants, so the two legacy
/// types map to the material flows.
fn flow_for_write(listing_type: ListingType) -> FlowType {
    match listing_type {
        ListingType::Shes => FlowType::OfferMaterial,
        ListingType::Blej => FlowType::RequestMaterial,
    }
}

/// Validate and normalize a price to two decimal places.
pub fn format_price(price: f64) -> AppResult<Decimal> {
    let rejected = || AppError::Validation {
        field: "price".to_string(),
        message: "Price is required and must be a positive number".to_string(),
        message_sq: "Çmimi është i detyrueshëm dhe duhet të jetë numër pozitiv".to_string(),
    };

    if !price.is_finite() || price < 0.0 {
        return Err(rejected());
    }

    let mut decimal = Decimal::from_f64(price).ok_or_else(rejected)?.round_dp(2);
    decimal.rescale(2);
    Ok(decimal)
}

/// Normalize free text into slug form: trimmed, lowercased, spaces to
/// hyphens.
pub fn slugify(raw: &str) -> String {
    raw.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Split a single-line location input into city and region on the first
/// comma, mirroring how the row mapper joins them back.
pub fn split_location(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(r) => r,
        None => return (None, None),
    };

    match raw.split_once(',') {
        Some((city, region)) => {
            let region = region.trim();
            (
                Some(city.trim().to_string()),
                (!region.is_empty()).then(|| region.to_string()),
            )
        }
        None => (Some(raw.to_string()), None),
    }
}
