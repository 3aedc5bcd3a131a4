//! Listing domain types and public DTO shapes
//!
//! The public `Listing` DTO is deliberately denormalized: it flattens the
//! listing row, its category, its owning organization and its creator into
//! one shape the UI can render without follow-up queries. Every nullable
//! source field has a defined default, so mapping a row can never fail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transactional direction/shape of a listing.
///
/// Stored as VARCHAR in `eco_listings.flow_type`; the migration constrains
/// the column to these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    #[sqlx(rename = "OFFER_MATERIAL")]
    OfferMaterial,
    #[sqlx(rename = "OFFER_PRODUCT")]
    OfferProduct,
    #[sqlx(rename = "REQUEST_MATERIAL")]
    RequestMaterial,
    #[sqlx(rename = "REQUEST_PRODUCT")]
    RequestProduct,
    #[sqlx(rename = "SERVICE_OFFERED")]
    ServiceOffered,
    #[sqlx(rename = "SERVICE_REQUESTED")]
    ServiceRequested,
}

impl FlowType {
    pub const ALL: [FlowType; 6] = [
        FlowType::OfferMaterial,
        FlowType::OfferProduct,
        FlowType::RequestMaterial,
        FlowType::RequestProduct,
        FlowType::ServiceOffered,
        FlowType::ServiceRequested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::OfferMaterial => "OFFER_MATERIAL",
            FlowType::OfferProduct => "OFFER_PRODUCT",
            FlowType::RequestMaterial => "REQUEST_MATERIAL",
            FlowType::RequestProduct => "REQUEST_PRODUCT",
            FlowType::ServiceOffered => "SERVICE_OFFERED",
            FlowType::ServiceRequested => "SERVICE_REQUESTED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OFFER_MATERIAL" => Some(FlowType::OfferMaterial),
            "OFFER_PRODUCT" => Some(FlowType::OfferProduct),
            "REQUEST_MATERIAL" => Some(FlowType::RequestMaterial),
            "REQUEST_PRODUCT" => Some(FlowType::RequestProduct),
            "SERVICE_OFFERED" => Some(FlowType::ServiceOffered),
            "SERVICE_REQUESTED" => Some(FlowType::ServiceRequested),
            _ => None,
        }
    }
}

/// The legacy two-valued listing type exposed to API consumers.
///
/// `shes` = offering/selling, `blej` = requesting/buying. This predates the
/// richer [`FlowType`] model; see [`ListingType::from_flow`] for the lossy
/// projection that keeps the old API shape alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Shes,
    Blej,
}

impl ListingType {
    /// Compatibility adapter from the V2 flow-type model to the V1 two-type
    /// model. Anything that is not an OFFER_* flow collapses to `blej`,
    /// including SERVICE_* flows. That is a known wart of the legacy API
    /// shape, preserved on purpose.
    pub fn from_flow(flow: FlowType) -> Self {
        if flow.as_str().starts_with("OFFER") {
            ListingType::Shes
        } else {
            ListingType::Blej
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Shes => "shes",
            ListingType::Blej => "blej",
        }
    }
}

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    #[sqlx(rename = "ACTIVE")]
    Active,
    #[sqlx(rename = "ARCHIVED")]
    Archived,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "ACTIVE",
            ListingStatus::Archived => "ARCHIVED",
        }
    }
}

/// Listing visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[sqlx(rename = "PUBLIC")]
    Public,
    #[sqlx(rename = "PRIVATE")]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

/// Pricing model for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingType {
    #[sqlx(rename = "FIXED")]
    Fixed,
    #[sqlx(rename = "NEGOTIABLE")]
    Negotiable,
}

/// Nested creator sub-object, present only when the owner row carried a name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingOwner {
    pub full_name: String,
    pub email: String,
}

/// Nested organization sub-object, present only when the listing belongs to
/// an organization with a name on record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingOrganization {
    pub name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub contact_person: String,
}

/// The public listing DTO returned by every catalog call
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: String,

    // Commercial
    pub price: Option<Decimal>,
    pub currency: String,
    pub pricing_type: PricingType,
    pub quantity: String,
    pub unit: String,

    // Taxonomy
    pub category: String,
    pub category_id: Option<Uuid>,
    pub category_name_en: String,
    pub category_name_sq: String,

    // Classification
    pub listing_type: ListingType,
    pub flow_type: FlowType,

    // Location
    pub location: String,
    pub city: String,
    pub region: String,
    pub location_details: String,

    // Lifecycle / visibility
    pub status: ListingStatus,
    pub visibility: Visibility,
    pub is_published: bool,

    // Ownership
    pub user_id: Uuid,
    pub organization_id: Option<Uuid>,

    // Denormalized contact / attribution
    pub contact: String,
    pub organization_name: String,
    pub organization_contact_email: String,
    pub organization_contact_phone: String,
    pub organization_contact_website: String,
    pub organization_contact_person: String,
    pub creator_full_name: String,
    pub creator_email: String,

    // Eco metadata
    pub eco_labels: Vec<String>,
    pub eco_score: Option<i32>,
    pub tags: Vec<String>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Nested shapes for consumers that expect sub-objects. Absence and null
    // are different things downstream, hence skip instead of null.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<ListingOwner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<ListingOrganization>,
}

/// Payload for creating or updating a listing
///
/// Produced by the (out-of-scope) request validation layer; `category` is
/// free text resolved against the catalog at write time.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingWriteInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub unit: Option<String>,
    pub quantity: Option<String>,
    pub location: Option<String>,
    pub listing_type: ListingType,
}

/// Result of a public or owner list query
///
/// The read path degrades gracefully: on a query failure `data` is empty,
/// `has_more` is false and `error` carries a localized user-facing message.
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub data: Vec<Listing>,
    pub has_more: bool,
    pub error: Option<String>,
}

/// Result of the public detail query
#[derive(Debug, Serialize)]
pub struct ListingDetail {
    pub data: Option<Listing>,
    pub error: Option<String>,
}

/// Error codes for the owner-scoped detail query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerFetchError {
    NotFound,
    QueryError,
}

impl OwnerFetchError {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerFetchError::NotFound => "NOT_FOUND",
            OwnerFetchError::QueryError => "QUERY_ERROR",
        }
    }
}

/// Result of the owner-scoped detail query
#[derive(Debug, Serialize)]
pub struct OwnerListingDetail {
    pub data: Option<Listing>,
    pub error: Option<OwnerFetchError>,
}
