//! Row mapping from the listings join to the public DTO
//!
//! One joined row (listing + nullable category names + nullable organization
//! contact + nullable owner) maps to exactly one [`Listing`]. The mapping is
//! total: every nullable source field has a default, so it never fails.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use super::model::{
    FlowType, Listing, ListingOrganization, ListingOwner, ListingStatus, ListingType,
    PricingType, Visibility,
};

/// Column list for the listings join. Kept next to [`ListingRow`] so the
/// SELECT and the struct stay in sync.
pub const LISTING_SELECT: &str = r#"
SELECT l.id, l.title, l.description, l.price, l.currency, l.pricing_type,
       l.quantity, l.unit, l.category_id, l.flow_type,
       l.city, l.region, l.location_details,
       l.status, l.visibility,
       l.created_by_user_id, l.organization_id,
       l.eco_labels, l.eco_score, l.tags,
       l.created_at, l.updated_at,
       c.name_en AS category_name_en, c.name_sq AS category_name_sq,
       o.name AS organization_name, o.contact_email AS organization_email,
       o.contact_phone AS organization_phone, o.website AS organization_website,
       o.contact_person AS organization_contact_person,
       u.full_name AS owner_full_name, u.email AS owner_email
FROM eco_listings l
LEFT JOIN categories c ON c.id = l.category_id
LEFT JOIN organizations o ON o.id = l.organization_id
LEFT JOIN users u ON u.id = l.created_by_user_id
WHERE 1=1"#;

/// One row of the listings join
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub currency: String,
    pub pricing_type: PricingType,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
    pub flow_type: FlowType,
    pub city: Option<String>,
    pub region: Option<String>,
    pub location_details: Option<String>,
    pub status: ListingStatus,
    pub visibility: Visibility,
    pub created_by_user_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub eco_labels: Vec<String>,
    pub eco_score: Option<i32>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub category_name_en: Option<String>,
    pub category_name_sq: Option<String>,
    pub organization_name: Option<String>,
    pub organization_email: Option<String>,
    pub organization_phone: Option<String>,
    pub organization_website: Option<String>,
    pub organization_contact_person: Option<String>,
    pub owner_full_name: Option<String>,
    pub owner_email: Option<String>,
}

/// Combined display location: city and region, comma-joined, with empty
/// parts filtered out so two absent parts yield "" rather than a stray comma.
pub fn join_location(city: Option<&str>, region: Option<&str>) -> String {
    [city, region]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ListingRow {
    /// Flatten the joined row into the public DTO
    pub fn into_listing(self) -> Listing {
        let listing_type = ListingType::from_flow(self.flow_type);
        let is_published =
            self.status == ListingStatus::Active && self.visibility == Visibility::Public;
        let location = join_location(self.city.as_deref(), self.region.as_deref());

        // Display name is Albanian-first, with an English fallback
        let category = self
            .category_name_sq
            .clone()
            .or_else(|| self.category_name_en.clone())
            .unwrap_or_default();

        // Best-available contact email: organization first, then the owner
        let contact = self
            .organization_email
            .clone()
            .or_else(|| self.owner_email.clone())
            .unwrap_or_default();

        let users = self.owner_full_name.as_ref().map(|full_name| ListingOwner {
            full_name: full_name.clone(),
            email: self.owner_email.clone().unwrap_or_default(),
        });

        let organizations = self.organization_name.as_ref().map(|name| {
            ListingOrganization {
                name: name.clone(),
                contact_email: self.organization_email.clone().unwrap_or_default(),
                contact_phone: self.organization_phone.clone().unwrap_or_default(),
                website: self.organization_website.clone().unwrap_or_default(),
                contact_person: self.organization_contact_person.clone().unwrap_or_default(),
            }
        });

        Listing {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            price: self.price,
            currency: self.currency,
            pricing_type: self.pricing_type,
            quantity: self
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            category,
            category_id: self.category_id,
            category_name_en: self.category_name_en.unwrap_or_default(),
            category_name_sq: self.category_name_sq.unwrap_or_default(),
            listing_type,
            flow_type: self.flow_type,
            location,
            city: self.city.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            location_details: self.location_details.unwrap_or_default(),
            status: self.status,
            visibility: self.visibility,
            is_published,
            user_id: self.created_by_user_id,
            organization_id: self.organization_id,
            contact,
            organization_name: self.organization_name.unwrap_or_default(),
            organization_contact_email: self.organization_email.unwrap_or_default(),
            organization_contact_phone: self.organization_phone.unwrap_or_default(),
            organization_contact_website: self.organization_website.unwrap_or_default(),
            organization_contact_person: self.organization_contact_person.unwrap_or_default(),
            creator_full_name: self.owner_full_name.unwrap_or_default(),
            creator_email: self.owner_email.unwrap_or_default(),
            eco_labels: self.eco_labels,
            eco_score: self.eco_score,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            users,
            organizations,
        }
    }
}
