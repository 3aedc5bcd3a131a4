//! Listing row mapping tests
//!
//! The mapper must be total: any combination of nullable joined fields maps
//! to a renderable DTO. These properties pin down the derived fields the UI
//! relies on.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use ekotregu_backend::services::listing::model::{
    FlowType, ListingStatus, ListingType, PricingType, Visibility,
};
use ekotregu_backend::services::listing::row::{join_location, ListingRow};

fn flow_strategy() -> impl Strategy<Value = FlowType> {
    prop_oneof![
        Just(FlowType::OfferMaterial),
        Just(FlowType::OfferProduct),
        Just(FlowType::RequestMaterial),
        Just(FlowType::RequestProduct),
        Just(FlowType::ServiceOffered),
        Just(FlowType::ServiceRequested),
    ]
}

fn opt_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Zë ]{0,12}")
}

fn row(
    flow_type: FlowType,
    city: Option<String>,
    region: Option<String>,
    organization_email: Option<String>,
    owner_email: Option<String>,
    owner_full_name: Option<String>,
    organization_name: Option<String>,
) -> ListingRow {
    ListingRow {
        id: Uuid::new_v4(),
        title: "Material i riciklueshëm".to_string(),
        description: None,
        price: Some(Decimal::new(2550, 2)),
        currency: "EUR".to_string(),
        pricing_type: PricingType::Fixed,
        quantity: None,
        unit: None,
        category_id: None,
        flow_type,
        city,
        region,
        location_details: None,
        status: ListingStatus::Active,
        visibility: Visibility::Public,
        created_by_user_id: Uuid::new_v4(),
        organization_id: None,
        eco_labels: vec![],
        eco_score: None,
        tags: vec![],
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        updated_at: None,
        category_name_en: None,
        category_name_sq: None,
        organization_name,
        organization_email,
        organization_phone: None,
        organization_website: None,
        organization_contact_person: None,
        owner_full_name,
        owner_email,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn location_cases_from_the_field() {
    assert_eq!(join_location(Some("Prishtinë"), None), "Prishtinë");
    assert_eq!(join_location(None, None), "");
    assert_eq!(join_location(Some("Pejë"), Some("Dukagjin")), "Pejë, Dukagjin");
}

#[test]
fn archived_private_listing_is_not_published() {
    let mut r = row(FlowType::OfferMaterial, None, None, None, None, None, None);
    r.status = ListingStatus::Archived;
    r.visibility = Visibility::Private;
    assert!(!r.into_listing().is_published);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The legacy projection is total and binary: shes iff the flow's
    /// textual form starts with OFFER
    #[test]
    fn prop_listing_type_binary_projection(flow in flow_strategy()) {
        let listing = row(flow, None, None, None, None, None, None).into_listing();
        if flow.as_str().starts_with("OFFER") {
            prop_assert_eq!(listing.listing_type, ListingType::Shes);
        } else {
            prop_assert_eq!(listing.listing_type, ListingType::Blej);
        }
    }

    /// The display location never starts or ends with a comma or space, no
    /// matter which parts are missing or blank
    #[test]
    fn prop_location_never_has_stray_separators(
        city in opt_text(),
        region in opt_text(),
    ) {
        let location = join_location(city.as_deref(), region.as_deref());
        prop_assert!(!location.starts_with(','));
        prop_assert!(!location.ends_with(','));
        prop_assert!(!location.starts_with(' '));
        prop_assert!(!location.ends_with(' '));
    }

    /// Contact falls back organization email -> owner email -> empty
    #[test]
    fn prop_contact_fallback_chain(
        org_email in prop::option::of(Just("org@example.com".to_string())),
        owner_email in prop::option::of(Just("owner@example.com".to_string())),
    ) {
        let listing = row(
            FlowType::OfferMaterial,
            None,
            None,
            org_email.clone(),
            owner_email.clone(),
            None,
            None,
        )
        .into_listing();

        let expected = org_email.or(owner_email).unwrap_or_default();
        prop_assert_eq!(listing.contact, expected);
    }

    /// Nested sub-objects mirror the presence of the joined name fields
    #[test]
    fn prop_nested_objects_follow_name_presence(
        owner_name in opt_text(),
        org_name in opt_text(),
    ) {
        let listing = row(
            FlowType::OfferMaterial,
            None,
            None,
            None,
            None,
            owner_name.clone(),
            org_name.clone(),
        )
        .into_listing();

        prop_assert_eq!(listing.users.is_some(), owner_name.is_some());
        prop_assert_eq!(listing.organizations.is_some(), org_name.is_some());
    }

    /// Mapping is total: every nullable field has a default, so the DTO is
    /// always renderable without null checks
    #[test]
    fn prop_mapping_is_total(
        flow in flow_strategy(),
        city in opt_text(),
        region in opt_text(),
        owner_email in prop::option::of(Just("owner@example.com".to_string())),
    ) {
        let listing = row(flow, city, region, None, owner_email, None, None).into_listing();

        // String defaults are empty, never missing
        prop_assert!(listing.quantity.is_empty());
        prop_assert!(listing.unit.is_empty());
        prop_assert!(listing.description.is_empty());
        prop_assert!(listing.category.is_empty());
        // updated_at is always populated
        prop_assert_eq!(listing.updated_at, listing.created_at);
    }
}
