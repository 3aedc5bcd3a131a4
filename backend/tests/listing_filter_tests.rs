//! Listing filter compilation tests
//!
//! Covers the defensive input handling of the catalog query compiler:
//! - tab and flow-type filters
//! - dual UUID/slug category interpretation
//! - pagination clamping and the over-fetch has-more technique

use proptest::prelude::*;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use ekotregu_backend::services::listing::filter::{
    compile, compile_for_owner, trim_overfetch, CategoryFilter, ListingListOptions,
    ListingPredicate, SortOrder, MAX_PAGE_SIZE,
};

fn options() -> ListingListOptions {
    ListingListOptions::default()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn public_query_always_carries_published_baseline() {
    let compiled = compile(&ListingListOptions {
        listing_type: Some("shes".to_string()),
        search: Some("letra".to_string()),
        tag: Some("riciklim".to_string()),
        ..options()
    });
    assert_eq!(compiled.predicates[0], ListingPredicate::PublishedOnly);
}

#[test]
fn owner_query_never_carries_published_baseline() {
    let compiled = compile_for_owner(Uuid::new_v4());
    assert!(!compiled
        .predicates
        .contains(&ListingPredicate::PublishedOnly));
}

#[test]
fn uuid_category_input_resolves_to_id_filter() {
    let parsed = CategoryFilter::parse(Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    assert_eq!(
        parsed,
        CategoryFilter::Id("3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap())
    );
}

#[test]
fn slug_category_input_resolves_to_slug_filter() {
    let parsed = CategoryFilter::parse(Some("recycled-metals"));
    assert_eq!(parsed, CategoryFilter::Slug("recycled-metals".to_string()));
}

#[test]
fn owner_sql_sees_archived_rows_public_sql_does_not() {
    // Archived listings leave the public catalog but must stay visible on
    // the owner's own list, so only the public query may constrain
    // status and visibility.
    let mut owner_qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT l.* FROM eco_listings l WHERE 1=1");
    compile_for_owner(Uuid::new_v4()).apply_to(&mut owner_qb);
    let owner_sql = owner_qb.sql().to_string();
    assert!(!owner_sql.contains("l.status"));
    assert!(!owner_sql.contains("l.visibility"));
    assert!(owner_sql.contains("l.created_by_user_id"));

    let mut public_qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT l.* FROM eco_listings l WHERE 1=1");
    compile(&options()).apply_to(&mut public_qb);
    let public_sql = public_qb.sql().to_string();
    assert!(public_sql.contains("l.status = 'ACTIVE'"));
    assert!(public_sql.contains("l.visibility = 'PUBLIC'"));
}

#[test]
fn first_page_of_thirteen_rows_has_more() {
    let rows: Vec<u32> = (0..13).collect();
    let (page, has_more) = trim_overfetch(rows, 12);
    assert_eq!(page.len(), 12);
    assert!(has_more);
}

#[test]
fn exactly_one_page_has_no_more() {
    let rows: Vec<u32> = (0..12).collect();
    let (page, has_more) = trim_overfetch(rows, 12);
    assert_eq!(page.len(), 12);
    assert!(!has_more);
}

#[test]
fn default_sort_is_newest() {
    assert_eq!(compile(&options()).sort, SortOrder::Newest);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Page size is always clamped into [1, MAX_PAGE_SIZE]
    #[test]
    fn prop_page_size_always_clamped(page_size in -1000i64..1000) {
        let compiled = compile(&ListingListOptions {
            page_size: Some(page_size),
            ..options()
        });
        let size = compiled.page_size.unwrap();
        prop_assert!(size >= 1);
        prop_assert!(size <= MAX_PAGE_SIZE);
    }

    /// Offset is always (page - 1) * page_size with page coerced to >= 1
    #[test]
    fn prop_offset_consistent_with_page(page in -50i64..50, page_size in 1i64..=100) {
        let compiled = compile(&ListingListOptions {
            page: Some(page),
            page_size: Some(page_size),
            ..options()
        });
        let expected = (page.max(1) - 1) * page_size;
        prop_assert_eq!(compiled.offset, expected);
    }

    /// The fetch limit always over-fetches by exactly one row
    #[test]
    fn prop_fetch_limit_overfetches_by_one(page_size in 1i64..=100) {
        let compiled = compile(&ListingListOptions {
            page_size: Some(page_size),
            ..options()
        });
        prop_assert_eq!(compiled.fetch_limit(), compiled.page_size.map(|s| s + 1));
    }

    /// Trimming never reports has_more without dropping a row, and never
    /// returns more rows than the page size
    #[test]
    fn prop_trim_overfetch_exact(total in 0usize..40, page_size in 1usize..=20) {
        let rows: Vec<usize> = (0..total).collect();
        let (page, has_more) = trim_overfetch(rows, page_size);
        prop_assert_eq!(has_more, total > page_size);
        prop_assert_eq!(page.len(), total.min(page_size));
        // Trimming keeps the head of the result set
        for (i, value) in page.iter().enumerate() {
            prop_assert_eq!(*value, i);
        }
    }

    /// Blank free-text inputs never add predicates
    #[test]
    fn prop_blank_inputs_add_no_predicates(blank in "[ \t]{0,6}") {
        let compiled = compile(&ListingListOptions {
            search: Some(blank.clone()),
            condition: Some(blank.clone()),
            location: Some(blank.clone()),
            tag: Some(blank),
            ..options()
        });
        prop_assert_eq!(compiled.predicates, vec![ListingPredicate::PublishedOnly]);
    }

    /// Any non-UUID, non-"all" category value becomes a slug filter with the
    /// trimmed text preserved
    #[test]
    fn prop_category_text_becomes_slug(raw in "[a-z][a-z-]{0,20}") {
        prop_assume!(raw != "all");
        let parsed = CategoryFilter::parse(Some(&raw));
        prop_assert_eq!(parsed, CategoryFilter::Slug(raw));
    }

    /// UUID-shaped category values always become id filters
    #[test]
    fn prop_category_uuid_becomes_id(bytes in prop::array::uniform16(any::<u8>())) {
        let id = Uuid::from_bytes(bytes);
        let parsed = CategoryFilter::parse(Some(&id.to_string()));
        prop_assert_eq!(parsed, CategoryFilter::Id(id));
    }
}
