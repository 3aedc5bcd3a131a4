//! Filter compilation for listing catalog queries
//!
//! Turns the loose, partially-optional filter parameters supplied by the UI
//! into a conjunction of SQL predicates plus pagination, without executing
//! anything. Compilation is pure so the defensive input handling (UUID vs
//! slug categories, free-text trimming, page clamping) is testable on its
//! own.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::model::FlowType;

/// Default page size for the public catalog
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Upper bound on the page size a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Loose filter/pagination options as supplied by the caller.
///
/// Field names mirror the marketplace query string (`type`, `flowType`,
/// `pageSize`, ...); everything is optional and normalized during
/// compilation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingListOptions {
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub flow_type: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// The coarse marketplace tab filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTypeFilter {
    /// `te-gjitha`: no predicate
    All,
    /// `shes`: flow type begins with OFFER
    Shes,
    /// `blej`: flow type begins with REQUEST
    Blej,
    /// `sherbime`: flow type begins with SERVICE
    Sherbime,
}

impl ListingTypeFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("shes") => ListingTypeFilter::Shes,
            Some("blej") => ListingTypeFilter::Blej,
            Some("sherbime") => ListingTypeFilter::Sherbime,
            // "te-gjitha", absent, or anything unrecognized
            _ => ListingTypeFilter::All,
        }
    }

    /// The flow-type prefix this tab selects, if any
    pub fn flow_prefix(&self) -> Option<&'static str> {
        match self {
            ListingTypeFilter::All => None,
            ListingTypeFilter::Shes => Some("OFFER"),
            ListingTypeFilter::Blej => Some("REQUEST"),
            ListingTypeFilter::Sherbime => Some("SERVICE"),
        }
    }
}

/// Category filter input resolved once at the boundary.
///
/// Callers may pass either an internal category id or a human slug; the two
/// are told apart by whether the value parses as a UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Id(Uuid),
    Slug(String),
}

impl CategoryFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        let value = match raw.map(str::trim) {
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("all") => v,
            _ => return CategoryFilter::All,
        };
        match Uuid::parse_str(value) {
            Ok(id) => CategoryFilter::Id(id),
            Err(_) => CategoryFilter::Slug(value.to_string()),
        }
    }
}

/// Sort order for catalog queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("oldest") => SortOrder::Oldest,
            _ => SortOrder::Newest,
        }
    }

    pub fn order_by_sql(&self) -> &'static str {
        match self {
            SortOrder::Newest => " ORDER BY l.created_at DESC",
            SortOrder::Oldest => " ORDER BY l.created_at ASC",
        }
    }
}

/// A single compiled predicate against the listings join
#[derive(Debug, Clone, PartialEq)]
pub enum ListingPredicate {
    /// Baseline visibility filter for every public query
    PublishedOnly,
    /// Owner-scoped queries filter by creator instead of visibility
    Owner(Uuid),
    /// Case-insensitive prefix match on the flow-type column
    FlowPrefix(&'static str),
    /// Exact flow-type match
    FlowExact(FlowType),
    /// Flow-type membership
    FlowOneOf(Vec<FlowType>),
    /// Case-insensitive substring match on title OR description
    Search(String),
    CategoryId(Uuid),
    CategorySlug(String),
    /// Exact match on the condition column
    Condition(String),
    /// Case-insensitive substring match on city OR region
    Location(String),
    /// Exact array element in eco_labels, uppercased
    EcoLabel(String),
}

/// A fully compiled catalog query: predicates + sort + pagination
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledListingQuery {
    pub predicates: Vec<ListingPredicate>,
    pub sort: SortOrder,
    /// Requested page size; `None` for unpaginated owner queries
    pub page_size: Option<i64>,
    pub offset: i64,
}

impl CompiledListingQuery {
    /// Rows actually requested: one more than the page size, so the presence
    /// of the extra row yields the has-more flag without a COUNT query.
    pub fn fetch_limit(&self) -> Option<i64> {
        self.page_size.map(|size| size + 1)
    }

    /// Append WHERE conjunction, ORDER BY and LIMIT/OFFSET to a query that
    /// already ends in `WHERE 1=1`.
    pub fn apply_to(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for predicate in &self.predicates {
            match predicate {
                ListingPredicate::PublishedOnly => {
                    qb.push(" AND l.status = 'ACTIVE' AND l.visibility = 'PUBLIC'");
                }
                ListingPredicate::Owner(user_id) => {
                    qb.push(" AND l.created_by_user_id = ");
                    qb.push_bind(*user_id);
                }
                ListingPredicate::FlowPrefix(prefix) => {
                    qb.push(" AND l.flow_type ILIKE ");
                    qb.push_bind(format!("{}%", prefix));
                }
                ListingPredicate::FlowExact(flow) => {
                    qb.push(" AND l.flow_type = ");
                    qb.push_bind(flow.as_str().to_string());
                }
                ListingPredicate::FlowOneOf(flows) => {
                    let values: Vec<String> =
                        flows.iter().map(|f| f.as_str().to_string()).collect();
                    qb.push(" AND l.flow_type = ANY(");
                    qb.push_bind(values);
                    qb.push(")");
                }
                ListingPredicate::Search(term) => {
                    let pattern = format!("%{}%", term);
                    qb.push(" AND (l.title ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR l.description ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
                ListingPredicate::CategoryId(id) => {
                    qb.push(" AND l.category_id = ");
                    qb.push_bind(*id);
                }
                ListingPredicate::CategorySlug(slug) => {
                    qb.push(" AND c.slug = ");
                    qb.push_bind(slug.clone());
                }
                ListingPredicate::Condition(condition) => {
                    qb.push(" AND l.condition = ");
                    qb.push_bind(condition.clone());
                }
                ListingPredicate::Location(term) => {
                    let pattern = format!("%{}%", term);
                    qb.push(" AND (l.city ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR l.region ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
                ListingPredicate::EcoLabel(label) => {
                    qb.push(" AND l.eco_labels @> ");
                    qb.push_bind(vec![label.clone()]);
                }
            }
        }

        qb.push(self.sort.order_by_sql());

        if let Some(limit) = self.fetch_limit() {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
            qb.push(" OFFSET ");
            qb.push_bind(self.offset);
        }
    }
}

/// Compile public catalog options into a predicate conjunction.
///
/// The baseline published-only predicate is always present; everything else
/// is added only when the corresponding input survives trimming.
pub fn compile(options: &ListingListOptions) -> CompiledListingQuery {
    let mut predicates = vec![ListingPredicate::PublishedOnly];

    let tab = ListingTypeFilter::parse(options.listing_type.as_deref());
    if let Some(prefix) = tab.flow_prefix() {
        predicates.push(ListingPredicate::FlowPrefix(prefix));
    }

    // An explicit flow-type list is an additional filter, not a replacement
    // for the tab.
    let flows = parse_flow_list(options.flow_type.as_deref());
    match flows.len() {
        0 => {}
        1 => predicates.push(ListingPredicate::FlowExact(flows[0])),
        _ => predicates.push(ListingPredicate::FlowOneOf(flows)),
    }

    if let Some(term) = non_empty(options.search.as_deref()) {
        predicates.push(ListingPredicate::Search(term));
    }

    match CategoryFilter::parse(options.category.as_deref()) {
        CategoryFilter::All => {}
        CategoryFilter::Id(id) => predicates.push(ListingPredicate::CategoryId(id)),
        CategoryFilter::Slug(slug) => predicates.push(ListingPredicate::CategorySlug(slug)),
    }

    if let Some(condition) = non_empty(options.condition.as_deref()) {
        predicates.push(ListingPredicate::Condition(condition));
    }

    if let Some(location) = non_empty(options.location.as_deref()) {
        predicates.push(ListingPredicate::Location(location));
    }

    if let Some(tag) = non_empty(options.tag.as_deref()) {
        predicates.push(ListingPredicate::EcoLabel(tag.to_uppercase()));
    }

    let page = options.page.unwrap_or(1).max(1);
    let page_size = options
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    CompiledListingQuery {
        predicates,
        sort: SortOrder::parse(options.sort.as_deref()),
        page_size: Some(page_size),
        offset: (page - 1) * page_size,
    }
}

/// Compile the owner-scoped list query: every status, every visibility,
/// restricted by creator identity only.
pub fn compile_for_owner(user_id: Uuid) -> CompiledListingQuery {
    CompiledListingQuery {
        predicates: vec![ListingPredicate::Owner(user_id)],
        sort: SortOrder::Newest,
        page_size: None,
        offset: 0,
    }
}

/// Drop the over-fetched row and report whether more pages exist.
pub fn trim_overfetch<T>(mut rows: Vec<T>, page_size: usize) -> (Vec<T>, bool) {
    let has_more = rows.len() > page_size;
    if has_more {
        rows.truncate(page_size);
    }
    (rows, has_more)
}

fn parse_flow_list(raw: Option<&str>) -> Vec<FlowType> {
    raw.map(|csv| {
        csv.split(',')
            .filter_map(|value| FlowType::from_str(value.trim()))
            .collect()
    })
    .unwrap_or_default()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
