// src/domain/filter.rs

use crate::domain::listing::{Listing, ListingKind, ListingStatus};
use crate::domain::badge::parse_timestamp;
use std::collections::HashMap;

const LAKH_50: i64 = 5_000_000;
const CRORE_1: i64 = 10_000_000;
const CRORE_2: i64 = 20_000_000;
const CRORE_3: i64 = 30_000_000;

/// Inclusive price bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

const PROPERTY_BUDGETS: &[(&str, PriceRange)] = &[
    ("under-50", PriceRange { min: None, max: Some(LAKH_50) }),
    ("50-100", PriceRange { min: Some(LAKH_50), max: Some(CRORE_1) }),
    ("100-200", PriceRange { min: Some(CRORE_1), max: Some(CRORE_2) }),
    ("200-300", PriceRange { min: Some(CRORE_2), max: Some(CRORE_3) }),
    ("300-plus", PriceRange { min: Some(CRORE_3), max: None }),
];

const PROJECT_BUDGETS: &[(&str, PriceRange)] = &[
    ("under-50", PriceRange { min: None, max: Some(LAKH_50) }),
    ("50-100", PriceRange { min: Some(LAKH_50), max: Some(CRORE_1) }),
    ("100-200", PriceRange { min: Some(CRORE_1), max: Some(CRORE_2) }),
    ("200-plus", PriceRange { min: Some(CRORE_2), max: None }),
];

pub fn budget_buckets(kind: ListingKind) -> &'static [(&'static str, PriceRange)] {
    match kind {
        ListingKind::Property => PROPERTY_BUDGETS,
        ListingKind::Project => PROJECT_BUDGETS,
    }
}

/// Looks up a named budget bucket. Unknown keys mean "no constraint".
pub fn budget_range(kind: ListingKind, key: &str) -> PriceRange {
    budget_buckets(kind)
        .iter()
        .find(|(name, _)| *name == key.trim())
        .map(|(_, range)| *range)
        .unwrap_or_default()
}

/// Search criteria. `None` everywhere means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCriteria {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<ListingStatus>,
    pub zone: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub bedrooms: Option<i64>,
}

impl ListingCriteria {
    /// Builds criteria from search query parameters. Anything blank, `"all"`,
    /// or unparseable is ignored rather than rejected.
    pub fn from_query(kind: ListingKind, params: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
                .map(str::to_string)
        };
        let number = |key: &str| text(key).and_then(|v| v.parse::<i64>().ok());

        let budget = text("budget")
            .map(|key| budget_range(kind, &key))
            .unwrap_or_default();

        Self {
            location: text("location"),
            property_type: text("type"),
            status: text("status").and_then(|s| ListingStatus::parse(&s)),
            zone: text("zone"),
            min_price: number("min_price").or(budget.min),
            max_price: number("max_price").or(budget.max),
            bedrooms: number("bedrooms"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(q) = &self.location {
            if !listing.location.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        if self.zone.is_some() && listing.zone != self.zone {
            return false;
        }
        if self.property_type.is_some() && listing.property_type != self.property_type {
            return false;
        }
        if self.status.is_some() && listing.status != self.status {
            return false;
        }
        if let Some(min) = self.min_price {
            if !listing.price.is_some_and(|p| p >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if !listing.price.is_some_and(|p| p <= max) {
                return false;
            }
        }
        if self.bedrooms.is_some() && listing.bedrooms != self.bedrooms {
            return false;
        }
        true
    }
}

/// Applies `criteria` and returns the survivors newest first.
pub fn filter_listings(all: &[Listing], criteria: &ListingCriteria) -> Vec<Listing> {
    let mut out: Vec<Listing> = all.iter().filter(|l| criteria.matches(l)).cloned().collect();
    sort_newest_first(&mut out);
    out
}

/// Unparseable timestamps sort last.
pub fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by_cached_key(|l| std::cmp::Reverse(parse_timestamp(&l.created_at)));
}
