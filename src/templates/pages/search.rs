// templates/pages/search.rs

use crate::domain::filter::budget_buckets;
use crate::domain::listing::{Listing, ListingKind, ListingStatus};
use crate::templates::{desktop_layout, listing_card};
use chrono::{DateTime, Utc};
use maud::{html, Markup};
use std::collections::HashMap;

pub struct SearchVm<'a> {
    pub kind: ListingKind,
    /// Raw query parameters, echoed back into the form.
    pub params: &'a HashMap<String, String>,
    /// False when no criterion applied, i.e. the full catalogue is shown.
    pub filtered: bool,
    pub results: Vec<(Listing, Option<String>)>,
    pub is_admin: bool,
}

fn budget_label(key: &str) -> String {
    match key {
        "under-50" => "Under ₹50L".to_string(),
        "50-100" => "₹50L – ₹1Cr".to_string(),
        "100-200" => "₹1Cr – ₹2Cr".to_string(),
        "200-300" => "₹2Cr – ₹3Cr".to_string(),
        "200-plus" => "₹2Cr +".to_string(),
        "300-plus" => "₹3Cr +".to_string(),
        other => other.to_string(),
    }
}

pub fn search_page(vm: &SearchVm<'_>, now: DateTime<Utc>) -> Markup {
    let (title, action) = match vm.kind {
        ListingKind::Property => ("Properties", "/properties"),
        ListingKind::Project => ("Projects", "/projects"),
    };
    let param = |key: &str| vm.params.get(key).map(String::as_str).unwrap_or("");

    desktop_layout(
        title,
        vm.is_admin,
        html! {
            main class="container" {
                h1 { (title) }

                form action=(action) method="get" class="filters" {
                    input type="text" name="location" placeholder="Location" value=(param("location"));
                    input type="text" name="zone" placeholder="Zone" value=(param("zone"));
                    input type="text" name="type" placeholder="Type (e.g. Apartment)" value=(param("type"));

                    select name="status" {
                        option value="all" { "Any status" }
                        @for status in ListingStatus::ALL {
                            option value=(status.as_str()) selected[param("status") == status.as_str()] {
                                (status.display_name())
                            }
                        }
                    }

                    select name="budget" {
                        option value="all" { "Any budget" }
                        @for (key, _) in budget_buckets(vm.kind) {
                            option value=(key) selected[param("budget") == *key] { (budget_label(key)) }
                        }
                    }

                    input type="number" name="bedrooms" min="0" placeholder="Bedrooms" value=(param("bedrooms"));
                    button type="submit" class="primary" { "Search" }
                }

                p class="muted" {
                    (vm.results.len()) " result(s)"
                    @if vm.filtered {
                        " · " a href=(action) { "Clear filters" }
                    }
                }

                @if vm.results.is_empty() {
                    p { "No listings match these filters." }
                } @else {
                    div class="listing-grid" {
                        @for (listing, cover) in &vm.results {
                            (listing_card(listing, cover.as_deref(), now))
                        }
                    }
                }
            }
        },
    )
}
