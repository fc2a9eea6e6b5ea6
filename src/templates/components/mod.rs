use crate::domain::badge::DisplayBadge;
use crate::domain::listing::Listing;
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub mod error;

pub use error::error_page;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Badges stacked in resolver order over the listing image.
pub fn badge_stack(badges: &[DisplayBadge]) -> Markup {
    html! {
        @if !badges.is_empty() {
            div class="badge-stack" {
                @for badge in badges {
                    span class=(badge.style.css_class()) { (badge.text) }
                }
            }
        }
    }
}

/// Indian-style short price: "₹60 L", "₹1.25 Cr". Missing price reads "Price on request".
pub fn format_price(price: Option<i64>) -> String {
    match price {
        None => "Price on request".to_string(),
        Some(p) if p >= 10_000_000 => format!("₹{} Cr", trim_decimals(p as f64 / 10_000_000.0)),
        Some(p) if p >= 100_000 => format!("₹{} L", trim_decimals(p as f64 / 100_000.0)),
        Some(p) => format!("₹{p}"),
    }
}

fn trim_decimals(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn listing_card(listing: &Listing, cover_url: Option<&str>, now: DateTime<Utc>) -> Markup {
    html! {
        article class="listing-card" {
            a href=(format!("/listings/{}", listing.id)) {
                div class="listing-media" {
                    @if let Some(url) = cover_url {
                        img src=(url) alt=(listing.title) loading="lazy";
                    }
                    (badge_stack(&listing.badges(now)))
                }
                h3 { (listing.title) }
            }
            p class="muted" { (listing.location) }
            p class="price" { (format_price(listing.price)) }
            ul class="facts" {
                @if let Some(beds) = listing.bedrooms {
                    li { (beds) " BHK" }
                }
                @if let Some(kind) = &listing.property_type {
                    li { (kind) }
                }
                @if let Some(status) = listing.status {
                    li { (status.display_name()) }
                }
            }
        }
    }
}
