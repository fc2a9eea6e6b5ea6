// templates/pages/home.rs

use crate::domain::listing::Listing;
use crate::templates::{card, desktop_layout, listing_card};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub struct HomeVm {
    pub properties: Vec<(Listing, Option<String>)>,
    pub projects: Vec<(Listing, Option<String>)>,
    pub is_admin: bool,
}

pub fn home_page(vm: &HomeVm, now: DateTime<Utc>) -> Markup {
    desktop_layout(
        "Home",
        vm.is_admin,
        html! {
            main class="container" {
                h1 { "Find your next home" }

                form action="/properties" method="get" class="quick-search" {
                    input type="text" name="location" placeholder="Search by location";
                    button type="submit" class="primary" { "Search" }
                }

                section {
                    h2 { "Latest properties" }
                    div class="listing-grid" {
                        @for (listing, cover) in &vm.properties {
                            (listing_card(listing, cover.as_deref(), now))
                        }
                    }
                    a href="/properties" { "View all properties →" }
                }

                section {
                    h2 { "Builder projects" }
                    div class="listing-grid" {
                        @for (listing, cover) in &vm.projects {
                            (listing_card(listing, cover.as_deref(), now))
                        }
                    }
                    a href="/projects" { "View all projects →" }
                }

                (card("Talk to us", html! {
                    p { "Tell us what you're looking for and an advisor will call you back." }
                    a href="/#enquire" class="btn" { "Enquire now" }
                }))
            }
        },
    )
}
