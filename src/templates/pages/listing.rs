// templates/pages/listing.rs

use crate::db::listings::{ListingImage, ListingMedia};
use crate::domain::listing::Listing;
use crate::templates::components::format_price;
use crate::templates::{badge_stack, desktop_layout, listing_card};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub struct ListingVm {
    pub listing: Listing,
    pub images: Vec<ListingImage>,
    pub videos: Vec<ListingMedia>,
    pub floor_plans: Vec<ListingMedia>,
    pub amenities: Vec<String>,
    pub similar: Vec<(Listing, Option<String>)>,
    pub is_admin: bool,
}

pub fn listing_page(vm: &ListingVm, now: DateTime<Utc>) -> Markup {
    let listing = &vm.listing;

    desktop_layout(
        &listing.title,
        vm.is_admin,
        html! {
            main class="container" {
                div class="gallery" {
                    (badge_stack(&listing.badges(now)))
                    @for image in &vm.images {
                        img src=(image.url) alt=(listing.title) data-image-id=(image.id) class=[image.is_cover.then_some("cover")];
                    }
                }

                h1 { (listing.title) }
                p class="muted" {
                    (listing.location)
                    @if let Some(zone) = &listing.zone { " · " (zone) }
                }
                p class="price" { (format_price(listing.price)) }

                ul class="facts" {
                    @if let Some(beds) = listing.bedrooms { li { (beds) " BHK" } }
                    @if let Some(kind) = &listing.property_type { li { (kind) } }
                    @if let Some(status) = listing.status { li { (status.display_name()) } }
                }

                @if let Some(description) = &listing.description {
                    p { (description) }
                }

                @if !vm.amenities.is_empty() {
                    section {
                        h2 { "Amenities" }
                        ul class="amenities" {
                            @for amenity in &vm.amenities { li { (amenity) } }
                        }
                    }
                }

                @if !vm.videos.is_empty() {
                    section {
                        h2 { "Videos" }
                        ul class="media-links" {
                            @for video in &vm.videos {
                                li { a href=(video.url) target="_blank" rel="noopener" { (video.caption.as_deref().unwrap_or("Watch video")) } }
                            }
                        }
                    }
                }

                @if !vm.floor_plans.is_empty() {
                    section {
                        h2 { "Floor plans" }
                        div class="floor-plans" {
                            @for plan in &vm.floor_plans {
                                figure {
                                    img src=(plan.url) alt=(plan.caption.as_deref().unwrap_or(listing.title.as_str())) loading="lazy";
                                    @if let Some(caption) = &plan.caption { figcaption { (caption) } }
                                }
                            }
                        }
                    }
                }

                section id="enquire" class="card" {
                    h2 { "Enquire about this listing" }
                    form action="/inquiries" method="post" {
                        input type="hidden" name="listing_id" value=(listing.id);
                        input type="text" name="name" placeholder="Your name" required;
                        input type="email" name="email" placeholder="Email";
                        input type="tel" name="phone" placeholder="Phone";
                        textarea name="message" placeholder="Message" {}
                        button type="submit" class="primary" { "Send enquiry" }
                    }
                }

                @if !vm.similar.is_empty() {
                    section {
                        h2 { "Similar listings" }
                        div class="listing-grid" {
                            @for (other, cover) in &vm.similar {
                                (listing_card(other, cover.as_deref(), now))
                            }
                        }
                    }
                }

                @if vm.is_admin {
                    a href=(format!("/admin/listings/{}", listing.id)) { "Edit listing" }
                }
            }
        },
    )
}

pub fn inquiry_thanks_page(listing_id: Option<i64>) -> Markup {
    desktop_layout(
        "Thank you",
        false,
        html! {
            main class="container narrow" {
                h1 { "Thank you!" }
                p { "We have received your enquiry and will get back to you shortly." }
                @match listing_id {
                    Some(id) => a href=(format!("/listings/{id}")) { "← Back to the listing" },
                    None => a href="/" { "← Back to home" },
                }
            }
        },
    )
}
