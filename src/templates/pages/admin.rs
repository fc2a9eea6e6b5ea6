use crate::db::listings::{ImportReport, ListingImage, ListingMedia};
use crate::domain::badge::PredefinedBadge;
use crate::domain::inquiry::Inquiry;
use crate::domain::listing::{Listing, ListingKind, ListingStatus, CUSTOM_BADGE_MAX_CHARS};
use crate::templates::components::format_price;
use crate::templates::{badge_stack, desktop_layout};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub struct AdminVm {
    pub listings: Vec<Listing>,
    pub inquiries: Vec<Inquiry>,
}

pub struct EditListingVm {
    pub listing: Listing,
    pub images: Vec<ListingImage>,
    pub videos: Vec<ListingMedia>,
    pub floor_plans: Vec<ListingMedia>,
    pub amenities: Vec<String>,
}

const TH: &str = "padding: 12px 8px; border-bottom: 2px solid #e5e7eb; text-align: left;";
const TD: &str = "padding: 8px; border-bottom: 1px solid #f3f4f6;";

pub fn admin_page(vm: &AdminVm, now: DateTime<Utc>) -> Markup {
    desktop_layout(
        "Admin Dashboard",
        true,
        html! {
            main class="container" {
                h1 { "Admin Dashboard" }

                div class="card" style="margin-bottom: 2rem;" {
                    h3 { "Listings" }
                    p {
                        a href="/admin/export/listings.xlsx" { "Download backup (.xlsx)" }
                    }
                    div style="overflow-x: auto;" {
                        table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                            thead {
                                tr {
                                    th style=(TH) { "ID" }
                                    th style=(TH) { "Kind" }
                                    th style=(TH) { "Title" }
                                    th style=(TH) { "Location" }
                                    th style=(TH) { "Price" }
                                    th style=(TH) { "Badges" }
                                    th style=(TH) { "Created" }
                                    th style=(TH) { "Actions" }
                                }
                            }
                            tbody {
                                @for listing in &vm.listings {
                                    tr {
                                        td style=(TD) { (listing.id) }
                                        td style=(TD) { (listing.kind.as_str()) }
                                        td style=(TD) { a href=(format!("/listings/{}", listing.id)) { (listing.title) } }
                                        td style=(TD) { (listing.location) }
                                        td style=(TD) { (format_price(listing.price)) }
                                        td style=(TD) { (badge_stack(&listing.badges(now))) }
                                        td style=(TD) { (listing.created_at) }
                                        td style=(TD) {
                                            a href=(format!("/admin/listings/{}", listing.id)) { "Edit" }
                                            form action=(format!("/admin/listings/{}/delete", listing.id)) method="post" onsubmit="return confirm('Delete this listing?');" style="display: inline; margin-left: 8px;" {
                                                button type="submit" style="color: #dc2626; background: none; border: none; cursor: pointer; padding: 0;" { "Delete" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                div class="card" style="margin-bottom: 2rem;" {
                    h3 { "Add listing" }
                    (listing_form("/admin/listings", None))
                }

                div class="card" style="margin-bottom: 2rem;" {
                    h3 { "Bulk import" }
                    p class="muted" {
                        "POST a JSON array of listings, or CSV with a header row and "
                        code { "Content-Type: text/csv" } ", to " code { "/admin/import" } "."
                    }
                }

                div class="card" {
                    h3 { "Inquiries" }
                    p { a href="/admin/export/inquiries.xlsx" { "Download inquiries (.xlsx)" } }
                    div style="overflow-x: auto;" {
                        table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                            thead {
                                tr {
                                    th style=(TH) { "#" }
                                    th style=(TH) { "Received" }
                                    th style=(TH) { "Name" }
                                    th style=(TH) { "Contact" }
                                    th style=(TH) { "Listing" }
                                    th style=(TH) { "Message" }
                                }
                            }
                            tbody {
                                @for inquiry in &vm.inquiries {
                                    tr {
                                        td style=(TD) { (inquiry.id) }
                                        td style=(TD) { (inquiry.created_at) }
                                        td style=(TD) { (inquiry.name) }
                                        td style=(TD) {
                                            (inquiry.email.as_deref().unwrap_or(""))
                                            @if let Some(phone) = &inquiry.phone { br; (phone) }
                                        }
                                        td style=(TD) { (inquiry.listing_title.as_deref().unwrap_or("General")) }
                                        td style=(TD) { (inquiry.message.as_deref().unwrap_or("")) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_listing_page(vm: &EditListingVm) -> Markup {
    let id = vm.listing.id;
    desktop_layout(
        "Edit listing",
        true,
        html! {
            main class="container" {
                h1 { "Edit: " (vm.listing.title) }
                p class="muted" { "Created " (vm.listing.created_at) }

                div class="card" style="margin-bottom: 2rem;" {
                    (listing_form(&format!("/admin/listings/{id}"), Some(&vm.listing)))
                }

                div class="card" style="margin-bottom: 2rem;" {
                    h3 { "Images" }
                    ul {
                        @for image in &vm.images {
                            li {
                                (image.url)
                                @if image.is_cover { " " strong { "(cover)" } }
                            }
                        }
                    }
                    form action=(format!("/admin/listings/{id}/images")) method="post" {
                        input type="url" name="url" placeholder="https://..." required;
                        label { input type="checkbox" name="is_cover" value="1"; " Use as cover" }
                        button type="submit" { "Add image" }
                    }
                }

                (media_card("Videos", &format!("/admin/listings/{id}/videos"), &vm.videos))
                (media_card("Floor plans", &format!("/admin/listings/{id}/floor-plans"), &vm.floor_plans))

                div class="card" {
                    h3 { "Amenities" }
                    form action=(format!("/admin/listings/{id}/amenities")) method="post" {
                        textarea name="amenities" rows="6" placeholder="One per line" {
                            (vm.amenities.join("\n"))
                        }
                        button type="submit" { "Save amenities" }
                    }
                }
            }
        },
    )
}

fn media_card(title: &str, action: &str, items: &[ListingMedia]) -> Markup {
    html! {
        div class="card" style="margin-bottom: 2rem;" {
            h3 { (title) }
            ul {
                @for item in items {
                    li data-media-id=(item.id) {
                        (item.url)
                        @if let Some(caption) = &item.caption { " · " (caption) }
                    }
                }
            }
            form action=(action) method="post" {
                input type="url" name="url" placeholder="https://..." required;
                input type="text" name="caption" placeholder="Caption";
                button type="submit" { "Add" }
            }
        }
    }
}

fn listing_form(action: &str, current: Option<&Listing>) -> Markup {
    let text = |f: fn(&Listing) -> Option<&str>| current.and_then(f).unwrap_or("").to_string();
    let num = |f: fn(&Listing) -> Option<i64>| current.and_then(f).map(|n| n.to_string()).unwrap_or_default();

    let kind = current.map(|l| l.kind);
    let status = current.and_then(|l| l.status);
    let badge = text(|l| l.badge.as_deref());

    html! {
        form action=(action) method="post" style="display: grid; gap: 8px; max-width: 520px;" {
            select name="kind" required {
                @for k in [ListingKind::Property, ListingKind::Project] {
                    option value=(k.as_str()) selected[kind == Some(k)] { (k.as_str()) }
                }
            }
            input type="text" name="title" placeholder="Title" value=(text(|l| Some(l.title.as_str()))) required;
            input type="text" name="location" placeholder="Location" value=(text(|l| Some(l.location.as_str()))) required;
            input type="text" name="zone" placeholder="Zone" value=(text(|l| l.zone.as_deref()));
            input type="text" name="property_type" placeholder="Type" value=(text(|l| l.property_type.as_deref()));
            select name="status" {
                option value="" { "No status" }
                @for s in ListingStatus::ALL {
                    option value=(s.as_str()) selected[status == Some(s)] { (s.display_name()) }
                }
            }
            input type="number" name="price" min="0" placeholder="Price (₹)" value=(num(|l| l.price));
            input type="number" name="bedrooms" min="0" placeholder="Bedrooms" value=(num(|l| l.bedrooms));
            select name="badge" {
                option value="" { "No badge" }
                @for b in PredefinedBadge::ALL {
                    option value=(b.label()) selected[badge == b.label()] { (b.label()) }
                }
            }
            input type="text" name="custom_badge_text" maxlength=(CUSTOM_BADGE_MAX_CHARS) placeholder="Custom badge" value=(text(|l| l.custom_badge_text.as_deref()));
            textarea name="description" rows="4" placeholder="Description" { (text(|l| l.description.as_deref())) }
            button type="submit" class="primary" { "Save" }
        }
    }
}

/// Plain-text summary returned by `/admin/import`.
pub fn import_summary(report: &ImportReport) -> String {
    let mut out = format!("inserted: {}\nfailed: {}\n", report.inserted, report.failed);
    for (row, reason) in &report.errors {
        out.push_str(&format!("row {row}: {reason}\n"));
    }
    out
}
