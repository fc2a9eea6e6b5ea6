use crate::auth::sessions::{load_session, revoke_session, session_from_cookie_header, SESSION_COOKIE};
use crate::auth::StaffAuth;
use crate::db::{inquiries, listings, Database};
use crate::domain::filter::{filter_listings, ListingCriteria};
use crate::domain::inquiry::NewInquiry;
use crate::domain::listing::{Listing, ListingKind};
use crate::errors::ServerError;
use crate::db::listings::MediaKind;
use crate::forms::{
    listing_rows_from_csv, listing_rows_from_json, new_listing_from_form, parse_query,
    parse_urlencoded, read_body,
};
use crate::responses::{html_response, html_with_status, redirect, text_response, ResultResp};
use crate::spreadsheets::{export_inquiries_xlsx, export_listings_xlsx};
use crate::templates::pages;
use astra::{Body, Request};
use chrono::Utc;
use http::request::Parts;
use std::collections::HashMap;

const HOME_SECTION_SIZE: usize = 6;
const SIMILAR_LISTINGS: usize = 3;

/// Everything a request handler needs.
pub struct App {
    pub db: Database,
    pub staff: StaffAuth,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().trim_end_matches('/').to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => home(app, &parts),
        ("GET", ["properties"]) => search(app, &parts, ListingKind::Property),
        ("GET", ["projects"]) => search(app, &parts, ListingKind::Project),
        ("GET", ["listings", id]) => listing_detail(app, &parts, parse_id(id)?),
        ("POST", ["inquiries"]) => create_inquiry(app, body),

        ("GET", ["login"]) => html_response(pages::login_page(None)),
        ("POST", ["login"]) => login(app, body),
        ("POST", ["logout"]) => logout(app, &parts),

        ("GET", ["admin", ..]) | ("POST", ["admin", ..]) => {
            if !is_staff(app, &parts)? {
                return redirect("/login", None);
            }
            admin_route(app, method.as_str(), &segments[1..], &parts, body)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn admin_route(app: &App, method: &str, rest: &[&str], parts: &Parts, body: Body) -> ResultResp {
    match (method, rest) {
        ("GET", []) => admin_dashboard(app),
        ("POST", ["listings"]) => {
            let listing = new_listing_from_form(&parse_urlencoded(&read_body(body)?))?;
            let id = app
                .db
                .with_conn(|conn| listings::insert_listing(conn, &listing, Utc::now()))?;
            tracing::info!(id, title = %listing.title, "listing created");
            redirect(&format!("/admin/listings/{id}"), None)
        }
        ("GET", ["listings", id]) => edit_listing(app, parse_id(id)?),
        ("POST", ["listings", id]) => {
            let id = parse_id(id)?;
            let listing = new_listing_from_form(&parse_urlencoded(&read_body(body)?))?;
            app.db
                .with_conn(|conn| listings::update_listing(conn, id, &listing))?;
            tracing::info!(id, "listing updated");
            redirect(&format!("/admin/listings/{id}"), None)
        }
        ("POST", ["listings", id, "delete"]) => {
            let id = parse_id(id)?;
            app.db.with_conn(|conn| listings::delete_listing(conn, id))?;
            tracing::info!(id, "listing deleted");
            redirect("/admin", None)
        }
        ("POST", ["listings", id, "images"]) => {
            let id = parse_id(id)?;
            let form = parse_urlencoded(&read_body(body)?);
            let url = form.get("url").map(String::as_str).unwrap_or("");
            let is_cover = form.contains_key("is_cover");
            app.db
                .with_conn(|conn| listings::add_image(conn, id, url, is_cover))?;
            redirect(&format!("/admin/listings/{id}"), None)
        }
        ("POST", ["listings", id, "videos"]) => add_media(app, parse_id(id)?, MediaKind::Video, body),
        ("POST", ["listings", id, "floor-plans"]) => {
            add_media(app, parse_id(id)?, MediaKind::FloorPlan, body)
        }
        ("POST", ["listings", id, "amenities"]) => {
            let id = parse_id(id)?;
            let form = parse_urlencoded(&read_body(body)?);
            let names: Vec<String> = form
                .get("amenities")
                .map(|raw| raw.lines().map(str::to_string).collect())
                .unwrap_or_default();
            app.db
                .with_conn(|conn| listings::set_amenities(conn, id, &names))?;
            redirect(&format!("/admin/listings/{id}"), None)
        }
        ("POST", ["import"]) => import(app, parts, body),
        ("GET", ["export", "listings.xlsx"]) => {
            let all = app
                .db
                .with_conn(|conn| listings::search_listings(conn, None, &ListingCriteria::default()))?;
            export_listings_xlsx(&all, Utc::now())
        }
        ("GET", ["export", "inquiries.xlsx"]) => {
            let all = app.db.with_conn(|conn| inquiries::list_inquiries(conn))?;
            export_inquiries_xlsx(&all)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse::<i64>().map_err(|_| ServerError::NotFound)
}

fn is_staff(app: &App, parts: &Parts) -> Result<bool, ServerError> {
    let Some(token) = session_token(parts) else {
        return Ok(false);
    };
    let now = Utc::now().timestamp();
    let session = app.db.with_conn(|conn| load_session(conn, token, now))?;
    Ok(session.is_some())
}

fn session_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_from_cookie_header)
}

fn with_covers(app: &App, rows: Vec<Listing>) -> Result<Vec<(Listing, Option<String>)>, ServerError> {
    let mut covers = app.db.with_conn(|conn| listings::cover_urls(conn))?;
    Ok(rows
        .into_iter()
        .map(|l| {
            let cover = covers.remove(&l.id);
            (l, cover)
        })
        .collect())
}

fn home(app: &App, parts: &Parts) -> ResultResp {
    let criteria = ListingCriteria::default();
    let (properties, projects) = app.db.with_conn(|conn| {
        let mut properties = listings::search_listings(conn, Some(ListingKind::Property), &criteria)?;
        let mut projects = listings::search_listings(conn, Some(ListingKind::Project), &criteria)?;
        properties.truncate(HOME_SECTION_SIZE);
        projects.truncate(HOME_SECTION_SIZE);
        Ok((properties, projects))
    })?;

    let vm = pages::HomeVm {
        properties: with_covers(app, properties)?,
        projects: with_covers(app, projects)?,
        is_admin: is_staff(app, parts)?,
    };
    html_response(pages::home_page(&vm, Utc::now()))
}

fn search(app: &App, parts: &Parts, kind: ListingKind) -> ResultResp {
    let params: HashMap<String, String> = parse_query(parts.uri.query());
    let criteria = ListingCriteria::from_query(kind, &params);
    let results = app
        .db
        .with_conn(|conn| listings::search_listings(conn, Some(kind), &criteria))?;

    let vm = pages::SearchVm {
        kind,
        params: &params,
        filtered: !criteria.is_empty(),
        results: with_covers(app, results)?,
        is_admin: is_staff(app, parts)?,
    };
    html_response(pages::search_page(&vm, Utc::now()))
}

fn listing_detail(app: &App, parts: &Parts, id: i64) -> ResultResp {
    let (listing, (images, videos, floor_plans), amenities, same_kind) = app.db.with_conn(|conn| {
        let listing = listings::get_listing(conn, id)?.ok_or(ServerError::NotFound)?;
        let images = listings::list_images(conn, id)?;
        let amenities = listings::list_amenities(conn, id)?;
        let videos = listings::list_media(conn, MediaKind::Video, id)?;
        let floor_plans = listings::list_media(conn, MediaKind::FloorPlan, id)?;
        let same_kind =
            listings::search_listings(conn, Some(listing.kind), &ListingCriteria::default())?;
        Ok((listing, (images, videos, floor_plans), amenities, same_kind))
    })?;

    let mut similar: Vec<Listing> = filter_listings(&same_kind, &similar_criteria(&listing))
        .into_iter()
        .filter(|l| l.id != listing.id)
        .collect();
    similar.truncate(SIMILAR_LISTINGS);

    let vm = pages::ListingVm {
        listing,
        images,
        videos,
        floor_plans,
        amenities,
        similar: with_covers(app, similar)?,
        is_admin: is_staff(app, parts)?,
    };
    html_response(pages::listing_page(&vm, Utc::now()))
}

/// Same zone if the listing has one, otherwise the same locality.
fn similar_criteria(listing: &Listing) -> ListingCriteria {
    match &listing.zone {
        Some(zone) => ListingCriteria {
            zone: Some(zone.clone()),
            ..Default::default()
        },
        None => ListingCriteria {
            location: Some(listing.location.clone()),
            ..Default::default()
        },
    }
}

fn create_inquiry(app: &App, body: Body) -> ResultResp {
    let form = parse_urlencoded(&read_body(body)?);
    let text = |key: &str| form.get(key).cloned();

    let listing_id = match form.get("listing_id").map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ServerError::BadRequest("invalid listing id".into()))?,
        ),
        None => None,
    };

    let inquiry = NewInquiry {
        listing_id,
        name: text("name").unwrap_or_default(),
        email: text("email"),
        phone: text("phone"),
        message: text("message"),
    };
    let id = app
        .db
        .with_conn(|conn| inquiries::insert_inquiry(conn, inquiry, Utc::now()))?;
    tracing::info!(id, ?listing_id, "inquiry received");

    html_response(pages::inquiry_thanks_page(listing_id))
}

fn login(app: &App, body: Body) -> ResultResp {
    let form = parse_urlencoded(&read_body(body)?);
    let submitted = form.get("token").map(String::as_str).unwrap_or("");
    let now = Utc::now().timestamp();

    match app.db.with_conn(|conn| app.staff.login(conn, submitted, now)) {
        Ok(token) => {
            let cookie = format!(
                "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
                app.staff.session_ttl_secs()
            );
            redirect("/admin", Some(cookie))
        }
        Err(ServerError::Unauthorized(msg)) => html_with_status(401, pages::login_page(Some(&msg))),
        Err(e) => Err(e),
    }
}

fn logout(app: &App, parts: &Parts) -> ResultResp {
    if let Some(token) = session_token(parts) {
        let now = Utc::now().timestamp();
        app.db.with_conn(|conn| revoke_session(conn, token, now))?;
    }
    let cleared = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    redirect("/", Some(cleared))
}

fn admin_dashboard(app: &App) -> ResultResp {
    let vm = app.db.with_conn(|conn| {
        Ok(pages::AdminVm {
            listings: listings::search_listings(conn, None, &ListingCriteria::default())?,
            inquiries: inquiries::list_inquiries(conn)?,
        })
    })?;
    html_response(pages::admin_page(&vm, Utc::now()))
}

fn edit_listing(app: &App, id: i64) -> ResultResp {
    let vm = app.db.with_conn(|conn| {
        Ok(pages::EditListingVm {
            listing: listings::get_listing(conn, id)?.ok_or(ServerError::NotFound)?,
            images: listings::list_images(conn, id)?,
            videos: listings::list_media(conn, MediaKind::Video, id)?,
            floor_plans: listings::list_media(conn, MediaKind::FloorPlan, id)?,
            amenities: listings::list_amenities(conn, id)?,
        })
    })?;
    html_response(pages::edit_listing_page(&vm))
}

fn add_media(app: &App, id: i64, kind: MediaKind, body: Body) -> ResultResp {
    let form = parse_urlencoded(&read_body(body)?);
    let url = form.get("url").map(String::as_str).unwrap_or("");
    let caption = form.get("caption").map(String::as_str);
    app.db
        .with_conn(|conn| listings::add_media(conn, kind, id, url, caption))?;
    tracing::info!(id, ?kind, "listing media added");
    redirect(&format!("/admin/listings/{id}"), None)
}

/// CSV when the request says `text/csv`, otherwise a JSON array.
fn import(app: &App, parts: &Parts, body: Body) -> ResultResp {
    let is_csv = parts
        .headers
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/csv"));

    let raw = read_body(body)?;
    let rows = if is_csv {
        listing_rows_from_csv(&raw)
    } else {
        listing_rows_from_json(&raw)?
    };

    let report = app
        .db
        .with_conn(|conn| listings::import_listings(conn, rows, Utc::now()))?;
    tracing::info!(inserted = report.inserted, failed = report.failed, "bulk import finished");

    text_response(200, pages::import_summary(&report))
}
