use crate::db::listings::{self, MediaKind};
use crate::domain::filter::ListingCriteria;
use crate::domain::listing::{ListingKind, ListingStatus};
use crate::responses::xlsx::XLSX_CONTENT_TYPE;
use crate::tests::utils::{
    body_string, get, header, init_test_app, post_csv, post_form, post_json, staff_cookie,
};

#[test]
fn admin_requires_session() {
    let app = init_test_app();

    let resp = get(&app, "/admin", None);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");

    let resp = post_form(&app, "/admin/listings", Some("session=forged"), "title=x");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");
}

#[test]
fn wrong_token_is_rejected() {
    let app = init_test_app();
    let resp = post_form(&app, "/login", None, "token=nope");
    assert_eq!(resp.status(), 401);
    assert!(header(&resp, "Set-Cookie").is_empty());
    assert!(body_string(resp).contains("invalid staff token"));
}

#[test]
fn admin_page_loads_for_staff() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let resp = get(&app, "/admin", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Admin Dashboard"));
}

#[test]
fn staff_can_create_edit_and_delete_listing() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let resp = post_form(
        &app,
        "/admin/listings",
        Some(&cookie),
        "kind=property&title=Palm+Grove&location=Pune&price=6500000&bedrooms=2&badge=Special+Offer",
    );
    assert_eq!(resp.status(), 302);
    let location = header(&resp, "Location");
    let id: i64 = location
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("redirect to the new listing");

    let created = app
        .db
        .with_conn(|conn| listings::get_listing(conn, id))
        .unwrap()
        .expect("listing stored");
    assert_eq!(created.title, "Palm Grove");
    assert_eq!(created.badge.as_deref(), Some("Special Offer"));

    let resp = post_form(
        &app,
        &format!("/admin/listings/{id}"),
        Some(&cookie),
        "title=Palm+Grove+II&location=Pune&custom_badge_text=Sold+Out",
    );
    assert_eq!(resp.status(), 302);
    let edited = app
        .db
        .with_conn(|conn| listings::get_listing(conn, id))
        .unwrap()
        .unwrap();
    assert_eq!(edited.title, "Palm Grove II");
    assert_eq!(edited.custom_badge_text.as_deref(), Some("Sold Out"));
    assert_eq!(edited.created_at, created.created_at);

    let resp = post_form(&app, &format!("/admin/listings/{id}/images"), Some(&cookie), "url=https%3A%2F%2Fcdn.example.com%2Fa.jpg");
    assert_eq!(resp.status(), 302);
    let resp = post_form(&app, &format!("/admin/listings/{id}/amenities"), Some(&cookie), "amenities=Gym%0APool");
    assert_eq!(resp.status(), 302);

    let body = body_string(get(&app, &format!("/admin/listings/{id}"), Some(&cookie)));
    assert!(body.contains("https://cdn.example.com/a.jpg"));
    assert!(body.contains("(cover)"));

    let resp = post_form(&app, &format!("/admin/listings/{id}/delete"), Some(&cookie), "");
    assert_eq!(resp.status(), 302);
    assert_eq!(get(&app, &format!("/listings/{id}"), None).status(), 404);
}

#[test]
fn invalid_listing_form_is_bad_request() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let long_badge = "x".repeat(26);
    let resp = post_form(
        &app,
        "/admin/listings",
        Some(&cookie),
        &format!("kind=property&title=A&location=B&custom_badge_text={long_badge}"),
    );
    assert_eq!(resp.status(), 400);
}

#[test]
fn bulk_import_reports_failures() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let json = r#"[
        {"kind": "property", "title": "Imported One", "location": "Pune", "price": 5000000},
        {"kind": "project", "title": "", "location": "Pune"},
        {"kind": "project", "title": "Imported Two", "location": "Nashik", "status": "new_launch"}
    ]"#;
    let resp = post_json(&app, "/admin/import", Some(&cookie), json);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("inserted: 2"));
    assert!(body.contains("failed: 1"));
    assert!(body.contains("row 2: "));

    let all = app
        .db
        .with_conn(|conn| listings::search_listings(conn, None, &ListingCriteria::default()))
        .unwrap();
    assert_eq!(all.len(), 2);

    let resp = post_json(&app, "/admin/import", Some(&cookie), "{not json");
    assert_eq!(resp.status(), 400);
}

#[test]
fn import_keeps_good_rows_when_others_fail_to_decode() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let json = r#"[
        {"kind": "property", "title": "Survivor", "location": "Pune", "price": 5000000},
        {"kind": "property", "title": "Wrong Status", "location": "Pune", "status": "Under Construction"},
        {"kind": "property", "title": "Wrong Price", "location": "Pune", "price": "60 L"}
    ]"#;
    let resp = post_json(&app, "/admin/import", Some(&cookie), json);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("inserted: 1"));
    assert!(body.contains("failed: 2"));
    assert!(body.contains("row 2: "));
    assert!(body.contains("row 3: "));

    let all = app
        .db
        .with_conn(|conn| listings::search_listings(conn, None, &ListingCriteria::default()))
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Survivor");
}

#[test]
fn csv_import_goes_through_the_same_report() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let csv = "kind,title,location,status,price\n\
               project,Sky Towers,Pune,new_launch,25000000\n\
               property,Bad Price,Pune,,60 L\n\
               property,,Pune,,\n\
               property,Lake View,Nashik,ready,7500000\n";
    let resp = post_csv(&app, "/admin/import", Some(&cookie), csv);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("inserted: 2"));
    assert!(body.contains("failed: 2"));
    assert!(body.contains("row 2: "));
    assert!(body.contains("row 3: "));

    let projects = app
        .db
        .with_conn(|conn| {
            listings::search_listings(conn, Some(ListingKind::Project), &ListingCriteria::default())
        })
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].status, Some(ListingStatus::NewLaunch));
}

#[test]
fn staff_can_attach_videos_and_floor_plans() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    let resp = post_form(
        &app,
        "/admin/listings",
        Some(&cookie),
        "kind=project&title=Sky+Towers&location=Pune",
    );
    let id: i64 = header(&resp, "Location")
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("redirect to the new listing");

    let resp = post_form(
        &app,
        &format!("/admin/listings/{id}/videos"),
        Some(&cookie),
        "url=https%3A%2F%2Fvideo.example.com%2Ftour&caption=Site+walkthrough",
    );
    assert_eq!(resp.status(), 302);
    let resp = post_form(
        &app,
        &format!("/admin/listings/{id}/floor-plans"),
        Some(&cookie),
        "url=https%3A%2F%2Fcdn.example.com%2F3bhk.png&caption=3+BHK",
    );
    assert_eq!(resp.status(), 302);

    let stored = app
        .db
        .with_conn(|conn| listings::list_media(conn, MediaKind::FloorPlan, id))
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].caption.as_deref(), Some("3 BHK"));

    let body = body_string(get(&app, &format!("/listings/{id}"), None));
    assert!(body.contains("Site walkthrough"));
    assert!(body.contains("https://cdn.example.com/3bhk.png"));
    assert!(body.contains("Floor plans"));

    let resp = post_form(&app, "/admin/listings/999/videos", Some(&cookie), "url=https%3A%2F%2Fx");
    assert_eq!(resp.status(), 404);

    let resp = post_form(&app, &format!("/admin/listings/{id}/videos"), None, "url=https%3A%2F%2Fx");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");
}

#[test]
fn exports_are_xlsx() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);

    for uri in ["/admin/export/listings.xlsx", "/admin/export/inquiries.xlsx"] {
        let resp = get(&app, uri, Some(&cookie));
        assert_eq!(resp.status(), 200, "{uri}");
        assert_eq!(header(&resp, "Content-Type"), XLSX_CONTENT_TYPE);
        assert!(header(&resp, "Content-Disposition").starts_with("attachment"));
    }
}

#[test]
fn logout_revokes_session() {
    let app = init_test_app();
    let cookie = staff_cookie(&app);
    assert_eq!(get(&app, "/admin", Some(&cookie)).status(), 200);

    let resp = post_form(&app, "/logout", Some(&cookie), "");
    assert_eq!(resp.status(), 302);
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    assert_eq!(get(&app, "/admin", Some(&cookie)).status(), 302);
}
