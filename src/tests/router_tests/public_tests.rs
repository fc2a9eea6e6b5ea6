use crate::db::{inquiries, listings};
use crate::domain::listing::{ListingKind, ListingStatus, NewListing};
use crate::router::App;
use crate::tests::utils::{body_string, get, init_test_app, post_form};
use chrono::{Duration, Utc};

fn seed(app: &App, kind: ListingKind, title: &str, location: &str, price: i64, age_days: i64) -> i64 {
    let listing = NewListing {
        kind: Some(kind),
        title: title.to_string(),
        location: location.to_string(),
        price: Some(price),
        ..Default::default()
    };
    app.db
        .with_conn(|conn| {
            listings::insert_listing(conn, &listing, Utc::now() - Duration::days(age_days))
        })
        .expect("seed listing")
}

#[test]
fn home_page_shows_new_badge_for_fresh_listings() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Fresh Flat", "Pune", 6_000_000, 0);
    seed(&app, ListingKind::Project, "Old Township", "Nashik", 9_000_000, 90);

    let resp = get(&app, "/", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Fresh Flat"));
    assert!(body.contains("Old Township"));
    // Only the fresh listing gets the green "New" badge.
    assert_eq!(body.matches("badge badge-green").count(), 1);
}

#[test]
fn budget_bucket_filters_properties() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Listing A", "Pune", 6_000_000, 1);
    seed(&app, ListingKind::Property, "Listing B", "Pune", 12_000_000, 2);

    let body = body_string(get(&app, "/properties?budget=50-100", None));
    assert!(body.contains("Listing A"));
    assert!(!body.contains("Listing B"));
}

#[test]
fn location_search_is_substring_and_newest_first() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Older East", "Pune - East Zone", 5_000_000, 10);
    seed(&app, ListingKind::Property, "Newer West", "Pune - West Zone", 5_000_000, 1);
    seed(&app, ListingKind::Property, "Bombay Pad", "Mumbai", 5_000_000, 1);

    let body = body_string(get(&app, "/properties?location=Pune", None));
    let newer = body.find("Newer West").expect("newer listing shown");
    let older = body.find("Older East").expect("older listing shown");
    assert!(newer < older, "results should be newest first");
    assert!(!body.contains("Bombay Pad"));
}

#[test]
fn location_search_folds_accented_capitals() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Elite Flat", "ÉLITE Enclave, Baner", 5_000_000, 1);
    seed(&app, ListingKind::Property, "Plain Flat", "Baner", 5_000_000, 1);

    let body = body_string(get(&app, "/properties?location=%C3%A9lite", None));
    assert!(body.contains("Elite Flat"));
    assert!(!body.contains("Plain Flat"));
}

#[test]
fn unknown_filter_values_do_not_hide_results() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Listing A", "Pune", 6_000_000, 1);

    let body = body_string(get(
        &app,
        "/properties?status=demolished&budget=bogus&bedrooms=many&type=all",
        None,
    ));
    assert!(body.contains("Listing A"));
    assert!(body.contains("1 result(s)"));
}

#[test]
fn status_filter_is_exact() {
    let app = init_test_app();
    let ready = NewListing {
        kind: Some(ListingKind::Project),
        title: "Ready Towers".into(),
        location: "Pune".into(),
        status: Some(ListingStatus::Ready),
        ..Default::default()
    };
    let building = NewListing {
        title: "Rising Towers".into(),
        status: Some(ListingStatus::UnderConstruction),
        ..ready.clone()
    };
    app.db
        .with_conn(|conn| {
            listings::insert_listing(conn, &ready, Utc::now())?;
            listings::insert_listing(conn, &building, Utc::now())
        })
        .unwrap();

    let body = body_string(get(&app, "/projects?status=under_construction", None));
    assert!(body.contains("Rising Towers"));
    assert!(!body.contains("Ready Towers"));
}

#[test]
fn projects_page_excludes_properties() {
    let app = init_test_app();
    seed(&app, ListingKind::Property, "Just A Flat", "Pune", 6_000_000, 1);
    seed(&app, ListingKind::Project, "Big Project", "Pune", 25_000_000, 1);

    let body = body_string(get(&app, "/projects?budget=200-plus", None));
    assert!(body.contains("Big Project"));
    assert!(!body.contains("Just A Flat"));
}

#[test]
fn listing_detail_renders_badges_and_similar() {
    let app = init_test_app();
    let listing = NewListing {
        kind: Some(ListingKind::Property),
        title: "Lake View".into(),
        location: "Pune - East Zone".into(),
        badge: Some("Hot Deal".into()),
        custom_badge_text: Some("Corner Unit".into()),
        ..Default::default()
    };
    let id = app
        .db
        .with_conn(|conn| listings::insert_listing(conn, &listing, Utc::now()))
        .unwrap();
    seed(&app, ListingKind::Property, "Neighbour", "Pune - East Zone", 1, 3);

    let resp = get(&app, &format!("/listings/{id}"), None);
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    let new_at = body.find(">New<").expect("New badge");
    let hot_at = body.find(">Hot Deal<").expect("predefined badge");
    let custom_at = body.find(">Corner Unit<").expect("custom badge");
    assert!(new_at < hot_at && hot_at < custom_at);
    assert!(body.contains("Similar listings"));
    assert!(body.contains("Neighbour"));
}

#[test]
fn missing_listing_is_404() {
    let app = init_test_app();
    assert_eq!(get(&app, "/listings/999", None).status(), 404);
    assert_eq!(get(&app, "/listings/abc", None).status(), 404);
    assert_eq!(get(&app, "/nowhere", None).status(), 404);
}

#[test]
fn inquiry_is_stored() {
    let app = init_test_app();
    let id = seed(&app, ListingKind::Property, "Listing A", "Pune", 6_000_000, 1);

    let resp = post_form(
        &app,
        "/inquiries",
        None,
        &format!("listing_id={id}&name=Asha+K&email=asha%40example.com&message=Site+visit%3F"),
    );
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Thank you"));

    let stored = app.db.with_conn(|conn| inquiries::list_inquiries(conn)).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Asha K");
    assert_eq!(stored[0].message.as_deref(), Some("Site visit?"));
    assert_eq!(stored[0].listing_id, Some(id));
}

#[test]
fn inquiry_without_contact_is_rejected() {
    let app = init_test_app();
    let resp = post_form(&app, "/inquiries", None, "name=Asha");
    assert_eq!(resp.status(), 400);

    let stored = app.db.with_conn(|conn| inquiries::list_inquiries(conn)).unwrap();
    assert!(stored.is_empty());
}
