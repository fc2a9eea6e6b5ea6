use crate::auth::{StaffAuth, StaffAuthConfig};
use crate::db::connection::{init_db, Database};
use crate::router::{handle, App};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_ADMIN_TOKEN: &str = "test-staff-token";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh app backed by a brand-new SQLite file using the production schema.
pub fn init_test_app() -> App {
    let path = std::env::temp_dir().join(format!(
        "brokerage_test_{}_{}_{}.sqlite",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        DB_COUNTER.fetch_add(1, Ordering::Relaxed),
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    App {
        db,
        staff: StaffAuth::new(StaffAuthConfig {
            admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
            session_ttl_secs: 3600,
        }),
    }
}

pub fn get(app: &App, uri: &str, cookie: Option<&str>) -> Response {
    send(app, Method::GET, uri, cookie, None, Body::empty())
}

pub fn post_form(app: &App, uri: &str, cookie: Option<&str>, form: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        cookie,
        Some("application/x-www-form-urlencoded"),
        Body::from(form.as_bytes().to_vec()),
    )
}

pub fn post_json(app: &App, uri: &str, cookie: Option<&str>, json: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        cookie,
        Some("application/json"),
        Body::from(json.as_bytes().to_vec()),
    )
}

pub fn post_csv(app: &App, uri: &str, cookie: Option<&str>, csv: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        cookie,
        Some("text/csv; charset=utf-8"),
        Body::from(csv.as_bytes().to_vec()),
    )
}

fn send(
    app: &App,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    if let Some(ct) = content_type {
        builder = builder.header("Content-Type", ct);
    }
    let req = builder.body(body).unwrap();

    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => crate::responses::html_error_response(err),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Logs in with the staff token and returns a ready-to-send Cookie header.
pub fn staff_cookie(app: &App) -> String {
    let resp = post_form(app, "/login", None, &format!("token={TEST_ADMIN_TOKEN}"));
    assert_eq!(resp.status(), 302, "staff login should redirect");
    let set_cookie = header(&resp, "Set-Cookie");
    set_cookie
        .split(';')
        .next()
        .expect("Set-Cookie header")
        .to_string()
}
