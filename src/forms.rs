// src/forms.rs
use crate::domain::listing::{ListingKind, ListingStatus, NewListing};
use crate::errors::ServerError;
use std::collections::HashMap;
use std::io::Read;

/// Request bodies larger than this are rejected.
pub const MAX_BODY_BYTES: u64 = 2 * 1024 * 1024;

pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query.map(parse_urlencoded).unwrap_or_default()
}

/// Later duplicates win.
pub fn parse_urlencoded(raw: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect()
}

pub fn read_body(mut body: astra::Body) -> Result<String, ServerError> {
    let mut buf = String::new();
    let read = body
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;
    if read as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(buf)
}

fn field<'a>(form: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    form.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn optional_number(form: &HashMap<String, String>, key: &str) -> Result<Option<i64>, ServerError> {
    field(form, key)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ServerError::BadRequest(format!("{key} must be a whole number")))
        })
        .transpose()
}

/// Admin listing form. Unlike the public search, bad values here are errors.
pub fn new_listing_from_form(form: &HashMap<String, String>) -> Result<NewListing, ServerError> {
    let kind = field(form, "kind")
        .map(|k| {
            ListingKind::parse(k).ok_or_else(|| ServerError::BadRequest(format!("unknown kind '{k}'")))
        })
        .transpose()?;
    let status = field(form, "status")
        .map(|s| {
            ListingStatus::parse(s)
                .ok_or_else(|| ServerError::BadRequest(format!("unknown status '{s}'")))
        })
        .transpose()?;

    let owned = |key: &str| field(form, key).map(str::to_string);

    let listing = NewListing {
        kind,
        title: owned("title").unwrap_or_default(),
        description: owned("description"),
        location: owned("location").unwrap_or_default(),
        zone: owned("zone"),
        property_type: owned("property_type"),
        status,
        price: optional_number(form, "price")?,
        bedrooms: optional_number(form, "bedrooms")?,
        badge: owned("badge"),
        custom_badge_text: owned("custom_badge_text"),
    };

    listing.validate().map_err(ServerError::BadRequest)
}

/// Bulk import body as a JSON array. Only a body that is not an array at all
/// is an error; each element decodes on its own so one bad row can't sink the rest.
pub fn listing_rows_from_json(raw: &str) -> Result<Vec<Result<NewListing, String>>, ServerError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)
        .map_err(|e| ServerError::BadRequest(format!("expected a JSON array of listings: {e}")))?;

    Ok(values
        .into_iter()
        .map(|v| serde_json::from_value::<NewListing>(v).map_err(|e| e.to_string()))
        .collect())
}

/// Bulk import body as CSV with a header row named after the `NewListing` fields.
/// Missing columns take their defaults; unknown columns are ignored.
pub fn listing_rows_from_csv(raw: &str) -> Vec<Result<NewListing, String>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    reader
        .deserialize::<NewListing>()
        .map(|row| row.map_err(|e| e.to_string()))
        .collect()
}
