// src/db/listings.rs
use crate::db::db_timestamp;
use crate::domain::filter::ListingCriteria;
use crate::domain::listing::{Listing, ListingKind, ListingStatus, NewListing};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const LISTING_COLUMNS: &str = r#"
    id, kind, title, description, location, zone, property_type, status,
    price, bedrooms, badge, custom_badge_text, created_at
"#;

#[derive(Debug, Clone, PartialEq)]
pub struct ListingImage {
    pub id: i64,
    pub url: String,
    pub is_cover: bool,
}

/// Secondary media kept per listing alongside the photo gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    FloorPlan,
}

impl MediaKind {
    fn table(self) -> &'static str {
        match self {
            MediaKind::Video => "listing_videos",
            MediaKind::FloorPlan => "listing_floor_plans",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingMedia {
    pub id: i64,
    pub url: String,
    pub caption: Option<String>,
}

/// Outcome of a bulk import. Failed rows are reported, not fatal.
#[derive(Debug, Default, PartialEq)]
pub struct ImportReport {
    pub inserted: usize,
    pub failed: usize,
    /// `(1-based row number, reason)`
    pub errors: Vec<(usize, String)>,
}

fn map_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
    let kind: String = row.get(1)?;
    let status: Option<String> = row.get(7)?;
    Ok(Listing {
        id: row.get(0)?,
        kind: ListingKind::parse(&kind).unwrap_or(ListingKind::Property),
        title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        zone: row.get(5)?,
        property_type: row.get(6)?,
        status: status.as_deref().and_then(ListingStatus::parse),
        price: row.get(8)?,
        bedrooms: row.get(9)?,
        badge: row.get(10)?,
        custom_badge_text: row.get(11)?,
        created_at: row.get(12)?,
    })
}

pub fn insert_listing(
    conn: &Connection,
    listing: &NewListing,
    now: DateTime<Utc>,
) -> Result<i64, ServerError> {
    let kind = listing
        .kind
        .ok_or_else(|| ServerError::BadRequest("kind is required".into()))?;

    conn.execute(
        r#"
        INSERT INTO listings (
            kind, title, description, location, zone, property_type, status,
            price, bedrooms, badge, custom_badge_text, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            kind.as_str(),
            &listing.title,
            &listing.description,
            &listing.location,
            &listing.zone,
            &listing.property_type,
            listing.status.map(ListingStatus::as_str),
            listing.price,
            listing.bedrooms,
            &listing.badge,
            &listing.custom_badge_text,
            db_timestamp(now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrites the editable fields. `created_at` is never touched.
pub fn update_listing(conn: &Connection, id: i64, listing: &NewListing) -> Result<(), ServerError> {
    let changed = conn.execute(
        r#"
        UPDATE listings SET
            kind = COALESCE(?1, kind), title = ?2, description = ?3, location = ?4,
            zone = ?5, property_type = ?6, status = ?7, price = ?8, bedrooms = ?9,
            badge = ?10, custom_badge_text = ?11
        WHERE id = ?12
        "#,
        params![
            listing.kind.map(ListingKind::as_str),
            &listing.title,
            &listing.description,
            &listing.location,
            &listing.zone,
            &listing.property_type,
            listing.status.map(ListingStatus::as_str),
            listing.price,
            listing.bedrooms,
            &listing.badge,
            &listing.custom_badge_text,
            id,
        ],
    )?;

    if changed == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_listing(conn: &mut Connection, id: i64) -> Result<(), ServerError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM listing_images WHERE listing_id = ?1", params![id])?;
    tx.execute("DELETE FROM listing_videos WHERE listing_id = ?1", params![id])?;
    tx.execute("DELETE FROM listing_floor_plans WHERE listing_id = ?1", params![id])?;
    tx.execute("DELETE FROM listing_amenities WHERE listing_id = ?1", params![id])?;
    tx.execute("UPDATE inquiries SET listing_id = NULL WHERE listing_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM listings WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    tx.commit()?;
    Ok(())
}

pub fn get_listing(conn: &Connection, id: i64) -> Result<Option<Listing>, ServerError> {
    let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1");
    conn.query_row(&sql, params![id], map_listing)
        .optional()
        .map_err(|e| ServerError::DbError(e.to_string()))
}

/// One parameterised query per search. Same semantics as
/// `domain::filter::filter_listings`, newest first.
pub fn search_listings(
    conn: &Connection,
    kind: Option<ListingKind>,
    criteria: &ListingCriteria,
) -> Result<Vec<Listing>, ServerError> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(kind) = kind {
        clauses.push("kind = ?");
        values.push(Value::Text(kind.as_str().to_string()));
    }
    if let Some(location) = &criteria.location {
        // instr() so '%' and '_' in user input stay literal
        clauses.push("instr(fold_case(location), fold_case(?)) > 0");
        values.push(Value::Text(location.clone()));
    }
    if let Some(zone) = &criteria.zone {
        clauses.push("zone = ?");
        values.push(Value::Text(zone.clone()));
    }
    if let Some(property_type) = &criteria.property_type {
        clauses.push("property_type = ?");
        values.push(Value::Text(property_type.clone()));
    }
    if let Some(status) = criteria.status {
        clauses.push("status = ?");
        values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(min) = criteria.min_price {
        clauses.push("price >= ?");
        values.push(Value::Integer(min));
    }
    if let Some(max) = criteria.max_price {
        clauses.push("price <= ?");
        values.push(Value::Integer(max));
    }
    if let Some(bedrooms) = criteria.bedrooms {
        clauses.push("bedrooms = ?");
        values.push(Value::Integer(bedrooms));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    let sql = format!(
        "SELECT {LISTING_COLUMNS} FROM listings {where_sql} ORDER BY created_at DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), map_listing)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_images(conn: &Connection, listing_id: i64) -> Result<Vec<ListingImage>, ServerError> {
    let mut stmt = conn.prepare(
        "SELECT id, url, is_cover FROM listing_images WHERE listing_id = ?1 ORDER BY is_cover DESC, position, id",
    )?;
    let rows = stmt.query_map(params![listing_id], |row| {
        Ok(ListingImage {
            id: row.get(0)?,
            url: row.get(1)?,
            is_cover: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Appends an image. The first image of a listing always becomes its cover.
pub fn add_image(
    conn: &mut Connection,
    listing_id: i64,
    url: &str,
    is_cover: bool,
) -> Result<i64, ServerError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ServerError::BadRequest("image url is required".into()));
    }

    let tx = conn.transaction()?;
    ensure_listing_exists(&tx, listing_id)?;

    let has_cover: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM listing_images WHERE listing_id = ?1 AND is_cover = 1)",
        params![listing_id],
        |row| row.get(0),
    )?;
    let make_cover = is_cover || !has_cover;
    if make_cover {
        tx.execute(
            "UPDATE listing_images SET is_cover = 0 WHERE listing_id = ?1",
            params![listing_id],
        )?;
    }

    tx.execute(
        r#"
        INSERT INTO listing_images (listing_id, url, is_cover, position)
        VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(position), 0) + 1 FROM listing_images WHERE listing_id = ?1))
        "#,
        params![listing_id, url, make_cover],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Cover image per listing, keyed by listing id.
pub fn cover_urls(conn: &Connection) -> Result<HashMap<i64, String>, ServerError> {
    let mut stmt = conn.prepare("SELECT listing_id, url FROM listing_images WHERE is_cover = 1")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

    let mut out = HashMap::new();
    for row in rows {
        let (id, url) = row?;
        out.insert(id, url);
    }
    Ok(out)
}

pub fn list_media(
    conn: &Connection,
    kind: MediaKind,
    listing_id: i64,
) -> Result<Vec<ListingMedia>, ServerError> {
    let sql = format!(
        "SELECT id, url, caption FROM {} WHERE listing_id = ?1 ORDER BY position, id",
        kind.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![listing_id], |row| {
        Ok(ListingMedia {
            id: row.get(0)?,
            url: row.get(1)?,
            caption: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Appends a video or floor plan after the existing ones.
pub fn add_media(
    conn: &Connection,
    kind: MediaKind,
    listing_id: i64,
    url: &str,
    caption: Option<&str>,
) -> Result<i64, ServerError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ServerError::BadRequest("media url is required".into()));
    }
    ensure_listing_exists(conn, listing_id)?;

    let caption = caption.map(str::trim).filter(|c| !c.is_empty());
    let table = kind.table();
    conn.execute(
        &format!(
            "INSERT INTO {table} (listing_id, url, caption, position) \
             VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(position), 0) + 1 FROM {table} WHERE listing_id = ?1))"
        ),
        params![listing_id, url, caption],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_amenities(conn: &Connection, listing_id: i64) -> Result<Vec<String>, ServerError> {
    let mut stmt =
        conn.prepare("SELECT name FROM listing_amenities WHERE listing_id = ?1 ORDER BY name")?;
    let rows = stmt.query_map(params![listing_id], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Replaces the amenity list. Blank and duplicate names are dropped.
pub fn set_amenities(
    conn: &mut Connection,
    listing_id: i64,
    names: &[String],
) -> Result<(), ServerError> {
    let tx = conn.transaction()?;
    ensure_listing_exists(&tx, listing_id)?;

    tx.execute(
        "DELETE FROM listing_amenities WHERE listing_id = ?1",
        params![listing_id],
    )?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO listing_amenities (listing_id, name) VALUES (?1, ?2)",
        )?;
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            stmt.execute(params![listing_id, name])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Inserts rows one by one inside a single transaction. Each row arrives
/// already decoded, or as the reason it could not be. A bad row is recorded
/// in the report and skipped; the rest still go in.
pub fn import_listings<I>(
    conn: &mut Connection,
    rows: I,
    now: DateTime<Utc>,
) -> Result<ImportReport, ServerError>
where
    I: IntoIterator<Item = Result<NewListing, String>>,
{
    let tx = conn.transaction()?;
    let mut report = ImportReport::default();

    for (i, row) in rows.into_iter().enumerate() {
        let row_no = i + 1;
        let result = row
            .and_then(NewListing::validate)
            .map_err(ServerError::BadRequest)
            .and_then(|valid| insert_listing(&tx, &valid, now));

        match result {
            Ok(_) => report.inserted += 1,
            Err(e) => {
                tracing::warn!(row = row_no, error = %e, "skipping import row");
                report.failed += 1;
                report.errors.push((row_no, e.to_string()));
            }
        }
    }

    tx.commit()?;
    Ok(report)
}

fn ensure_listing_exists(conn: &Connection, listing_id: i64) -> Result<(), ServerError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM listings WHERE id = ?1)",
        params![listing_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(ServerError::NotFound)
    }
}
