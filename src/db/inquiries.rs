// src/db/inquiries.rs
use crate::db::db_timestamp;
use crate::domain::inquiry::{Inquiry, NewInquiry};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// Validates and stores an inquiry. A `listing_id` must point at a real listing.
pub fn insert_inquiry(
    conn: &Connection,
    inquiry: NewInquiry,
    now: DateTime<Utc>,
) -> Result<i64, ServerError> {
    let inquiry = inquiry.validate().map_err(ServerError::BadRequest)?;

    if let Some(listing_id) = inquiry.listing_id {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM listings WHERE id = ?1)",
            params![listing_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(ServerError::BadRequest(format!("unknown listing {listing_id}")));
        }
    }

    conn.execute(
        r#"
        INSERT INTO inquiries (listing_id, name, email, phone, message, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            inquiry.listing_id,
            &inquiry.name,
            &inquiry.email,
            &inquiry.phone,
            &inquiry.message,
            db_timestamp(now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All inquiries, newest first, with the listing title when there is one.
pub fn list_inquiries(conn: &Connection) -> Result<Vec<Inquiry>, ServerError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT i.id, i.listing_id, l.title, i.name, i.email, i.phone, i.message, i.created_at
        FROM inquiries i
        LEFT JOIN listings l ON l.id = i.listing_id
        ORDER BY i.created_at DESC, i.id DESC
        "#,
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Inquiry {
            id: row.get(0)?,
            listing_id: row.get(1)?,
            listing_title: row.get(2)?,
            name: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            message: row.get(6)?,
            created_at: row.get(7)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::listings::insert_listing;
    use crate::domain::listing::{ListingKind, NewListing};
    use chrono::{Duration, TimeZone};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(include_str!("../../sql/schema.sql")).unwrap();
        conn
    }

    #[test]
    fn stores_and_lists_newest_first() {
        let conn = conn();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let listing_id = insert_listing(
            &conn,
            &NewListing {
                kind: Some(ListingKind::Project),
                title: "Green Acres".into(),
                location: "Nashik".into(),
                ..Default::default()
            },
            t0,
        )
        .unwrap();

        let general = NewInquiry {
            name: "Ravi".into(),
            email: Some("ravi@example.com".into()),
            ..Default::default()
        };
        let specific = NewInquiry {
            listing_id: Some(listing_id),
            name: "Meera".into(),
            phone: Some("+91 90000 00000".into()),
            ..Default::default()
        };
        insert_inquiry(&conn, general, t0).unwrap();
        insert_inquiry(&conn, specific, t0 + Duration::minutes(5)).unwrap();

        let all = list_inquiries(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Meera");
        assert_eq!(all[0].listing_title.as_deref(), Some("Green Acres"));
        assert_eq!(all[1].listing_title, None);
    }

    #[test]
    fn rejects_unknown_listing_and_invalid_input() {
        let conn = conn();
        let now = Utc::now();
        let dangling = NewInquiry {
            listing_id: Some(42),
            name: "Ravi".into(),
            email: Some("ravi@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(insert_inquiry(&conn, dangling, now), Err(ServerError::BadRequest(_))));

        let anonymous = NewInquiry { name: "Ravi".into(), ..Default::default() };
        assert!(matches!(insert_inquiry(&conn, anonymous, now), Err(ServerError::BadRequest(_))));
    }
}
