pub mod connection;
pub mod inquiries;
pub mod listings;

pub use connection::Database;

use chrono::{DateTime, Utc};

/// Format used for every TEXT timestamp column.
pub fn db_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
