// src/domain/badge.rs

use chrono::{DateTime, NaiveDateTime, Utc};

/// Listings younger than this (in whole days) get the automatic "New" badge.
pub const NEW_BADGE_WINDOW_DAYS: i64 = 30;

/// Symbolic badge colour. The templates map these onto CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Green,
    Red,
    Purple,
    Blue,
    /// Fixed colour for staff-written free-text badges.
    Custom,
}

impl BadgeStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            BadgeStyle::Green => "badge badge-green",
            BadgeStyle::Red => "badge badge-red",
            BadgeStyle::Purple => "badge badge-purple",
            BadgeStyle::Blue => "badge badge-blue",
            BadgeStyle::Custom => "badge badge-custom",
        }
    }
}

/// The editorial badge vocabulary staff can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedBadge {
    New,
    BigDiscount,
    SpecialOffer,
    HotDeal,
    PriceReduced,
    Exclusive,
}

impl PredefinedBadge {
    pub const ALL: [PredefinedBadge; 6] = [
        PredefinedBadge::New,
        PredefinedBadge::BigDiscount,
        PredefinedBadge::SpecialOffer,
        PredefinedBadge::HotDeal,
        PredefinedBadge::PriceReduced,
        PredefinedBadge::Exclusive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PredefinedBadge::New => "New",
            PredefinedBadge::BigDiscount => "Big Discount",
            PredefinedBadge::SpecialOffer => "Special Offer",
            PredefinedBadge::HotDeal => "Hot Deal",
            PredefinedBadge::PriceReduced => "Price Reduced",
            PredefinedBadge::Exclusive => "Exclusive",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBadge {
    pub text: String,
    pub style: BadgeStyle,
}

/// Picks a colour for a badge label. Case-insensitive substring match, first rule wins.
pub fn classify_badge(text: &str) -> BadgeStyle {
    let lower = text.to_lowercase();
    let has = |needle: &str| lower.contains(needle);

    if has("new") {
        BadgeStyle::Green
    } else if has("discount") || has("reduced") || has("hot") {
        BadgeStyle::Red
    } else if has("special") || has("exclusive") {
        BadgeStyle::Purple
    } else {
        BadgeStyle::Blue
    }
}

/// Parses a stored timestamp. Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.fff]` (UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Builds the stacked badge list for a listing: auto "New", then the
/// predefined badge, then the custom text. Bad input just drops that entry.
pub fn resolve_badges(
    created_at: Option<&str>,
    badge: Option<&str>,
    custom_badge_text: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<DisplayBadge> {
    let mut badges = Vec::with_capacity(3);

    if let Some(created) = created_at.and_then(parse_timestamp) {
        if now.signed_duration_since(created).num_days() <= NEW_BADGE_WINDOW_DAYS {
            badges.push(DisplayBadge {
                text: PredefinedBadge::New.label().to_string(),
                style: BadgeStyle::Green,
            });
        }
    }

    if let Some(text) = badge.filter(|b| !b.is_empty()) {
        badges.push(DisplayBadge {
            text: text.to_string(),
            style: classify_badge(text),
        });
    }

    if let Some(text) = custom_badge_text.map(str::trim).filter(|t| !t.is_empty()) {
        badges.push(DisplayBadge {
            text: text.to_string(),
            style: BadgeStyle::Custom,
        });
    }

    badges
}

/// Legacy single-badge accessor: the first badge's text, or "".
pub fn primary_badge_text(badges: &[DisplayBadge]) -> String {
    badges.first().map(|b| b.text.clone()).unwrap_or_default()
}
