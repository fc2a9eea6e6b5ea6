// src/domain/listing.rs

use crate::domain::badge::{resolve_badges, DisplayBadge, PredefinedBadge};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const CUSTOM_BADGE_MAX_CHARS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Property,
    Project,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Property => "property",
            ListingKind::Project => "project",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "property" => Some(ListingKind::Property),
            "project" => Some(ListingKind::Project),
            _ => None,
        }
    }
}

/// Lifecycle of a listing. Used for filtering only; badges ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Ready,
    UnderConstruction,
    NewLaunch,
    Sold,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 4] = [
        ListingStatus::Ready,
        ListingStatus::UnderConstruction,
        ListingStatus::NewLaunch,
        ListingStatus::Sold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Ready => "ready",
            ListingStatus::UnderConstruction => "under_construction",
            ListingStatus::NewLaunch => "new_launch",
            ListingStatus::Sold => "sold",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ListingStatus::Ready => "Ready to Move",
            ListingStatus::UnderConstruction => "Under Construction",
            ListingStatus::NewLaunch => "New Launch",
            ListingStatus::Sold => "Sold",
        }
    }

    /// Lenient: accepts `under_construction`, `under-construction`, `Under Construction`.
    pub fn parse(raw: &str) -> Option<Self> {
        let norm = raw.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|s| s.as_str() == norm)
    }
}

/// A property or builder project as stored in `listings`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub kind: ListingKind,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub zone: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<ListingStatus>,
    /// Whole rupees.
    pub price: Option<i64>,
    pub bedrooms: Option<i64>,
    pub badge: Option<String>,
    pub custom_badge_text: Option<String>,
    /// Raw stored timestamp; parsed leniently by the badge resolver.
    pub created_at: String,
}

impl Listing {
    /// Badges as of `now`. Call per render, never store the result.
    pub fn badges(&self, now: DateTime<Utc>) -> Vec<DisplayBadge> {
        resolve_badges(
            Some(&self.created_at),
            self.badge.as_deref(),
            self.custom_badge_text.as_deref(),
            now,
        )
    }
}

/// Input for creating, updating or bulk-importing a listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewListing {
    pub kind: Option<ListingKind>,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub zone: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<ListingStatus>,
    pub price: Option<i64>,
    pub bedrooms: Option<i64>,
    pub badge: Option<String>,
    pub custom_badge_text: Option<String>,
}

impl NewListing {
    /// Checks the write-side rules and normalises blank optional strings to `None`.
    pub fn validate(mut self) -> Result<Self, String> {
        self.title = self.title.trim().to_string();
        self.location = self.location.trim().to_string();

        if self.title.is_empty() {
            return Err("title is required".into());
        }
        if self.location.is_empty() {
            return Err("location is required".into());
        }
        if self.price.is_some_and(|p| p < 0) {
            return Err("price cannot be negative".into());
        }
        if self.bedrooms.is_some_and(|b| b < 0) {
            return Err("bedrooms cannot be negative".into());
        }

        self.description = non_blank(self.description);
        self.zone = non_blank(self.zone);
        self.property_type = non_blank(self.property_type);
        self.custom_badge_text = non_blank(self.custom_badge_text);

        if let Some(text) = &self.custom_badge_text {
            if text.chars().count() > CUSTOM_BADGE_MAX_CHARS {
                return Err(format!(
                    "custom badge text must be at most {CUSTOM_BADGE_MAX_CHARS} characters"
                ));
            }
        }

        self.badge = match non_blank(self.badge) {
            Some(label) => match PredefinedBadge::from_label(&label) {
                Some(b) => Some(b.label().to_string()),
                None => return Err(format!("unknown badge '{label}'")),
            },
            None => None,
        };

        Ok(self)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
