// src/domain/inquiry.rs

use serde::Deserialize;

/// A visitor's enquiry, optionally about one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    pub id: i64,
    pub listing_id: Option<i64>,
    pub listing_title: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewInquiry {
    pub listing_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl NewInquiry {
    /// Needs a name and at least one way to reach the visitor.
    pub fn validate(mut self) -> Result<Self, String> {
        self.name = self.name.trim().to_string();
        self.email = trimmed(self.email);
        self.phone = trimmed(self.phone);
        self.message = trimmed(self.message);

        if self.name.is_empty() {
            return Err("name is required".into());
        }
        if self.email.is_none() && self.phone.is_none() {
            return Err("an email address or phone number is required".into());
        }
        if let Some(email) = &self.email {
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                return Err("invalid email".into());
            }
        }
        Ok(self)
    }
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
