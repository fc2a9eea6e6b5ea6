use crate::domain::badge::primary_badge_text;
use crate::domain::inquiry::Inquiry;
use crate::domain::listing::Listing;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Workbook, Worksheet};

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), ServerError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }
    Ok(())
}

fn cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), ServerError> {
    worksheet
        .write_string(row, col, value)
        .map(|_| ())
        .map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({row}, {col}): {e}")))
}

fn number(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<i64>) -> Result<(), ServerError> {
    match value {
        Some(v) => worksheet
            .write_number(row, col, v as f64)
            .map(|_| ())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write cell ({row}, {col}): {e}"))),
        None => Ok(()),
    }
}

/// Full backup of the catalogue, one row per listing. Badges are resolved as of `now`.
pub fn export_listings_xlsx(listings: &[Listing], now: DateTime<Utc>) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    write_headers(
        worksheet,
        &[
            "ID",
            "Kind",
            "Title",
            "Location",
            "Zone",
            "Type",
            "Status",
            "Price",
            "Bedrooms",
            "Badge",
            "Custom Badge",
            "Primary Badge",
            "Displayed Badges",
            "Created At",
        ],
    )?;

    for (i, listing) in listings.iter().enumerate() {
        let r = (i + 1) as u32;
        let resolved = listing.badges(now);
        let badges = resolved
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        number(worksheet, r, 0, Some(listing.id))?;
        cell(worksheet, r, 1, listing.kind.as_str())?;
        cell(worksheet, r, 2, &listing.title)?;
        cell(worksheet, r, 3, &listing.location)?;
        cell(worksheet, r, 4, listing.zone.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 5, listing.property_type.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 6, listing.status.map(|s| s.as_str()).unwrap_or(""))?;
        number(worksheet, r, 7, listing.price)?;
        number(worksheet, r, 8, listing.bedrooms)?;
        cell(worksheet, r, 9, listing.badge.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 10, listing.custom_badge_text.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 11, &primary_badge_text(&resolved))?;
        cell(worksheet, r, 12, &badges)?;
        cell(worksheet, r, 13, &listing.created_at)?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, &format!("listings_{}.xlsx", now.format("%Y%m%d")))
}

pub fn export_inquiries_xlsx(inquiries: &[Inquiry]) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    write_headers(
        worksheet,
        &["Received", "Name", "Email", "Phone", "Listing", "Message"],
    )?;

    for (i, inquiry) in inquiries.iter().enumerate() {
        let r = (i + 1) as u32;
        cell(worksheet, r, 0, &inquiry.created_at)?;
        cell(worksheet, r, 1, &inquiry.name)?;
        cell(worksheet, r, 2, inquiry.email.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 3, inquiry.phone.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 4, inquiry.listing_title.as_deref().unwrap_or(""))?;
        cell(worksheet, r, 5, inquiry.message.as_deref().unwrap_or(""))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, "inquiries.xlsx")
}
