pub mod admin;
pub mod home;
pub mod listing;
pub mod login;
pub mod search;

pub use admin::{admin_page, edit_listing_page, import_summary, AdminVm, EditListingVm};
pub use home::{home_page, HomeVm};
pub use listing::{inquiry_thanks_page, listing_page, ListingVm};
pub use login::login_page;
pub use search::{search_page, SearchVm};
