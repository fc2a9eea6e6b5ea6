pub mod badge;
pub mod filter;
pub mod inquiry;
pub mod listing;
