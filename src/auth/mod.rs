pub mod sessions;
pub mod staff;
pub mod token;

pub use staff::{StaffAuth, StaffAuthConfig};
