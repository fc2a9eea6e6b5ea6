pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{badge_stack, card, listing_card};
pub use layouts::desktop::desktop_layout;
