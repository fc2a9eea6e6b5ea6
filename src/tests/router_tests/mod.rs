mod admin_tests;
mod public_tests;
