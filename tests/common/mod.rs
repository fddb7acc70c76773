pub mod helpers;
pub mod test_app;

pub use helpers::{admin_token, generate_test_email, register_and_login};
pub use test_app::{TestApp, test_config};
