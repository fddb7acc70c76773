pub mod auth;
pub mod sanitize;
pub mod security;
