pub mod auth;
pub mod config;
pub mod convert;
pub mod profile;
pub mod session;
pub mod settings;
pub mod water;
