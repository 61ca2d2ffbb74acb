pub mod commands;
pub mod config;
pub mod error;
pub mod keyring;
pub mod notify;
pub mod platform;
pub mod profile;
pub mod session;
pub mod settings;
pub mod store;
pub mod sync;
pub mod units;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
