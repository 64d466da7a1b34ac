pub mod cli;
pub mod commands;
pub mod config;
pub use config::Config;
pub mod input;
pub mod logging;
pub mod mac;
pub mod oui;
pub mod output;
