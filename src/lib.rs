pub mod api;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod files;
pub mod logging;
pub mod provision;
pub mod ui;
