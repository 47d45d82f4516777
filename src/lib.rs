pub mod api;
pub mod config;
pub mod export;
pub mod gallery;
pub mod i18n;
pub mod loader;
pub mod page;
pub mod retry;
pub mod sanitize;
pub mod server;
pub mod translation;
