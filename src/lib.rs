//! Mirrors the installer archives of Atlassian server products.
//!
//! A browser session walks each product's download page and yields its
//! releases; releases without a local directory are streamed to disk.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod navigator;
pub mod pages;
pub mod progress;
pub mod sync;
pub mod units;
pub mod utils;
pub mod version;
pub mod webdriver;

pub use error::{Error, Result};
