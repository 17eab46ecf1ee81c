//! # Trustgate Common Library
//!
//! Shared code for the trustgate services:
//! - Error type shared by storage and configuration
//! - TOML configuration loading and defaults
//! - SQLite schema, document models and queries

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
