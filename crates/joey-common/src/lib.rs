//! Common utilities for the Joey renderer.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - deduplicated recoverable-error logging
//! - **URL Resolution** - relative reference resolution for linked resources
//! - **Document Sources** - fetching markup and stylesheet text

pub mod net;
pub mod url;
pub mod warning;
