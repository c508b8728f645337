//! Common utilities for the Bramble engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - deduplicated, colored terminal output for recovered input
//! - **URL Resolution** - resolving `href`/`src` attributes against a page URL

pub mod url;
pub mod warning;
