//! Common utilities for the bramble crates.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   recoverable problems such as unmatched end tags

pub mod warning;
