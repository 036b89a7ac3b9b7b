//! Test utilities for Foodgram crates.
//!
//! Import from tests only, never from production code.

pub mod auth;
