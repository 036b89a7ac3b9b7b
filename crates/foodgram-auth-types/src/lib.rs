//! Identity types shared across Foodgram crates.
//!
//! Authentication happens at the gateway; this crate only reads the identity
//! headers it injects.

pub mod identity;
