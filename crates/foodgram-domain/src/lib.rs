//! Domain types shared across Foodgram crates.
//!
//! Pure types with no framework dependencies. Import in `usecase/` and
//! `domain/` layers; the `infra/` layer converts to and from storage rows.

pub mod id;
pub mod pagination;
pub mod tag;
pub mod user;
