//! Tag reference-data rules.

use thiserror::Error;

/// Reason a tag record was rejected before import.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTag {
    #[error("tag name must be 1-50 chars")]
    Name,
    #[error("tag color must be #RRGGBB: {0:?}")]
    Color(String),
    #[error("tag slug must be 1-70 chars of [-a-zA-Z0-9_]: {0:?}")]
    Slug(String),
}

/// Check a tag's name, color and slug formats.
pub fn validate_tag(name: &str, color: &str, slug: &str) -> Result<(), InvalidTag> {
    if name.is_empty() || name.chars().count() > 50 {
        return Err(InvalidTag::Name);
    }
    if !is_hex_color(color) {
        return Err(InvalidTag::Color(color.to_owned()));
    }
    if !is_slug(slug) {
        return Err(InvalidTag::Slug(slug.to_owned()));
    }
    Ok(())
}

/// `#` followed by exactly six hex digits.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn is_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 70
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
