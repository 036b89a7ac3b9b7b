pub mod catalog;
pub mod membership;
pub mod recipe;
pub mod shopping_list;
pub mod user;

use serde::de::DeserializeOwned;

use crate::error::RecipesServiceError;

/// Parse a raw query string with `serde_qs`, so `tags[]=a&tags[]=b` style
/// arrays work. An absent query yields the defaults.
fn parse_query<T: DeserializeOwned + Default>(
    raw_query: Option<String>,
) -> Result<T, RecipesServiceError> {
    raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| {
            tracing::debug!(error = %e, "rejecting malformed query string");
            RecipesServiceError::MissingData
        })
        .map(Option::unwrap_or_default)
}

/// `1` and `true` switch a boolean query flag on.
fn query_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true"))
}
