use std::io::Read;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

use foodgram_recipes::domain::types::NewIngredient;

#[derive(Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

impl From<IngredientRecord> for NewIngredient {
    fn from(r: IngredientRecord) -> Self {
        Self {
            name: r.name,
            measurement_unit: r.measurement_unit,
        }
    }
}

/// Parse CSV with a `name,measurement_unit` header row.
pub fn parse_ingredients_csv(input: impl Read) -> Result<Vec<NewIngredient>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    reader
        .deserialize::<IngredientRecord>()
        .enumerate()
        .map(|(n, row)| {
            row.map(NewIngredient::from)
                .with_context(|| format!("bad ingredient record #{}", n + 1))
        })
        .collect()
}

/// Parse a JSON array of `{"name", "measurement_unit"}` objects.
pub fn parse_ingredients_json(json: &str) -> Result<Vec<NewIngredient>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_str(json).context("ingredient file is not a JSON array of records")?;
    Ok(records.into_iter().map(NewIngredient::from).collect())
}

/// Files ending in `.json` are read as JSON, anything else as CSV.
pub fn read_ingredients(path: &Path) -> Result<Vec<NewIngredient>> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let records = if is_json {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_ingredients_json(&json)
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        parse_ingredients_csv(file)
    };
    records.with_context(|| format!("failed to parse {}", path.display()))
}
