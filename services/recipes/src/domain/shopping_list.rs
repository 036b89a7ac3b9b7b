//! Shopping list aggregation and plain-text export.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// One ingredient line of one recipe in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Group lines by `(name, unit)` and sum their amounts.
///
/// Items come out ordered by name, then unit. Sums are widened to `i64` so
/// many large lines cannot overflow.
pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Vec<ShoppingListItem> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += i64::from(line.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

pub fn render_export(username: &str, date: NaiveDate, items: &[ShoppingListItem]) -> String {
    let mut out = format!(
        "Shopping list for {username}\nDate: {}\n\n",
        date.format("%Y-%m-%d")
    );
    for item in items {
        out.push_str(&format!(
            "- {} ({}) - {}\n",
            item.name, item.measurement_unit, item.total_amount
        ));
    }
    out
}

pub fn export_filename(username: &str) -> String {
    format!("{username}_shopping.txt")
}
