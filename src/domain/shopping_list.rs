use std::fmt;

use serde::{Deserialize, Serialize};

/// File name offered to the client when downloading the shopping list.
pub const SHOPPING_LIST_FILENAME: &str = "my_shopping_cart.txt";

/// Total quantity of one ingredient across every recipe in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl ShoppingListItem {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, total_amount: i64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            total_amount,
        }
    }
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}",
            self.name, self.total_amount, self.measurement_unit
        )
    }
}

/// Aggregated shopping list, ordered by total amount descending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn new(items: Vec<ShoppingListItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain-text rendering: one `"{name}: {total} {unit}"` line per item.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
