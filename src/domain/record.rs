use std::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// A validated product record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub price: Price,
}

impl Record {
    /// Create a new record
    pub fn new(id: i64, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// Serialized line form: `id,name,price`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.id, self.name, self.price)
    }
}

/// Key a sorted view is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Price,
}

impl SortKey {
    /// All keys, in the order their views are written
    pub const ALL: [SortKey; 3] = [SortKey::Id, SortKey::Name, SortKey::Price];

    /// Resolve a caller-supplied key, case-insensitively
    ///
    /// Anything other than `name` or `price` selects the id view.
    pub fn from_query(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "price" => Self::Price,
            _ => Self::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
        }
    }

    /// File name of the view sorted by this key
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Id => "products_sorted_by_id.txt",
            Self::Name => "products_sorted_by_name.txt",
            Self::Price => "products_sorted_by_price.txt",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
