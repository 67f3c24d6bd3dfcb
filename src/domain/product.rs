//! Product catalog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StoreError;

/// Storefront category. The set is closed; anything else coming out of the
/// store is a data-integrity error surfaced at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Drivers,
    F1Classic,
    Teams,
    Mousepads,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drivers => "drivers",
            Category::F1Classic => "f1-classic",
            Category::Teams => "teams",
            Category::Mousepads => "mousepads",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drivers" => Ok(Category::Drivers),
            "f1-classic" => Ok(Category::F1Classic),
            "teams" => Ok(Category::Teams),
            "mousepads" => Ok(Category::Mousepads),
            other => Err(StoreError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    /// Base price in the smallest whole currency unit. Always positive.
    pub price: i64,
    pub active: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, category: Category, price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            category,
            price,
            active: true,
            tags: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for c in [Category::Drivers, Category::F1Classic, Category::Teams, Category::Mousepads] {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert!("hats".parse::<Category>().is_err());
    }

    #[test]
    fn test_tag_lookup_is_case_insensitive() {
        let mut p = Product::new("Vintage Tee", Category::F1Classic, 2500);
        p.tags.push("New".into());
        assert!(p.is_tagged("new"));
        assert!(!p.is_tagged("sale"));
    }
}
