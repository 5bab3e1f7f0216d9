// 🏷️ Product Category - closed set of four categories
//
// Display names are the wire format (CSV, JSON, previews). "Home Goods"
// keeps its space.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Clothing,
    #[serde(rename = "Home Goods")]
    HomeGoods,
    Books,
}

impl ProductCategory {
    /// Every category, in the order the generator draws from.
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::HomeGoods,
        ProductCategory::Books,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::HomeGoods => "Home Goods",
            ProductCategory::Books => "Books",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| PipelineError::InvalidValue {
                column: "product_category".to_string(),
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!(
            "Home Goods".parse::<ProductCategory>().unwrap(),
            ProductCategory::HomeGoods
        );
        assert_eq!(
            " Books ".parse::<ProductCategory>().unwrap(),
            ProductCategory::Books
        );
        assert!("Toys".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&ProductCategory::HomeGoods).unwrap();
        assert_eq!(json, "\"Home Goods\"");
    }
}
