//! Part classification - decides which material price applies to a part

use serde::{Deserialize, Serialize};

/// Whether a part is priced from block stock or sheet stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    #[serde(alias = "block_price")]
    Block,
    #[serde(alias = "sheet_price")]
    Sheet,
}

impl std::fmt::Display for PricingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingType::Block => write!(f, "block"),
            PricingType::Sheet => write!(f, "sheet"),
        }
    }
}

impl std::str::FromStr for PricingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "block" | "block_price" => Ok(PricingType::Block),
            "sheet" | "sheet_price" => Ok(PricingType::Sheet),
            _ => Err(format!(
                "Invalid pricing type: {}. Use 'block' or 'sheet'",
                s
            )),
        }
    }
}

/// A named part classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartClassification {
    /// Lookup key (e.g. "machined-block")
    pub id: String,

    /// Display name
    pub name: String,

    /// Which material price applies
    pub pricing_type: PricingType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PartClassification {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pricing_type: PricingType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pricing_type,
            description: None,
        }
    }
}
