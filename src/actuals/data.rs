//! Actuals data structures and the canonical category set

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Canonical financial line item understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Revenue")]
    Revenue,
    #[serde(rename = "COGS")]
    Cogs,
    #[serde(rename = "Sales & Marketing")]
    SalesMarketing,
    #[serde(rename = "R&D")]
    ResearchDevelopment,
    #[serde(rename = "G&A")]
    GeneralAdministrative,
    #[serde(rename = "Other OpEx")]
    OtherOpex,
    /// Closing cash snapshot, not a flow
    #[serde(rename = "Cash")]
    Cash,
}

/// The fixed canonical set, in documentation order
pub const CANONICAL_CATEGORIES: [Category; 7] = [
    Category::Revenue,
    Category::Cogs,
    Category::SalesMarketing,
    Category::ResearchDevelopment,
    Category::GeneralAdministrative,
    Category::OtherOpex,
    Category::Cash,
];

/// Categories summed into operating expenses
pub const OPEX_CATEGORIES: [Category; 4] = [
    Category::SalesMarketing,
    Category::ResearchDevelopment,
    Category::GeneralAdministrative,
    Category::OtherOpex,
];

impl Category {
    /// Canonical label as it appears in imports and exports
    pub fn label(&self) -> &'static str {
        match self {
            Category::Revenue => "Revenue",
            Category::Cogs => "COGS",
            Category::SalesMarketing => "Sales & Marketing",
            Category::ResearchDevelopment => "R&D",
            Category::GeneralAdministrative => "G&A",
            Category::OtherOpex => "Other OpEx",
            Category::Cash => "Cash",
        }
    }

    /// Exact-label lookup; no fuzzy matching
    pub fn from_label(label: &str) -> Option<Self> {
        CANONICAL_CATEGORIES.iter().copied().find(|c| c.label() == label)
    }

    pub fn is_opex(&self) -> bool {
        OPEX_CATEGORIES.contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_label(s).ok_or_else(|| EngineError::UnknownCategory(s.to_string()))
    }
}

/// One normalized actuals contribution for a period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualRecord {
    pub period: NaiveDate,
    pub category: Category,
    pub amount: f64,
}

impl ActualRecord {
    pub fn new(period: NaiveDate, category: Category, amount: f64) -> Self {
        Self { period, category, amount }
    }
}

/// An imported row whose category label has not been normalized yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawActual {
    pub period: NaiveDate,
    pub category: String,
    pub amount: f64,
}
