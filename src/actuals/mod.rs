//! Actuals records, canonical categories, CSV import and category normalization

mod data;
pub mod loader;
pub mod mapping;

pub use data::{ActualRecord, Category, RawActual, CANONICAL_CATEGORIES, OPEX_CATEGORIES};
pub use loader::{load_actuals, load_actuals_from_reader, load_raw_actuals, load_raw_actuals_from_reader};
pub use mapping::{CategoryMapping, MappingSuggestion};
