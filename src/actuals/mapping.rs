//! Per-company mapping store from source account labels to canonical categories

use super::{ActualRecord, Category, RawActual, CANONICAL_CATEGORIES};
use crate::error::{EngineError, Result};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

/// Proposed translation for a source label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub source_account: String,
    pub canonical_category: Category,
}

#[derive(Debug, Serialize, Deserialize)]
struct MappingRow {
    source_account: String,
    canonical_category: String,
}

/// Translation table consulted for labels outside the canonical set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMapping {
    entries: BTreeMap<String, Category>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, source_account: &str) -> Option<Category> {
        self.entries.get(source_account).copied()
    }

    /// Insert or overwrite the translation for a source label
    pub fn upsert(&mut self, source_account: impl Into<String>, category: Category) {
        self.entries.insert(source_account.into(), category);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Canonical labels resolve to themselves; anything else needs a mapping
    pub fn resolve(&self, label: &str) -> Result<Category> {
        Category::from_label(label)
            .or_else(|| self.get(label))
            .ok_or_else(|| EngineError::MappingRequired {
                source_account: label.to_string(),
            })
    }

    /// Translate imported rows, failing on the first unresolved label
    pub fn normalize(&self, rows: &[RawActual]) -> Result<Vec<ActualRecord>> {
        rows.iter()
            .map(|row| {
                let category = self.resolve(&row.category)?;
                Ok(ActualRecord::new(row.period, category, row.amount))
            })
            .collect()
    }

    /// Distinct labels that are neither canonical nor mapped, sorted
    pub fn unmapped_accounts<'a, I>(&self, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .filter(|label| self.resolve(label).is_err())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Suggest a canonical category per distinct label by case-insensitive containment
    ///
    /// The first canonical category (in canonical order) whose label contains, or is
    /// contained in, the source label wins. Labels with no match are omitted.
    pub fn suggest<'a, I>(labels: I) -> Vec<MappingSuggestion>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = labels.into_iter().collect();
        distinct
            .into_iter()
            .filter_map(|source| {
                let lowered = source.to_lowercase();
                CANONICAL_CATEGORIES
                    .iter()
                    .find(|c| {
                        let canonical = c.label().to_lowercase();
                        lowered.contains(&canonical) || canonical.contains(&lowered)
                    })
                    .map(|c| MappingSuggestion {
                        source_account: source.to_string(),
                        canonical_category: *c,
                    })
            })
            .collect()
    }

    /// Import a `source_account,canonical_category` CSV, upserting each row
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<usize> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers = csv_reader.headers()?;
        let has = |col: &str| headers.iter().any(|h| h == col);
        if !has("source_account") || !has("canonical_category") {
            return Err(EngineError::MissingColumns("source_account, canonical_category"));
        }

        let mut imported = 0;
        for result in csv_reader.deserialize() {
            let row: MappingRow = result?;
            let category: Category = row.canonical_category.parse()?;
            self.upsert(row.source_account, category);
            imported += 1;
        }
        Ok(imported)
    }

    /// Build a mapping store from a mapping CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut mapping = Self::new();
        mapping.import_csv(reader)?;
        Ok(mapping)
    }

    /// Export as a `source_account,canonical_category` CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["source_account", "canonical_category"])?;
        for (source, category) in self.iter() {
            csv_writer.write_record([source, category.label()])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
