use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::code::normalize;

/// Support metadata for a part, one per feed row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Location of support
    pub location: String,
    pub supplier: String,
    /// Plant location
    pub plant: String,
    pub concern_number: String,
    pub contact: String,
}

/// One feed row before insertion: the raw alias list plus its record.
///
/// Aliases are raw spellings from the feed (un-normalized, possibly empty);
/// [`Catalog::build`] normalizes and filters them.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub aliases: Vec<String>,
    pub record: PartRecord,
}

/// Result of looking up a code in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Match {
        /// Canonical form of the queried code
        code: String,
        record: Arc<PartRecord>,
    },
    NotFound {
        code: String,
    },
}

impl LookupResult {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }

    /// The canonical code the lookup resolved to (empty for empty input).
    pub fn code(&self) -> &str {
        match self {
            Self::Match { code, .. } | Self::NotFound { code } => code,
        }
    }
}

/// In-memory mapping from normalized part code to its record.
///
/// Built once from the feed and read-only afterwards. Every alias of a row
/// becomes its own key pointing at the same shared record; a later row
/// overwrites earlier rows on key collision. Keys are always the output of
/// normalization — un-normalized spellings are never stored.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, Arc<PartRecord>>,
}

impl Catalog {
    /// An empty catalog, the state before (or after a failed) feed load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from feed rows.
    ///
    /// Runs two passes so the leading-`P` alias rule sees the complete key
    /// set: first every alias is normalized and collected, then rows are
    /// inserted in feed order with the rule applied against that set. The
    /// order aliases appear in the feed cannot change the result.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CatalogRow>,
    {
        let rows: Vec<(Vec<String>, Arc<PartRecord>)> = rows
            .into_iter()
            .map(|row| {
                let keys: Vec<String> = row
                    .aliases
                    .iter()
                    .map(|alias| normalize(alias))
                    .filter(|key| !key.is_empty())
                    .collect();
                (keys, Arc::new(row.record))
            })
            .collect();

        let known: HashSet<&str> = rows
            .iter()
            .flat_map(|(keys, _)| keys.iter().map(String::as_str))
            .collect();

        let mut entries = HashMap::new();
        for (keys, record) in &rows {
            for key in keys {
                let key = match key.strip_prefix('P') {
                    Some(rest) if known.contains(rest) => rest.to_string(),
                    _ => key.clone(),
                };
                entries.insert(key, Arc::clone(record));
            }
        }

        Self { entries }
    }

    /// Look up an exact normalized key.
    pub fn get(&self, code: &str) -> Option<&Arc<PartRecord>> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Canonical form of a raw code against this catalog: [`normalize`],
    /// then drop a leading `P` when the remainder is a known key. The alias
    /// rule is applied once, not to a fixpoint.
    pub fn canonicalize(&self, raw: &str) -> String {
        let code = normalize(raw);
        match code.strip_prefix('P') {
            Some(rest) if self.entries.contains_key(rest) => rest.to_string(),
            _ => code,
        }
    }

    /// Canonicalize and look up a raw (scanned or typed) code.
    ///
    /// Input that normalizes to empty is never a match.
    pub fn lookup(&self, raw: &str) -> LookupResult {
        let code = self.canonicalize(raw);
        if code.is_empty() {
            return LookupResult::NotFound { code };
        }
        match self.entries.get(&code) {
            Some(record) => LookupResult::Match {
                code,
                record: Arc::clone(record),
            },
            None => LookupResult::NotFound { code },
        }
    }

    /// Number of distinct normalized keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, record)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
