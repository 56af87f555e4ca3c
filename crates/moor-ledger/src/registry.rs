use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Human-readable metadata for one module-level error code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaError {
    pub section: String,
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
}

impl MetaError {
    /// `section.name: documentation` rendering for logs and reports.
    pub fn describe(&self) -> String {
        format!("{}.{}: {}", self.section, self.name, self.docs.join(" "))
    }
}

#[derive(Deserialize)]
struct RegistryDoc {
    #[serde(default)]
    error: Vec<RegistryEntry>,
}

#[derive(Deserialize)]
struct RegistryEntry {
    module: u8,
    index: u8,
    section: String,
    name: String,
    #[serde(default)]
    docs: Vec<String>,
}

/// Registry mapping module/error index pairs to readable descriptions.
///
/// Mirrors the ledger's metadata: when a submission ends in a dispatch
/// error, the module and error indices are looked up here to produce a
/// `{section, name, documentation}` triple. Unresolvable pairs fall back to
/// the raw descriptor.
#[derive(Clone, Debug, Default)]
pub struct ErrorRegistry {
    entries: HashMap<(u8, u8), MetaError>,
}

impl ErrorRegistry {
    /// An empty registry. Every lookup falls back to the raw descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry covering the anchor modules of the reference chain.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(
            2,
            0,
            MetaError {
                section: "mtype".into(),
                name: "AlreadyAnchored".into(),
                docs: vec!["A type anchor with this hash already exists.".into()],
            },
        );
        registry.insert(
            2,
            1,
            MetaError {
                section: "mtype".into(),
                name: "HashNotFound".into(),
                docs: vec!["No type anchor exists for the given hash.".into()],
            },
        );
        registry.insert(
            3,
            0,
            MetaError {
                section: "mark".into(),
                name: "AlreadyAnchored".into(),
                docs: vec!["A mark with this hash already exists.".into()],
            },
        );
        registry.insert(
            3,
            1,
            MetaError {
                section: "mark".into(),
                name: "ParentNotAnchored".into(),
                docs: vec!["The referenced parent hash has not been anchored.".into()],
            },
        );
        registry.insert(
            4,
            0,
            MetaError {
                section: "utility".into(),
                name: "TooManyCalls".into(),
                docs: vec!["The batch exceeds the maximum number of calls.".into()],
            },
        );
        registry
    }

    /// Load a registry from a TOML document of `[[error]]` tables.
    pub fn from_toml(doc: &str) -> Result<Self, LedgerError> {
        let parsed: RegistryDoc =
            toml::from_str(doc).map_err(|e| LedgerError::InvalidRegistry(e.to_string()))?;
        let mut registry = Self::new();
        for entry in parsed.error {
            registry.insert(
                entry.module,
                entry.index,
                MetaError {
                    section: entry.section,
                    name: entry.name,
                    docs: entry.docs,
                },
            );
        }
        Ok(registry)
    }

    pub fn insert(&mut self, module: u8, index: u8, meta: MetaError) {
        self.entries.insert((module, index), meta);
    }

    /// Resolve a module/error index pair, if the registry knows it.
    pub fn resolve(&self, module: u8, index: u8) -> Option<&MetaError> {
        self.entries.get(&(module, index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
