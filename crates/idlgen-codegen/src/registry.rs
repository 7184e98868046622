//! Generator registry
//!
//! Maps a backend name to the factory that builds it. Built-in backends
//! are the closed set [`GeneratorKind`]; [`GeneratorRegistry::builtin`]
//! registers every one of them, and the CLI derives its accepted values
//! from [`GeneratorRegistry::names`] so the two can never drift apart.
//!
//! Names are case-insensitive.

use std::collections::BTreeMap;

use idlgen_core::Idl;

use crate::error::{Error, Result};
use crate::generator::CodeGenerator;
use crate::generators::{JavaGenerator, JsonGenerator};
use crate::storage::GeneratorStorage;

/// Builds a generator over a storage and a parsed tree
pub type GeneratorFactory =
    for<'a> fn(&'a mut dyn GeneratorStorage, &'a Idl) -> Box<dyn CodeGenerator + 'a>;

/// Built-in backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Java cluster definitions
    Java,
    /// JSON dump of the parsed tree
    Json,
}

impl GeneratorKind {
    /// Every built-in backend
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::Java, GeneratorKind::Json];

    /// The backend used when none is requested
    pub const PRIMARY: GeneratorKind = GeneratorKind::Java;

    /// Registry name
    pub const fn name(self) -> &'static str {
        match self {
            GeneratorKind::Java => "java",
            GeneratorKind::Json => "json",
        }
    }

    /// Factory for this backend
    pub fn factory(self) -> GeneratorFactory {
        match self {
            GeneratorKind::Java => create_java,
            GeneratorKind::Json => create_json,
        }
    }
}

fn create_java<'a>(
    storage: &'a mut dyn GeneratorStorage,
    idl: &'a Idl,
) -> Box<dyn CodeGenerator + 'a> {
    Box::new(JavaGenerator::new(storage, idl))
}

fn create_json<'a>(
    storage: &'a mut dyn GeneratorStorage,
    idl: &'a Idl,
) -> Box<dyn CodeGenerator + 'a> {
    Box::new(JsonGenerator::new(storage, idl))
}

/// A resolved registry entry
#[derive(Clone, Copy)]
pub struct GeneratorEntry {
    /// Name as registered
    pub name: &'static str,
    /// Factory
    pub factory: GeneratorFactory,
}

impl GeneratorEntry {
    /// Build the generator
    pub fn create<'a>(
        &self,
        storage: &'a mut dyn GeneratorStorage,
        idl: &'a Idl,
    ) -> Box<dyn CodeGenerator + 'a> {
        (self.factory)(storage, idl)
    }
}

impl std::fmt::Debug for GeneratorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Name → factory map
#[derive(Debug, Default, Clone)]
pub struct GeneratorRegistry {
    entries: BTreeMap<String, GeneratorEntry>,
}

impl GeneratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every [`GeneratorKind`]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in GeneratorKind::ALL {
            registry.register(kind.name(), kind.factory());
        }
        registry
    }

    /// Register a backend.
    ///
    /// # Panics
    ///
    /// If a backend with the same name (ignoring case) is already
    /// registered.
    pub fn register(&mut self, name: &'static str, factory: GeneratorFactory) {
        let key = name.to_ascii_lowercase();
        assert!(
            !self.entries.contains_key(&key),
            "code generator '{name}' registered twice"
        );
        self.entries.insert(key, GeneratorEntry { name, factory });
    }

    /// Look up a backend by name, ignoring case
    pub fn resolve(&self, name: &str) -> Result<GeneratorEntry> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| Error::UnknownGenerator {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Every registered name, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.values().map(|e| e.name).collect()
    }

    /// Whether no backend is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
