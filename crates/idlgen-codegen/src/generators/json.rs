//! JSON backend
//!
//! Dumps the parsed tree as `idl.json`. Useful for inspecting what the
//! parser produced and for diffing IDL revisions.

use idlgen_core::Idl;

use crate::error::{Error, Result};
use crate::generator::CodeGenerator;
use crate::storage::GeneratorStorage;

/// Output file name, relative to the output root
pub const OUTPUT_FILE: &str = "idl.json";

/// Generator that serializes the IDL tree
pub struct JsonGenerator<'a> {
    storage: &'a mut dyn GeneratorStorage,
    idl: &'a Idl,
}

impl<'a> JsonGenerator<'a> {
    /// Create a generator over `idl` writing into `storage`
    pub fn new(storage: &'a mut dyn GeneratorStorage, idl: &'a Idl) -> Self {
        Self { storage, idl }
    }
}

impl CodeGenerator for JsonGenerator<'_> {
    fn name(&self) -> &'static str {
        "json"
    }

    fn emit(&mut self, dry_run: bool) -> Result<()> {
        tracing::debug!(dry_run, "File to be generated: {}", OUTPUT_FILE);

        let mut rendered = serde_json::to_string_pretty(self.idl)
            .map_err(|e| Error::GenerationError(format!("failed to serialize IDL: {e}")))?;
        rendered.push('\n');

        self.storage.commit(OUTPUT_FILE, &rendered)?;
        Ok(())
    }
}
