//! The code generator capability
//!
//! A backend is constructed with a storage and a parsed [`idlgen_core::Idl`]
//! and exposes a single [`CodeGenerator::emit`] operation. Backends never
//! write files themselves; everything goes through the storage.

use minijinja::Environment;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::storage::{CommitOutcome, GeneratorStorage};

/// A code-emission backend
pub trait CodeGenerator {
    /// Registry name of this backend
    fn name(&self) -> &'static str;

    /// Render every output file and commit it to storage.
    ///
    /// `dry_run` only changes what gets logged; the committed paths and
    /// content must be the same either way.
    fn emit(&mut self, dry_run: bool) -> Result<()>;
}

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])|([A-Z]+)([A-Z][a-z])").expect("valid regex"));

fn split_words(value: &str) -> Vec<String> {
    let spaced = WORD_BOUNDARY.replace_all(value, "${1}${3}_${2}${4}");
    spaced
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// `onOffTime` → `ON_OFF_TIME`
pub fn upper_snake(value: String) -> String {
    split_words(&value)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `OnOffTime` → `onOffTime`
pub fn lower_camel(value: String) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `onOffTime` → `OnOffTime`
pub fn upper_camel(value: String) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `6 | hex(8)` → `0x00000006`
pub fn hex(value: u64, width: Option<usize>) -> String {
    format!("0x{:0width$X}", value, width = width.unwrap_or(4))
}

/// Template environment shared by template-driven backends.
///
/// `templates` are `(name, source)` pairs embedded in the binary.
pub fn template_environment(
    templates: &[(&'static str, &'static str)],
) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    env.add_filter("upper_snake", upper_snake);
    env.add_filter("lower_camel", lower_camel);
    env.add_filter("upper_camel", upper_camel);
    env.add_filter("hex", hex);

    for &(name, source) in templates {
        env.add_template(name, source)
            .map_err(|e| Error::GenerationError(format!("invalid template '{name}': {e}")))?;
    }
    Ok(env)
}

/// Render `template` with `context` and commit the result to `output_file`
pub fn render_one_output(
    env: &Environment<'_>,
    storage: &mut dyn GeneratorStorage,
    template: &str,
    output_file: &str,
    context: minijinja::Value,
    dry_run: bool,
) -> Result<CommitOutcome> {
    if dry_run {
        tracing::debug!("File to be generated (dry run): {}", output_file);
    } else {
        tracing::info!("File to be generated: {}", output_file);
    }

    let rendered = env
        .get_template(template)
        .and_then(|t| t.render(context))
        .map_err(|e| Error::GenerationError(format!("failed to render '{template}': {e}")))?;

    storage.commit(output_file, &rendered)
}
