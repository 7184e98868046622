//! Integration tests for the generation pipeline
//!
//! Tests use temporary directories to verify:
//! - Live and dry-run storage produce the same writes
//! - Repeated runs are idempotent in both modes
//! - Malformed input never reaches a generator
//! - Path escapes are rejected without touching the filesystem
//! - Backend failures surface unchanged

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use idlgen_codegen::storage::GeneratorStorage;
use idlgen_codegen::{
    CodeGenerator, Error, GenerationRequest, GeneratorRegistry, Orchestrator, Phase, Result,
    WriteIntent,
};
use idlgen_core::Idl;
use tempfile::TempDir;

const CONTROLLER_SUBSET: &str = include_str!("fixtures/controller_subset.matter");
const MALFORMED: &str = include_str!("fixtures/malformed.matter");

/// Helper to write an IDL file into its own temporary directory.
fn setup_input(text: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.matter");
    std::fs::write(&path, text).unwrap();
    (dir, path)
}

/// Every file under `root` with its bytes, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

fn as_pairs(intents: &[WriteIntent]) -> BTreeMap<PathBuf, String> {
    intents
        .iter()
        .map(|i| (i.relative_path.clone(), i.content.clone()))
        .collect()
}

// =============================================================================
// Test generators
// =============================================================================

struct EscapingGenerator<'a> {
    storage: &'a mut dyn GeneratorStorage,
}

impl CodeGenerator for EscapingGenerator<'_> {
    fn name(&self) -> &'static str {
        "escape"
    }

    fn emit(&mut self, _dry_run: bool) -> Result<()> {
        self.storage.commit("../outside.txt", "escaped")?;
        Ok(())
    }
}

fn create_escaping<'a>(
    storage: &'a mut dyn GeneratorStorage,
    _idl: &'a Idl,
) -> Box<dyn CodeGenerator + 'a> {
    Box::new(EscapingGenerator { storage })
}

struct FailingGenerator;

impl CodeGenerator for FailingGenerator {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn emit(&mut self, _dry_run: bool) -> Result<()> {
        Err(Error::GenerationError(
            "cluster 'OnOff' has no attributes".to_string(),
        ))
    }
}

fn create_failing<'a>(
    _storage: &'a mut dyn GeneratorStorage,
    _idl: &'a Idl,
) -> Box<dyn CodeGenerator + 'a> {
    Box::new(FailingGenerator)
}

static COUNTED_CREATIONS: AtomicUsize = AtomicUsize::new(0);

fn create_counted<'a>(
    _storage: &'a mut dyn GeneratorStorage,
    _idl: &'a Idl,
) -> Box<dyn CodeGenerator + 'a> {
    COUNTED_CREATIONS.fetch_add(1, Ordering::SeqCst);
    Box::new(FailingGenerator)
}

fn registry_with(name: &'static str, factory: idlgen_codegen::GeneratorFactory) -> Orchestrator {
    let mut registry = GeneratorRegistry::builtin();
    registry.register(name, factory);
    Orchestrator::new(registry)
}

// =============================================================================
// Dry-run and live-mode properties
// =============================================================================

#[test]
fn test_dry_run_is_idempotent_and_writes_nothing() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let output = TempDir::new().unwrap();
    std::fs::write(output.path().join("existing.txt"), "keep me").unwrap();
    let before = snapshot(output.path());

    let request = GenerationRequest::new(&idl_path)
        .with_output_dir(output.path())
        .with_dry_run(true);
    let orchestrator = Orchestrator::default();

    let first = orchestrator.run(&request).unwrap();
    let second = orchestrator.run(&request).unwrap();

    assert!(first.dry_run);
    assert_eq!(first.intents, second.intents);
    assert_eq!(first.written, 0);
    assert_eq!(first.unchanged, 0);
    assert_eq!(snapshot(output.path()), before);
}

#[test]
fn test_live_and_dry_runs_commit_the_same_files() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let live_out = TempDir::new().unwrap();
    let dry_out = TempDir::new().unwrap();
    let orchestrator = Orchestrator::default();

    for generator in orchestrator.registry().names() {
        let live = orchestrator
            .run(
                &GenerationRequest::new(&idl_path)
                    .with_generator(generator)
                    .with_output_dir(live_out.path()),
            )
            .unwrap();
        let dry = orchestrator
            .run(
                &GenerationRequest::new(&idl_path)
                    .with_generator(generator)
                    .with_output_dir(dry_out.path())
                    .with_dry_run(true),
            )
            .unwrap();

        assert_eq!(as_pairs(&live.intents), as_pairs(&dry.intents), "{generator}");
    }

    let on_disk: BTreeMap<PathBuf, String> = snapshot(live_out.path())
        .into_iter()
        .map(|(p, bytes)| (p, String::from_utf8(bytes).unwrap()))
        .collect();
    let mut expected = BTreeMap::new();
    for generator in Orchestrator::default().registry().names() {
        let dry = Orchestrator::default()
            .run(
                &GenerationRequest::new(&idl_path)
                    .with_generator(generator)
                    .with_output_dir(dry_out.path())
                    .with_dry_run(true),
            )
            .unwrap();
        expected.extend(as_pairs(&dry.intents));
    }
    assert_eq!(on_disk, expected);
    assert!(snapshot(dry_out.path()).is_empty());
}

#[test]
fn test_live_run_is_idempotent() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let output = TempDir::new().unwrap();
    let request = GenerationRequest::new(&idl_path).with_output_dir(output.path());
    let orchestrator = Orchestrator::default();

    let first = orchestrator.run(&request).unwrap();
    let after_first = snapshot(output.path());
    let second = orchestrator.run(&request).unwrap();
    let after_second = snapshot(output.path());

    assert_eq!(after_first, after_second);
    assert_eq!(first.written, first.intents.len());
    assert_eq!(second.written, 0);
    assert_eq!(second.unchanged, second.intents.len());
}

// =============================================================================
// Failure ordering
// =============================================================================

#[test]
fn test_malformed_input_never_constructs_a_generator() {
    let (_input, idl_path) = setup_input(MALFORMED);
    let output = TempDir::new().unwrap();
    let orchestrator = registry_with("counted", create_counted);

    let err = orchestrator
        .run(
            &GenerationRequest::new(&idl_path)
                .with_generator("counted")
                .with_output_dir(output.path()),
        )
        .unwrap_err();

    assert_eq!(err.phase, Phase::Parse);
    match &err.source {
        Error::ParseError(parse) => {
            assert_eq!(parse.line, Some(3));
            assert_eq!(parse.column, Some(3));
        }
        other => panic!("Expected ParseError, got {other:?}"),
    }
    assert_eq!(COUNTED_CREATIONS.load(Ordering::SeqCst), 0);
    assert!(snapshot(output.path()).is_empty());
}

#[test]
fn test_path_escape_rejected_in_both_modes() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let parent = TempDir::new().unwrap();
    let output = parent.path().join("out");
    std::fs::create_dir(&output).unwrap();
    let orchestrator = registry_with("escape", create_escaping);

    for dry_run in [false, true] {
        let err = orchestrator
            .run(
                &GenerationRequest::new(&idl_path)
                    .with_generator("escape")
                    .with_output_dir(&output)
                    .with_dry_run(dry_run),
            )
            .unwrap_err();

        assert_eq!(err.phase, Phase::Emit);
        assert!(
            matches!(err.source, Error::PathViolation { .. }),
            "dry_run={dry_run}: {:?}",
            err.source
        );
        assert!(!parent.path().join("outside.txt").exists());
        assert!(snapshot(&output).is_empty());
    }
}

#[cfg(unix)]
#[test]
fn test_symlinked_package_dir_rejected_in_both_modes() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let parent = TempDir::new().unwrap();
    let output = parent.path().join("out");
    let outside = parent.path().join("outside");
    std::fs::create_dir(&output).unwrap();
    std::fs::create_dir(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, output.join("java")).unwrap();

    for dry_run in [false, true] {
        let err = Orchestrator::default()
            .run(
                &GenerationRequest::new(&idl_path)
                    .with_output_dir(&output)
                    .with_dry_run(dry_run),
            )
            .unwrap_err();

        assert_eq!(err.phase, Phase::Emit);
        assert!(
            matches!(err.source, Error::PathViolation { .. }),
            "dry_run={dry_run}: {:?}",
            err.source
        );
        assert!(snapshot(&outside).is_empty());
    }
}

#[test]
fn test_generation_error_passes_through_verbatim() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let output = TempDir::new().unwrap();
    let orchestrator = registry_with("failing", create_failing);

    let err = orchestrator
        .run(
            &GenerationRequest::new(&idl_path)
                .with_generator("failing")
                .with_output_dir(output.path()),
        )
        .unwrap_err();

    assert_eq!(err.phase, Phase::Emit);
    match err.source {
        Error::GenerationError(message) => {
            assert_eq!(message, "cluster 'OnOff' has no attributes")
        }
        other => panic!("Expected GenerationError, got {other:?}"),
    }
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_end_to_end_primary_backend() {
    let (_input, idl_path) = setup_input(CONTROLLER_SUBSET);
    let parent = TempDir::new().unwrap();
    let output = parent.path().join("out");

    let live = Orchestrator::default()
        .run(
            &GenerationRequest::new(&idl_path)
                .with_output_dir(&output)
                .with_create_output_dir(true),
        )
        .unwrap();

    let files: Vec<PathBuf> = snapshot(&output).into_keys().collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("java/chip/devicecontroller/cluster/ClusterIds.java"),
            PathBuf::from("java/chip/devicecontroller/cluster/IdentifyCluster.java"),
            PathBuf::from("java/chip/devicecontroller/cluster/OnOffCluster.java"),
        ]
    );
    assert_eq!(live.generator, "java");

    let before = snapshot(&output);
    let dry = Orchestrator::default()
        .run(
            &GenerationRequest::new(&idl_path)
                .with_output_dir(&output)
                .with_dry_run(true),
        )
        .unwrap();

    let recorded: Vec<PathBuf> = as_pairs(&dry.intents).into_keys().collect();
    assert_eq!(recorded, files);
    assert_eq!(snapshot(&output), before);
}
