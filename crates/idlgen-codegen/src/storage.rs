//! Generator output storage
//!
//! Every file a generator produces goes through a [`GeneratorStorage`].
//! Whether anything lands on disk is decided once, by picking the
//! implementation:
//!
//! - [`FileSystemStorage`] writes under an output directory
//! - [`DryRunStorage`] records a [`WriteIntent`] per commit and never
//!   writes to the filesystem
//!
//! Both validate paths identically, so a dry run rejects exactly the
//! writes a live run would reject. Validation is lexical first, then
//! follows whatever already exists on disk, so a symlink inside the
//! output directory cannot redirect a write outside it.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// A write that a generator committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteIntent {
    /// Normalized path relative to the output directory
    pub relative_path: PathBuf,

    /// Content length in bytes
    pub size: usize,

    /// Hex-encoded SHA-256 of the content
    pub sha256: String,

    /// Full content
    pub content: String,
}

impl WriteIntent {
    /// Build an intent for `content` at an already-normalized path
    pub fn new(relative_path: PathBuf, content: &str) -> Self {
        Self {
            relative_path,
            size: content.len(),
            sha256: hex::encode(Sha256::digest(content.as_bytes())),
            content: content.to_string(),
        }
    }
}

/// What a commit did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitOutcome {
    /// File was created or overwritten
    Written,
    /// File already had identical content, nothing written
    Unchanged,
    /// Dry run: write was recorded only
    Recorded,
}

/// One commit and its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// The write
    pub intent: WriteIntent,
    /// What happened
    pub outcome: CommitOutcome,
}

/// Destination for generated files
pub trait GeneratorStorage {
    /// Root every relative path is resolved against
    fn output_dir(&self) -> &Path;

    /// Commit `content` to `relative_path` under the output directory.
    ///
    /// Fails with [`Error::PathViolation`] if the path does not resolve
    /// strictly inside the output directory.
    fn commit(&mut self, relative_path: &str, content: &str) -> Result<CommitOutcome>;

    /// Every commit made so far, in order
    fn records(&self) -> &[CommitRecord];
}

/// Lexically resolve `relative_path` and make sure it stays strictly
/// inside the output root.
///
/// Absolute paths, paths that climb above the root with `..`, and paths
/// that resolve to the root itself are rejected. This only looks at the
/// text; [`OutputRoot::resolve`] adds the on-disk check.
pub fn normalize_relative(relative_path: &str) -> Result<PathBuf> {
    let violation = || Error::PathViolation {
        path: PathBuf::from(relative_path),
    };

    let mut normalized = PathBuf::new();
    for component in Path::new(relative_path).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(violation());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(violation()),
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(violation());
    }
    Ok(normalized)
}

/// Check the output directory before any generator runs.
///
/// A missing directory is an error unless `create_missing` is set; an
/// existing non-directory is always an error.
fn check_output_dir(output_dir: &Path, create_missing: bool) -> Result<bool> {
    if output_dir.is_dir() {
        return Ok(true);
    }
    if output_dir.exists() || !create_missing {
        return Err(Error::OutputDirMissing {
            path: output_dir.to_path_buf(),
        });
    }
    Ok(false)
}

/// The output directory as configured and as it resolves on disk
#[derive(Debug)]
pub struct OutputRoot {
    dir: PathBuf,
    /// `None` only while the directory does not exist yet
    canonical: Option<PathBuf>,
}

impl OutputRoot {
    fn open(dir: PathBuf) -> Result<Self> {
        let canonical = if dir.is_dir() {
            Some(dir.canonicalize().map_err(|e| Error::io(&dir, e))?)
        } else {
            None
        };
        Ok(Self { dir, canonical })
    }

    /// Directory as configured
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Normalize `relative_path` and make sure no existing symlink along
    /// it leads outside the root. Never touches the filesystem beyond
    /// reading metadata.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let normalized = normalize_relative(relative_path)?;
        if let Some(root) = &self.canonical
            && !stays_inside(root, &normalized)
        {
            tracing::warn!(
                "Refusing {}: resolves outside {}",
                relative_path,
                root.display()
            );
            return Err(Error::PathViolation {
                path: PathBuf::from(relative_path),
            });
        }
        Ok(normalized)
    }
}

/// Walk up from `root/normalized` to the deepest entry that exists and
/// check where it really points. A symlink that cannot be resolved is
/// treated as leaving the root.
fn stays_inside(root: &Path, normalized: &Path) -> bool {
    let mut candidate = root.join(normalized);
    loop {
        match candidate.canonicalize() {
            Ok(real) => return real.starts_with(root),
            Err(_) => {
                let is_symlink = candidate
                    .symlink_metadata()
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);
                if is_symlink || !candidate.pop() {
                    return false;
                }
            }
        }
    }
}

/// Storage that writes files under an output directory
#[derive(Debug)]
pub struct FileSystemStorage {
    root: OutputRoot,
    records: Vec<CommitRecord>,
}

impl FileSystemStorage {
    /// Create a storage rooted at `output_dir`.
    ///
    /// With `create_missing`, a missing output directory is created here;
    /// otherwise it fails with [`Error::OutputDirMissing`].
    pub fn new(output_dir: impl Into<PathBuf>, create_missing: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        if !check_output_dir(&output_dir, create_missing)? {
            tracing::info!("Creating output directory: {}", output_dir.display());
            std::fs::create_dir_all(&output_dir).map_err(|e| Error::io(&output_dir, e))?;
        }

        Ok(Self {
            root: OutputRoot::open(output_dir)?,
            records: Vec::new(),
        })
    }

    /// Current bytes of a generated file, if it exists
    pub fn get_existing_data(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.root.dir().join(self.root.resolve(relative_path)?);
        match std::fs::read(&target) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(target, e)),
        }
    }
}

impl GeneratorStorage for FileSystemStorage {
    fn output_dir(&self) -> &Path {
        self.root.dir()
    }

    fn commit(&mut self, relative_path: &str, content: &str) -> Result<CommitOutcome> {
        let normalized = self.root.resolve(relative_path)?;
        let target = self.root.dir().join(&normalized);

        let existing = self.get_existing_data(relative_path)?;
        let outcome = if existing.as_deref() == Some(content.as_bytes()) {
            tracing::info!("File content not changed: {}", target.display());
            CommitOutcome::Unchanged
        } else {
            if let Some(parent) = target.parent()
                && !parent.exists()
            {
                tracing::info!("Creating output directory: {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }

            tracing::info!("Writing new data to: {}", target.display());
            std::fs::write(&target, content).map_err(|e| Error::io(&target, e))?;
            CommitOutcome::Written
        };

        self.records.push(CommitRecord {
            intent: WriteIntent::new(normalized, content),
            outcome,
        });
        Ok(outcome)
    }

    fn records(&self) -> &[CommitRecord] {
        &self.records
    }
}

/// Storage that records writes without performing them
#[derive(Debug)]
pub struct DryRunStorage {
    root: OutputRoot,
    records: Vec<CommitRecord>,
}

impl DryRunStorage {
    /// Create a dry-run storage for `output_dir`.
    ///
    /// The directory is checked the same way as for [`FileSystemStorage`],
    /// but never created.
    pub fn new(output_dir: impl Into<PathBuf>, create_missing: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        if !check_output_dir(&output_dir, create_missing)? {
            tracing::info!(
                "Dry run: output directory {} would be created",
                output_dir.display()
            );
        }

        Ok(Self {
            root: OutputRoot::open(output_dir)?,
            records: Vec::new(),
        })
    }

    /// Recorded writes, in commit order
    pub fn intents(&self) -> impl Iterator<Item = &WriteIntent> {
        self.records.iter().map(|r| &r.intent)
    }
}

impl GeneratorStorage for DryRunStorage {
    fn output_dir(&self) -> &Path {
        self.root.dir()
    }

    fn commit(&mut self, relative_path: &str, content: &str) -> Result<CommitOutcome> {
        let normalized = self.root.resolve(relative_path)?;
        tracing::info!(
            bytes = content.len(),
            "Dry run: would write {}",
            self.root.dir().join(&normalized).display()
        );

        self.records.push(CommitRecord {
            intent: WriteIntent::new(normalized, content),
            outcome: CommitOutcome::Recorded,
        });
        Ok(CommitOutcome::Recorded)
    }

    fn records(&self) -> &[CommitRecord] {
        &self.records
    }
}
