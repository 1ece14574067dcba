//! The single mutation entry point for the work-unit document.
//!
//! [`with_transaction`] runs a read-modify-write cycle under the document's
//! exclusive lock. The mutation sees the freshly read document; if it returns
//! an error nothing is written, so a failed command never leaves a partially
//! applied change behind.

use anyhow::Context;
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::artifacts::{FeatureFiles, SpecArtifacts};
use crate::config::Config;
use crate::errors::Result;
use crate::models::Document;

use super::locking::{FileLock, LockPolicy};
use super::store::{read_document, write_document};

/// Lock `path`, load the document, apply `mutate`, and persist on success.
pub fn with_transaction<T, F>(path: &Path, policy: &LockPolicy, mutate: F) -> Result<T>
where
    F: FnOnce(&mut Document) -> Result<T>,
{
    let _lock = FileLock::acquire(path, policy)?;

    let mut document = read_document(path)?;
    let value = match mutate(&mut document) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(document = %path.display(), error = %err, "transaction aborted");
            return Err(err);
        }
    };

    document.meta.last_updated = Utc::now();
    write_document(path, &document)?;
    tracing::debug!(document = %path.display(), "transaction committed");

    Ok(value)
}

/// A project's work-unit document together with its lock policy and the
/// artifact lookups used by transition preconditions.
pub struct Workspace {
    document_path: PathBuf,
    lock: LockPolicy,
    artifacts: Box<dyn SpecArtifacts>,
}

impl Workspace {
    pub fn new(
        document_path: impl Into<PathBuf>,
        lock: LockPolicy,
        artifacts: impl SpecArtifacts + 'static,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            lock,
            artifacts: Box::new(artifacts),
        }
    }

    /// Open the workspace rooted at `project_root` using its configuration.
    pub fn open(project_root: &Path) -> anyhow::Result<Self> {
        let config = Config::load(project_root).context("Failed to load configuration")?;
        Ok(Self::new(
            config.work_units_path(project_root),
            config.lock.policy(),
            FeatureFiles::new(config.features_dir(project_root)),
        ))
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn artifacts(&self) -> &dyn SpecArtifacts {
        self.artifacts.as_ref()
    }

    /// Run `mutate` inside one locked read-modify-write cycle.
    pub fn transaction<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Document, &dyn SpecArtifacts) -> Result<T>,
    {
        let artifacts = self.artifacts.as_ref();
        with_transaction(&self.document_path, &self.lock, |doc| mutate(doc, artifacts))
    }

    /// Lock-free read of the most recently committed document.
    pub fn snapshot(&self) -> Result<Document> {
        read_document(&self.document_path)
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("document_path", &self.document_path)
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}
