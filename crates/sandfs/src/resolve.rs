//! Path resolution and sandbox confinement.
//!
//! Every client-supplied relative path goes through [`Sandbox::resolve`]
//! before any filesystem call. The check is purely lexical: `.` and `..`
//! segments are collapsed against the joined path and the result must still
//! sit at or below the root. Pattern-matching the raw input would miss
//! encoded or nested traversal sequences, so only the resolved path is
//! tested.

use std::path::{Component, Path, PathBuf};

use crate::error::{FsError, FsResult};

/// A fixed directory boundary that all resolved paths are confined to.
///
/// The root is set once at construction and never changes. Resolution
/// performs no I/O, so paths that do not exist yet resolve the same way as
/// existing ones.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`. The caller supplies an absolute,
    /// cleaned path; [`crate::service::FileService::new`] canonicalizes
    /// before constructing one.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The root directory this sandbox confines to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a slash-separated relative path against the root.
    ///
    /// A leading separator is stripped, so absolute-looking inputs are
    /// treated as root-relative. The empty string resolves to the root
    /// itself. Fails with [`FsError::PathTraversal`] when the cleaned
    /// result is neither the root nor underneath it.
    pub fn resolve(&self, rel: &str) -> FsResult<PathBuf> {
        let rel = rel.trim_start_matches('/');

        let mut resolved = self.root.clone();
        for component in Path::new(rel).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir => {}
                // Cannot appear after the leading-separator strip; treat as
                // an escape attempt if one does.
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FsError::PathTraversal);
                }
            }
        }

        // Component-wise prefix test: `/srv/rooty` does not start with
        // `/srv/root`, unlike a plain string comparison.
        if resolved != self.root && !resolved.starts_with(&self.root) {
            return Err(FsError::PathTraversal);
        }
        Ok(resolved)
    }
}
