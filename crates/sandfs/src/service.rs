//! File-tree operations confined to a sandbox root.
//!
//! Every operation takes a client-relative path and resolves it through the
//! [`Sandbox`] before touching the filesystem. Type and existence checks
//! run before each OS call so failures classify into the [`FsError`] kinds
//! instead of leaking ambiguous OS error strings. The service holds no
//! state beyond the immutable root and is safe to share across threads.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{FsError, FsResult};
use crate::mime;
use crate::node::NodeMetadata;
use crate::resolve::Sandbox;
use crate::stream::StreamSaver;

/// OS-backed file operations rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct FileService {
    sandbox: Sandbox,
}

impl FileService {
    /// Construct a service rooted at `root`. The root is canonicalized
    /// once; it must exist and be a directory.
    pub fn new(root: impl AsRef<Path>) -> FsResult<Self> {
        let root = fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(FsError::NotADirectory(root));
        }
        Ok(Self {
            sandbox: Sandbox::new(root),
        })
    }

    /// The confined root directory.
    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Resolve a relative path without performing any I/O.
    pub fn resolve(&self, rel: &str) -> FsResult<PathBuf> {
        self.sandbox.resolve(rel)
    }

    /// Metadata for a single node. Symlinks report their own kind.
    pub fn stat(&self, rel: &str) -> FsResult<NodeMetadata> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::symlink_metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        Ok(NodeMetadata::from_metadata(node_name(&abs), &metadata))
    }

    /// Direct children of a directory, in OS enumeration order.
    ///
    /// Entries that disappear or cannot be stat-ed mid-listing are skipped.
    pub fn list(&self, rel: &str) -> FsResult<Vec<NodeMetadata>> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory(PathBuf::from(rel)));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&abs)? {
            let entry = entry?;
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(NodeMetadata::from_metadata(name, &metadata));
        }
        Ok(entries)
    }

    /// Full file content in memory. Prefer [`open`](Self::open) for large
    /// files.
    pub fn read_file(&self, rel: &str) -> FsResult<Vec<u8>> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(PathBuf::from(rel)));
        }
        Ok(fs::read(&abs)?)
    }

    /// Open a file for streamed reading, along with its metadata.
    pub fn open(&self, rel: &str) -> FsResult<(File, NodeMetadata)> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(PathBuf::from(rel)));
        }
        let file = File::open(&abs)?;
        Ok((file, NodeMetadata::from_metadata(node_name(&abs), &metadata)))
    }

    /// Write bytes to a path, creating parent directories as needed.
    ///
    /// With `create == false` the target must already exist. This write is
    /// direct and non-atomic; [`save_stream`](Self::save_stream) is the
    /// atomic path.
    pub fn write_file(&self, rel: &str, data: &[u8], create: bool) -> FsResult<()> {
        let abs = self.sandbox.resolve(rel)?;
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        if !create {
            fs::symlink_metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        }
        Ok(fs::write(&abs, data)?)
    }

    /// Copy a reader to a path atomically: the content lands in a `.part`
    /// sibling and is renamed into place only after the full copy succeeds.
    /// Returns the number of bytes written.
    pub fn save_stream<R: Read>(&self, rel: &str, reader: &mut R, overwrite: bool) -> FsResult<u64> {
        let mut saver = self.start_save(rel, overwrite)?;
        let written = io::copy(reader, &mut saver)?;
        saver.commit()?;
        Ok(written)
    }

    /// Begin an atomic write for incremental sources (e.g. multipart
    /// fields). With `overwrite == false` an existing destination fails
    /// before the temp file is opened.
    pub fn start_save(&self, rel: &str, overwrite: bool) -> FsResult<StreamSaver> {
        let abs = self.sandbox.resolve(rel)?;
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        if !overwrite && fs::symlink_metadata(&abs).is_ok() {
            return Err(FsError::AlreadyExists(PathBuf::from(rel)));
        }
        Ok(StreamSaver::create(abs)?)
    }

    /// Remove a file, a symlink, or an empty directory.
    pub fn delete(&self, rel: &str) -> FsResult<()> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::symlink_metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        if metadata.is_dir() {
            if fs::read_dir(&abs)?.next().is_some() {
                return Err(FsError::DirectoryNotEmpty(PathBuf::from(rel)));
            }
            fs::remove_dir(&abs)?;
        } else {
            fs::remove_file(&abs)?;
        }
        Ok(())
    }

    /// Remove a file or a directory tree unconditionally. Symlinks are
    /// removed, never followed.
    pub fn delete_recursive(&self, rel: &str) -> FsResult<()> {
        let abs = self.sandbox.resolve(rel)?;
        let metadata = fs::symlink_metadata(&abs).map_err(|err| classify_missing(rel, err))?;
        if metadata.is_dir() {
            fs::remove_dir_all(&abs)?;
        } else {
            fs::remove_file(&abs)?;
        }
        Ok(())
    }

    /// Create a directory and any missing parents. Idempotent when the
    /// path already exists as a directory.
    pub fn mkdir_all(&self, rel: &str) -> FsResult<()> {
        let abs = self.sandbox.resolve(rel)?;
        fs::create_dir_all(&abs).map_err(|err| match err.kind() {
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(PathBuf::from(rel)),
            _ => FsError::Io(err),
        })
    }

    /// Move a node to a new relative path. Both endpoints pass through the
    /// sandbox independently.
    pub fn rename(&self, rel: &str, new_rel: &str, overwrite: bool) -> FsResult<()> {
        if new_rel.trim().is_empty() {
            return Err(FsError::MissingNewName);
        }

        let src = self.sandbox.resolve(rel)?;
        fs::symlink_metadata(&src).map_err(|err| classify_missing(rel, err))?;

        let dst = self.sandbox.resolve(new_rel)?;
        if !overwrite && fs::symlink_metadata(&dst).is_ok() {
            return Err(FsError::AlreadyExists(PathBuf::from(new_rel)));
        }

        Ok(fs::rename(&src, &dst)?)
    }

    /// Infer a content type from the file extension, falling back to
    /// sniffing a bounded prefix of the content.
    pub fn detect_mime(&self, rel: &str) -> FsResult<&'static str> {
        let abs = self.sandbox.resolve(rel)?;
        mime::detect(&abs).map_err(|err| classify_missing(rel, err))
    }
}

/// Display name for a node: its base name, or `/` for the root itself.
fn node_name(abs: &Path) -> String {
    abs.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string())
}

/// Map a missing-path OS error to `NotFound` carrying the client-relative
/// path; everything else stays unclassified.
fn classify_missing(rel: &str, err: io::Error) -> FsError {
    if err.kind() == io::ErrorKind::NotFound {
        FsError::NotFound(PathBuf::from(rel))
    } else {
        FsError::Io(err)
    }
}
