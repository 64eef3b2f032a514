//! Filesystem node metadata.

use std::fs::{FileType, Metadata};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
    Socket,
    Fifo,
    /// Anything the platform cannot classify (block/char devices, or any
    /// special file on non-unix targets).
    Unknown,
}

impl NodeKind {
    /// Classify an OS file type. Symlinks are reported as their own kind,
    /// never followed.
    pub fn from_file_type(file_type: &FileType) -> Self {
        if file_type.is_symlink() {
            return NodeKind::Symlink;
        }
        if file_type.is_dir() {
            return NodeKind::Directory;
        }
        if file_type.is_file() {
            return NodeKind::File;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_socket() {
                return NodeKind::Socket;
            }
            if file_type.is_fifo() {
                return NodeKind::Fifo;
            }
        }
        NodeKind::Unknown
    }
}

/// Metadata for a single node, captured from a stat call at request time.
///
/// Never cached; each request observes the filesystem at the moment of the
/// call. Serializes to the wire shape
/// `{name, type, size, lastModified}` with an RFC3339 UTC timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct NodeMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub size: u64,
    #[serde(rename = "lastModified")]
    pub modified: DateTime<Utc>,
}

impl NodeMetadata {
    /// Build metadata from an OS stat result. Directory and special-file
    /// sizes are reported as zero; only regular files carry a byte count.
    pub fn from_metadata(name: String, metadata: &Metadata) -> Self {
        let kind = NodeKind::from_file_type(&metadata.file_type());
        let size = if metadata.is_file() { metadata.len() } else { 0 };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        Self {
            name,
            kind,
            size,
            modified: DateTime::<Utc>::from(modified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let meta = fs::symlink_metadata(&path).unwrap();
        let node = NodeMetadata::from_metadata("a.txt".to_string(), &meta);

        assert_eq!(node.name, "a.txt");
        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.size, 5);
    }

    #[test]
    fn test_directory_size_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub/inner.txt"), "content").unwrap();

        let meta = fs::symlink_metadata(temp_dir.path().join("sub")).unwrap();
        let node = NodeMetadata::from_metadata("sub".to_string(), &meta);

        assert_eq!(node.kind, NodeKind::Directory);
        assert_eq!(node.size, 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_reports_own_kind() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.txt");
        let link = temp_dir.path().join("link");
        fs::write(&target, "x").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let meta = fs::symlink_metadata(&link).unwrap();
        let node = NodeMetadata::from_metadata("link".to_string(), &meta);

        assert_eq!(node.kind, NodeKind::Symlink);
    }

    #[test]
    fn test_wire_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let meta = fs::symlink_metadata(&path).unwrap();
        let node = NodeMetadata::from_metadata("a.txt".to_string(), &meta);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["name"], "a.txt");
        assert_eq!(json["type"], "file");
        assert_eq!(json["size"], 5);
        // RFC3339 UTC string, e.g. "2026-08-07T12:00:00.123456789Z"
        let stamp = json["lastModified"].as_str().unwrap();
        assert!(stamp.ends_with('Z'));
        assert!(stamp.contains('T'));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(NodeKind::Directory).unwrap(),
            "directory"
        );
        assert_eq!(serde_json::to_value(NodeKind::Fifo).unwrap(), "fifo");
        assert_eq!(serde_json::to_value(NodeKind::Unknown).unwrap(), "unknown");
    }
}
