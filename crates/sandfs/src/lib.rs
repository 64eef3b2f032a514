//! # Sandboxed Filesystem Core
//!
//! This crate implements file-tree operations confined to a fixed root
//! directory. It is the trust boundary of Filedeck: every client-supplied
//! path is resolved and checked against the root before any I/O, and
//! streamed writes commit atomically so readers never observe a partial
//! file.
//!
//! The crate knows nothing about HTTP. Failures are returned as the closed
//! [`FsError`] set for the API layer to map; nothing here logs or retries.
//!
//! ## Modules
//!
//! - [`resolve`]: path resolution and sandbox confinement
//! - [`service`]: the file operations (stat, list, read, write, delete, ...)
//! - [`stream`]: atomic temp-file-then-rename writes
//! - [`node`]: node metadata model
//! - [`mime`]: MIME detection by extension and content sniffing
//! - [`error`]: the error taxonomy

pub mod error;
pub mod mime;
pub mod node;
pub mod resolve;
pub mod service;
pub mod stream;

pub use error::{FsError, FsResult};
pub use node::{NodeKind, NodeMetadata};
pub use resolve::Sandbox;
pub use service::FileService;
pub use stream::StreamSaver;
