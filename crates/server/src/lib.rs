//! # Filedeck Server Library
//!
//! This crate provides the HTTP surface of Filedeck: a sandboxed
//! file-management API for browser-based editors.
//!
//! ## Overview
//!
//! - **API layer**: axum routes under `/api/v1/fs` mapping HTTP verbs onto
//!   the sandboxed file service and service errors onto HTTP statuses
//! - **Configuration**: TOML config with environment overrides
//!
//! The file operations themselves live in the `sandfs` crate; this crate
//! only translates between HTTP and that service.
//!
//! ## Modules
//!
//! - [`api`]: router construction, request handlers, error mapping
//! - [`config`]: configuration loading, validation, and defaults

pub mod api;
pub mod config;

// Re-export the entry points used by the binary and by integration tests
pub use api::{router, ApiError};
pub use config::Config;
