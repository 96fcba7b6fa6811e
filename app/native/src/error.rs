//! Error types for Dotspaces.
//!
//! This module provides the unified error type used by host-facing operations.
//! Errors serialize with a `kind` tag so they can be forwarded to a frontend or
//! written to structured logs unchanged.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while observing or driving the host shell.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum DotspacesError {
    /// The workspace manager has no workspace at the requested index.
    #[error("Workspace {0} not found")]
    WorkspaceNotFound(usize),
    /// A host capability rejected an operation.
    #[error("Host error: {0}")]
    HostError(String),
    /// A settings read or write failed.
    #[error("Settings error: {0}")]
    SettingsError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for DotspacesError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for DotspacesError {
    fn from(err: serde_json::Error) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<ConfigError> for DotspacesError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<String> for DotspacesError {
    fn from(msg: String) -> Self { Self::HostError(msg) }
}

impl From<&str> for DotspacesError {
    fn from(msg: &str) -> Self { Self::HostError(msg.to_string()) }
}
