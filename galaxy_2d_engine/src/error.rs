//! Error types for the Galaxy2D engine
//!
//! This module defines the error types used throughout the engine,
//! including window initialization, texture creation, pixel locking and rendering.

use std::fmt;

/// Result type for Galaxy2D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy2D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (software, SDL, etc.)
    ///
    /// Raised by drivers; the engine maps it to one of the other variants
    /// before handing it to the caller.
    BackendError(String),

    /// Render context construction failed (no window was created)
    InitializationFailed(String),

    /// Texture allocation failed (no usable handle was created)
    ResourceCreationFailed(String),

    /// Image file could not be read or decoded
    AssetLoadFailed(String),

    /// Pixel access lock could not be acquired
    LockFailed(String),

    /// Draw, clear or present primitive failed
    RenderFailed(String),

    /// Operation not allowed for the texture's access mode or state
    InvalidOperation(String),
}

impl Error {
    /// Returns true for texture creation failures, asset loading included
    pub fn is_resource_creation(&self) -> bool {
        matches!(self, Error::ResourceCreationFailed(_) | Error::AssetLoadFailed(_))
    }

    /// Message carried by the error, without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Error::BackendError(msg)
            | Error::InitializationFailed(msg)
            | Error::ResourceCreationFailed(msg)
            | Error::AssetLoadFailed(msg)
            | Error::LockFailed(msg)
            | Error::RenderFailed(msg)
            | Error::InvalidOperation(msg) => msg,
        }
    }

    /// Rebuild an already logged error as another kind, without logging again
    ///
    /// Errors are logged once, where a driver error is turned into an engine
    /// error. Layers above that only change the kind use this.
    pub fn relabel(self, kind: fn(String) -> Error, context: &str) -> Error {
        kind(format!("{}: {}", context, self))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ResourceCreationFailed(msg) => write!(f, "Resource creation failed: {}", msg),
            Error::AssetLoadFailed(msg) => write!(f, "Asset load failed: {}", msg),
            Error::LockFailed(msg) => write!(f, "Lock failed: {}", msg),
            Error::RenderFailed(msg) => write!(f, "Render failed: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
