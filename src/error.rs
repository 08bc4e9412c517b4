//! Error types for blockup operations.
//!
//! This module defines [`BlockupError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Filesystem failures carry the [`Step`] that failed and the path involved
//! - Validation problems (bad block, missing argument, bad manifest) are
//!   reported as usage errors and map to exit code 2
//! - Use `anyhow::Error` (via `BlockupError::Other`) for unexpected errors
//! - Backup failures never surface here; they are logged and reported as warnings

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The stage of an upsert run that touched the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Reading the target file for the marker check.
    ReadTarget,
    /// Appending the block to the target file.
    AppendTarget,
    /// Reading a block template from disk.
    ReadBlock,
    /// Reading a block manifest from disk.
    ReadManifest,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReadTarget => "read target file",
            Self::AppendTarget => "append block to target file",
            Self::ReadBlock => "read block file",
            Self::ReadManifest => "read manifest",
        };
        f.write_str(label)
    }
}

/// Core error type for blockup operations.
#[derive(Debug, Error)]
pub enum BlockupError {
    /// A filesystem operation failed.
    #[error("Failed to {step} {}: {source}", path.display())]
    Io {
        step: Step,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but the current user may not read or write it.
    #[error("Permission denied: could not {step} {}", path.display())]
    PermissionDenied { step: Step, path: PathBuf },

    /// The block cannot be upserted safely.
    #[error("Invalid block: {message}")]
    InvalidBlock { message: String },

    /// A required CLI argument was not supplied.
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// Failed to parse a manifest file.
    #[error("Failed to parse manifest at {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// Manifest parsed but its contents are unusable.
    #[error("Invalid manifest: {message}")]
    ManifestInvalid { message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlockupError {
    /// Wrap an I/O error, promoting permission failures to [`BlockupError::PermissionDenied`].
    pub fn io(step: Step, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                step,
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                step,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether this error stems from bad input rather than a runtime failure.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidBlock { .. }
                | Self::MissingArgument { .. }
                | Self::ManifestParse { .. }
                | Self::ManifestInvalid { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }
}

/// Result type alias for blockup operations.
pub type Result<T> = std::result::Result<T, BlockupError>;
