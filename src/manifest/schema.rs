//! Manifest schema definitions.
//!
//! These structs map directly to the YAML manifest format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of a block manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Default target for every block (`~/` is expanded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Default backup setting for every block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,

    /// Blocks to upsert, applied in order.
    pub blocks: Vec<BlockEntry>,
}

/// One block in a manifest.
///
/// Exactly one of `block`, `block_file`, or `exports` supplies the text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockEntry {
    /// Display name; defaults to the marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Marker substring used for presence detection.
    pub marker: String,

    /// Literal block text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,

    /// File holding the block text (relative to the manifest).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_file: Option<PathBuf>,

    /// Variables to wrap in a generated `# >>> marker >>>` block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<serde_yaml::Mapping>,

    /// Target override for this block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Backup override for this block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,

    /// Set to `false` to append unconditionally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_marker: Option<bool>,
}

impl BlockEntry {
    /// Name shown in output.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.marker)
    }
}
