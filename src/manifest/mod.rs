//! Block manifests.
//!
//! A manifest is a YAML file listing several blocks to upsert in one run:
//!
//! ```yaml
//! target: ~/.bashrc
//! blocks:
//!   - name: swisseph
//!     marker: Swisseph Configuration
//!     exports:
//!       SE_EPHE_PATH: $HOME/.swisseph/ephe
//!   - marker: Local aliases
//!     block_file: aliases.sh
//!     check_marker: false
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_manifest, parse_manifest, ResolveContext, ResolvedBlock};
pub use schema::{BlockEntry, Manifest};
