//! Idempotent block insertion into text files.
//!
//! - [`ConfigBlockUpserter`] - marker check, optional backup, append
//! - [`backup`] - timestamped backup naming and creation

pub mod backup;
pub mod upserter;

pub use backup::{backup_path, create_backup, create_backup_at, TIMESTAMP_FORMAT};
pub use upserter::{
    count_marker, upsert, ConfigBlockUpserter, UpsertAction, UpsertOptions, UpsertOutcome,
    UpsertPlan,
};
