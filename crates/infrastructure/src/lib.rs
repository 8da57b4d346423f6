//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod access_snapshot_document;
mod in_memory_access_directory;

pub use access_snapshot_document::{
    AccessSnapshotDocument, ActorRecord, AssignmentRecord, PermissionRecord, RoleRecord,
};
pub use in_memory_access_directory::InMemoryAccessDirectory;
