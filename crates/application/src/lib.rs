//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod authorization_engine;
mod authorization_service;
mod fallback_policy;

pub use access_ports::{ActorDirectory, ProjectAssignmentDirectory, RoleDirectory};
pub use authorization_engine::{AccessSnapshot, global_match, project_match};
pub use authorization_service::AuthorizationService;
pub use fallback_policy::{DenyFallback, FallbackPolicy, OwnRecordsFallback};
