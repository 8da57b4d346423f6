//! Atrium access probe.
//!
//! Evaluates one authorization query against an access snapshot and prints
//! the decision, the any-project decision, the effective permission set and
//! the visible navigation sections as JSON.

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use atrium_application::{AuthorizationService, OwnRecordsFallback};
use atrium_core::{ActorId, AppError, AppResult, ProjectId};
use atrium_domain::{
    AuthorizationDecision, AuthorizationQuery, GrantedPermission, NavigationSection,
};
use atrium_infrastructure::{AccessSnapshotDocument, InMemoryAccessDirectory};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct ProbeConfig {
    snapshot_path: Option<PathBuf>,
    actor_id: String,
    permission: String,
    project_id: Option<String>,
    own_records_permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    actor_id: String,
    permission: String,
    project_id: Option<String>,
    decision: AuthorizationDecision,
    any_project_decision: AuthorizationDecision,
    effective_permissions: Vec<GrantedPermission>,
    visible_sections: Vec<NavigationSection>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ProbeConfig::load()?;
    let directory = Arc::new(load_directory(&config).await?);
    let service = build_authorization_service(&config, directory)?;

    info!(
        actor_id = %config.actor_id,
        permission = %config.permission,
        project_id = config.project_id.as_deref(),
        "evaluating access probe"
    );

    let query = AuthorizationQuery {
        actor_id: ActorId::from(config.actor_id.as_str()),
        permission_slug: config.permission.clone(),
        project_id: config.project_id.as_deref().map(ProjectId::from),
    };
    let decision = service.authorize(&query).await?;
    let any_project_decision = service
        .authorize_in_any_project(&query.actor_id, config.permission.as_str())
        .await?;
    let effective_permissions = service
        .resolve_effective_permissions(&query.actor_id, query.project_id.as_ref())
        .await?;
    let visible_sections = service
        .resolve_visible_sections(&query.actor_id, query.project_id.as_ref())
        .await?;

    let report = ProbeReport {
        actor_id: config.actor_id,
        permission: config.permission,
        project_id: config.project_id,
        decision,
        any_project_decision,
        effective_permissions: effective_permissions.into(),
        visible_sections,
    };
    let output = serde_json::to_string_pretty(&report)
        .map_err(|error| AppError::Internal(format!("failed to encode probe report: {error}")))?;
    println!("{output}");

    Ok(())
}

async fn load_directory(config: &ProbeConfig) -> AppResult<InMemoryAccessDirectory> {
    match &config.snapshot_path {
        Some(path) => {
            AccessSnapshotDocument::from_path(path)
                .await?
                .into_directory()
                .await
        }
        None => {
            info!("ATRIUM_SNAPSHOT_PATH not set, seeding the standard catalog only");
            let directory = InMemoryAccessDirectory::new();
            directory.seed_standard_catalog().await?;
            Ok(directory)
        }
    }
}

fn build_authorization_service(
    config: &ProbeConfig,
    directory: Arc<InMemoryAccessDirectory>,
) -> AppResult<AuthorizationService> {
    let service =
        AuthorizationService::new(directory.clone(), directory.clone(), directory);

    if config.own_records_permissions.is_empty() {
        return Ok(service);
    }

    let fallback = OwnRecordsFallback::from_slugs(&config.own_records_permissions)?;
    Ok(service.with_fallback_policy(Arc::new(fallback)))
}

impl ProbeConfig {
    fn load() -> AppResult<Self> {
        let snapshot_path = optional_env("ATRIUM_SNAPSHOT_PATH").map(PathBuf::from);
        let actor_id = required_env("ATRIUM_ACTOR_ID")?;
        let permission = required_env("ATRIUM_PERMISSION")?;
        let project_id = optional_env("ATRIUM_PROJECT_ID");
        let own_records_permissions = optional_env("ATRIUM_OWN_RECORDS_PERMISSIONS")
            .map(|value| parse_list(value.as_str()))
            .unwrap_or_default();

        Ok(Self {
            snapshot_path,
            actor_id,
            permission,
            project_id,
            own_records_permissions,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    optional_env(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
