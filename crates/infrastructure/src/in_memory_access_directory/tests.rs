use atrium_application::{ActorDirectory, ProjectAssignmentDirectory, RoleDirectory};
use atrium_core::{ActorId, AppError, ProjectId, RoleId};
use atrium_domain::{
    Actor, ActorKind, Permission, PermissionSlug, Role, RoleInput, RoleScope, RoleSlug,
};

use super::InMemoryAccessDirectory;

async fn seeded_directory() -> InMemoryAccessDirectory {
    let directory = InMemoryAccessDirectory::new();
    directory
        .seed_standard_catalog()
        .await
        .unwrap_or_else(|error| panic!("seeding failed: {error}"));
    directory
        .save_actor(
            Actor::new(ActorId::from("U1"), ActorKind::User, Some(RoleId::from("employee")))
                .unwrap_or_else(|_| panic!("actor should be valid")),
        )
        .await
        .unwrap_or_else(|error| panic!("saving actor failed: {error}"));
    directory
}

#[tokio::test]
async fn seeded_catalog_exposes_standard_roles() {
    let directory = seeded_directory().await;

    let roles = directory.list_roles().await;
    let slugs: Vec<&str> = roles.iter().map(|role| role.slug().as_str()).collect();

    assert_eq!(
        slugs,
        vec![
            "contractor",
            "employee",
            "manager",
            "project-manager",
            "project-member",
            "project-viewer",
            "super-admin",
        ]
    );
    assert_eq!(directory.list_permissions().await.len(), 43);
}

#[tokio::test]
async fn reassigning_project_role_overwrites() {
    let directory = seeded_directory().await;
    let actor_id = ActorId::from("U1");
    let project_id = ProjectId::from("P1");

    directory
        .assign_project_role(&actor_id, &project_id, Some(RoleId::from("contractor")))
        .await
        .unwrap_or_else(|error| panic!("assign failed: {error}"));
    directory
        .assign_project_role(&actor_id, &project_id, Some(RoleId::from("manager")))
        .await
        .unwrap_or_else(|error| panic!("reassign failed: {error}"));

    let assignments = directory.list_project_assignments(&project_id).await;
    assert_eq!(assignments.len(), 1);

    let found = directory
        .find_assignment(&actor_id, &project_id)
        .await
        .ok()
        .flatten();
    assert_eq!(
        found.as_ref().and_then(|assignment| assignment.role_id()),
        Some(&RoleId::from("manager"))
    );
}

#[tokio::test]
async fn assigning_unknown_role_is_rejected() {
    let directory = seeded_directory().await;

    let result = directory
        .assign_project_role(
            &ActorId::from("U1"),
            &ProjectId::from("P1"),
            Some(RoleId::from("project-owner")),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn detaching_removes_assignment() {
    let directory = seeded_directory().await;
    let actor_id = ActorId::from("U1");
    let project_id = ProjectId::from("P1");

    directory
        .assign_project_role(&actor_id, &project_id, None)
        .await
        .unwrap_or_else(|error| panic!("assign failed: {error}"));
    directory
        .detach_from_project(&actor_id, &project_id)
        .await
        .unwrap_or_else(|error| panic!("detach failed: {error}"));

    let found = directory.find_assignment(&actor_id, &project_id).await.ok().flatten();
    assert!(found.is_none());
    assert!(directory.detach_from_project(&actor_id, &project_id).await.is_err());
}

#[tokio::test]
async fn global_role_can_be_replaced_and_cleared() {
    let directory = seeded_directory().await;
    let actor_id = ActorId::from("U1");

    directory
        .set_global_role(&actor_id, Some(RoleId::from("manager")))
        .await
        .unwrap_or_else(|error| panic!("set failed: {error}"));
    let actor = directory.find_actor(&actor_id).await.ok().flatten();
    assert_eq!(
        actor.as_ref().and_then(Actor::global_role_id),
        Some(&RoleId::from("manager"))
    );

    directory
        .set_global_role(&actor_id, None)
        .await
        .unwrap_or_else(|error| panic!("clear failed: {error}"));
    let actor = directory.find_actor(&actor_id).await.ok().flatten();
    assert!(actor.as_ref().and_then(Actor::global_role_id).is_none());
}

#[tokio::test]
async fn role_with_unregistered_permission_is_rejected() {
    let directory = InMemoryAccessDirectory::new();
    let role = Role::new(RoleInput {
        id: RoleId::from("auditor"),
        name: "Auditor".to_owned(),
        slug: RoleSlug::new("auditor").unwrap_or_else(|_| panic!("slug should be valid")),
        scope: RoleScope::Application,
        permissions: vec![Permission::from_slug(
            PermissionSlug::new("view_audit_log")
                .unwrap_or_else(|_| panic!("slug should be valid")),
            None,
        )],
    })
    .unwrap_or_else(|_| panic!("role should be valid"));

    let result = directory.save_role(role).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_role_slug_under_new_id_is_rejected() {
    let directory = seeded_directory().await;
    let role = Role::new(RoleInput {
        id: RoleId::from("manager-copy"),
        name: "Manager".to_owned(),
        slug: RoleSlug::new("manager").unwrap_or_else(|_| panic!("slug should be valid")),
        scope: RoleScope::Application,
        permissions: Vec::new(),
    })
    .unwrap_or_else(|_| panic!("role should be valid"));

    let result = directory.save_role(role).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(directory.find_role(&RoleId::from("manager-copy")).await.ok().flatten().is_none());
}

#[tokio::test]
async fn project_scoped_role_cannot_become_global_role() {
    let directory = seeded_directory().await;

    let saved = directory
        .save_actor(
            Actor::new(
                ActorId::from("U7"),
                ActorKind::User,
                Some(RoleId::from("project-member")),
            )
            .unwrap_or_else(|_| panic!("actor should be valid")),
        )
        .await;
    let replaced = directory
        .set_global_role(&ActorId::from("U1"), Some(RoleId::from("project-viewer")))
        .await;

    assert!(matches!(saved, Err(AppError::Validation(_))));
    assert!(matches!(replaced, Err(AppError::Validation(_))));
    assert!(directory.find_actor(&ActorId::from("U7")).await.ok().flatten().is_none());
    let actor = directory.find_actor(&ActorId::from("U1")).await.ok().flatten();
    assert_eq!(
        actor.as_ref().and_then(Actor::global_role_id),
        Some(&RoleId::from("employee"))
    );
}

#[tokio::test]
async fn global_role_in_use_cannot_turn_project_scoped() {
    let directory = seeded_directory().await;
    let role = Role::new(RoleInput {
        id: RoleId::from("employee"),
        name: "Employee".to_owned(),
        slug: RoleSlug::new("employee").unwrap_or_else(|_| panic!("slug should be valid")),
        scope: RoleScope::Project,
        permissions: Vec::new(),
    })
    .unwrap_or_else(|_| panic!("role should be valid"));

    let result = directory.save_role(role).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let stored = directory.find_role(&RoleId::from("employee")).await.ok().flatten();
    assert_eq!(stored.map(|role| role.scope()), Some(RoleScope::Application));
}

#[tokio::test]
async fn actor_assignments_are_listed_by_project() {
    let directory = seeded_directory().await;
    let actor_id = ActorId::from("U1");

    for project in ["P2", "P1"] {
        directory
            .assign_project_role(
                &actor_id,
                &ProjectId::from(project),
                Some(RoleId::from("project-manager")),
            )
            .await
            .unwrap_or_else(|error| panic!("assign failed: {error}"));
    }

    let assignments = directory
        .find_assignments_for_actor(&actor_id)
        .await
        .unwrap_or_else(|error| panic!("listing failed: {error}"));
    let projects: Vec<&str> = assignments
        .iter()
        .map(|assignment| assignment.project_id().as_str())
        .collect();

    assert_eq!(projects, vec!["P1", "P2"]);
    assert!(
        directory
            .find_assignments_for_actor(&ActorId::from("U404"))
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
