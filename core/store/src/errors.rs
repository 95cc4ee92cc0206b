//! Errors returned by persistent store backends for rejected records.

/// Releases must be persisted with at least one document.
#[derive(Debug, thiserror::Error)]
#[error("release for project {project_id} has no documents")]
pub struct ReleaseWithoutDocs {
    pub project_id: i64,
}

/// A release document references a role from a different project than the release.
#[derive(Debug, thiserror::Error)]
#[error("role {role_id} does not belong to project {project_id}")]
pub struct RoleProjectMismatch {
    pub project_id: i64,
    pub role_id: i64,
}
