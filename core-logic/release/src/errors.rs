//! Errors encountered while composing and addressing releases.

/// The release was requested without any deploy group to target.
#[derive(Debug, thiserror::Error)]
#[error("releases must target at least one deploy group")]
pub struct MissingTargets;

/// A deploy group was requested without any role to deploy into it.
#[derive(Debug, thiserror::Error)]
#[error("deploy group at position {index} has no roles to deploy")]
pub struct MissingRoles {
    pub index: usize,
}

impl MissingRoles {
    /// A deploy group was requested without any role to deploy into it.
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

/// The config file of a role was not found in the repository.
#[derive(Debug, thiserror::Error)]
#[error("config file '{path}' for role '{role}' not found at commit '{git_sha}'")]
pub struct RoleConfigMissing {
    pub role: String,
    pub path: String,
    pub git_sha: String,
}

/// The config file of a role does not contain valid resource definitions.
#[derive(Debug, thiserror::Error)]
#[error("config file '{path}' for role '{role}' does not contain valid resource definitions")]
pub struct RoleConfigInvalid {
    pub role: String,
    pub path: String,
}

/// A resource definition is not valid.
#[derive(Debug, thiserror::Error)]
#[error("resource definition is not valid: {reason}")]
pub struct ResourceInvalid {
    pub reason: String,
}

impl ResourceInvalid {
    /// A resource definition is not valid.
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A resource quantity (CPU or memory) could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("resource quantity '{quantity}' is not valid")]
pub struct QuantityInvalid {
    pub quantity: String,
}

/// The rendered resources of a release document could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("resources of release document {doc_id} could not be decoded")]
pub struct ReleaseDocInvalid {
    pub doc_id: i64,
}

/// The expected deploy was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected deploy {deploy_id} was not found")]
pub struct DeployNotFound {
    pub deploy_id: i64,
}

/// The expected deploy group was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected deploy group {deploy_group_id} was not found")]
pub struct DeployGroupNotFound {
    pub deploy_group_id: i64,
}

/// The expected Kubernetes cluster was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected kubernetes cluster {cluster_id} was not found")]
pub struct ClusterNotFound {
    pub cluster_id: i64,
}

/// The expected project was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected project {project_id} was not found")]
pub struct ProjectNotFound {
    pub project_id: i64,
}

/// The expected Kubernetes role was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected kubernetes role {role_id} was not found")]
pub struct RoleNotFound {
    pub role_id: i64,
}

/// The expected stage was not found.
#[derive(Debug, thiserror::Error)]
#[error("the expected stage {stage_id} was not found")]
pub struct StageNotFound {
    pub stage_id: i64,
}
