//! Releases: immutable snapshots of what to deploy where.
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

/// A deployable snapshot of a project at a git revision.
///
/// Releases are created together with all of their [`ReleaseDoc`]s and never change after.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Release {
    /// Unique ID of the release, assigned by the persistent store.
    pub id: i64,

    /// Project the release belongs to.
    pub project_id: i64,

    /// ID of the user that created the release.
    ///
    /// Users may be deleted after a release is created so this is a lookup-only reference.
    pub user_id: i64,

    /// Deploy the release was created for, if any.
    #[serde(default)]
    pub deploy_id: Option<i64>,

    /// Exact commit the release deploys.
    pub git_sha: String,

    /// Branch or tag the release was requested for.
    pub git_ref: String,

    /// Slot the release deploys into when its stage uses blue/green deploys.
    #[serde(default)]
    pub blue_phase: bool,

    /// UTC time the release was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Resolved deployment specification for one role in one deploy group of a [`Release`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReleaseDoc {
    /// Unique ID of the document, assigned by the persistent store.
    pub id: i64,

    /// Release the document belongs to.
    pub release_id: i64,

    /// Deploy group the role is deployed into.
    pub deploy_group_id: i64,

    /// Role the document describes.
    pub kubernetes_role_id: i64,

    /// Number of replicas to run.
    pub replica_target: u32,

    /// CPU cores requested by each replica.
    pub requests_cpu: f64,

    /// Memory, in megabytes, requested by each replica.
    pub requests_memory: u64,

    /// Maximum CPU cores each replica can use.
    pub limits_cpu: f64,

    /// Maximum memory, in megabytes, each replica can use.
    pub limits_memory: u64,

    /// Rendered resource manifests for the role.
    pub resource_template: String,
}

/// Request to atomically persist a new [`Release`] along with all of its documents.
///
/// The persistent store assigns IDs and either stores all records or none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewRelease {
    pub project_id: i64,
    pub user_id: i64,
    pub deploy_id: Option<i64>,
    pub git_sha: String,
    pub git_ref: String,
    pub blue_phase: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Documents to store with the release, in order.
    pub docs: Vec<NewReleaseDoc>,
}

/// A [`ReleaseDoc`] yet to be persisted as part of a [`NewRelease`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReleaseDoc {
    pub deploy_group_id: i64,
    pub kubernetes_role_id: i64,
    pub replica_target: u32,
    pub requests_cpu: f64,
    pub requests_memory: u64,
    pub limits_cpu: f64,
    pub limits_memory: u64,
    pub resource_template: String,
}

impl NewRelease {
    /// Build the [`Release`] record once the store has assigned it an ID.
    pub fn into_release(self, id: i64) -> Release {
        Release {
            id,
            project_id: self.project_id,
            user_id: self.user_id,
            deploy_id: self.deploy_id,
            git_sha: self.git_sha,
            git_ref: self.git_ref,
            blue_phase: self.blue_phase,
            created_at: self.created_at,
        }
    }
}

impl NewReleaseDoc {
    /// Build the [`ReleaseDoc`] record once the store has assigned IDs.
    pub fn into_doc(self, id: i64, release_id: i64) -> ReleaseDoc {
        ReleaseDoc {
            id,
            release_id,
            deploy_group_id: self.deploy_group_id,
            kubernetes_role_id: self.kubernetes_role_id,
            replica_target: self.replica_target,
            requests_cpu: self.requests_cpu,
            requests_memory: self.requests_memory,
            limits_cpu: self.limits_cpu,
            limits_memory: self.limits_memory,
            resource_template: self.resource_template,
        }
    }
}
