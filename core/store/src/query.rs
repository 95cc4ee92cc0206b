//! ShipCore persistent store operations to query records.
use shipcore_models::Build;
use shipcore_models::Deploy;
use shipcore_models::DeployGroup;
use shipcore_models::KubernetesCluster;
use shipcore_models::KubernetesRole;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::ReleaseDoc;
use shipcore_models::Stage;
use shipcore_models::User;

use self::seal::SealQueryOp;
use crate::ids::PipelineID;

/// Internal trait to enable query operations on the persistent store.
pub trait QueryOp: Into<QueryOps> + SealQueryOp {
    /// Type returned by the matching query operation.
    type Response: From<QueryResponses>;
}

/// List of all query operations the persistent store must implement.
pub enum QueryOps {
    /// Count the releases of a project.
    CountReleases(i64),

    /// List builds of any project for a git commit, sorted by ID.
    ListBuildsBySha(String),

    /// List the documents of a release, in creation order.
    ListReleaseDocs(i64),

    /// Query a deploy by ID.
    Deploy(i64),

    /// Query a deploy group by ID.
    DeployGroup(i64),

    /// Query a Kubernetes cluster by ID.
    KubernetesCluster(i64),

    /// Query a Kubernetes role by ID.
    KubernetesRole(i64),

    /// Find the most recent release of a pipeline whose deploy succeeded.
    PreviousSuccessfulRelease(PreviousSuccessfulRelease),

    /// Query a project by ID.
    Project(i64),

    /// Query a release by ID.
    Release(i64),

    /// Query a stage by ID.
    Stage(i64),

    /// Query a user by ID.
    User(i64),
}

/// List of all responses from query operations.
pub enum QueryResponses {
    /// Return a list of [`Build`]s.
    Builds(Vec<Build>),

    /// Return the number of records matching the query.
    Count(u64),

    /// Return a [`Deploy`], if one was found matching the query.
    Deploy(Option<Deploy>),

    /// Return a [`DeployGroup`], if one was found matching the query.
    DeployGroup(Option<DeployGroup>),

    /// Return a [`KubernetesCluster`], if one was found matching the query.
    KubernetesCluster(Option<KubernetesCluster>),

    /// Return a [`KubernetesRole`], if one was found matching the query.
    KubernetesRole(Option<KubernetesRole>),

    /// Return a [`Project`], if one was found matching the query.
    Project(Option<Project>),

    /// Return a [`Release`], if one was found matching the query.
    Release(Option<Release>),

    /// Return a list of [`ReleaseDoc`]s.
    ReleaseDocs(Vec<ReleaseDoc>),

    /// Return a [`Stage`], if one was found matching the query.
    Stage(Option<Stage>),

    /// Return a [`User`], if one was found matching the query.
    User(Option<User>),
}

// --- High level query operations --- //
/// Count the releases of a project.
#[derive(Clone, Copy, Debug)]
pub struct CountReleases(pub i64);

/// List builds of any project for a git commit, sorted by ID.
#[derive(Clone, Debug)]
pub struct ListBuildsBySha(pub String);

/// List the documents of a release, in creation order.
#[derive(Clone, Copy, Debug)]
pub struct ListReleaseDocs(pub i64);
impl From<&Release> for ListReleaseDocs {
    fn from(value: &Release) -> Self {
        ListReleaseDocs(value.id)
    }
}

/// Lookup a [`Deploy`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupDeploy(pub i64);

/// Lookup a [`DeployGroup`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupDeployGroup(pub i64);

/// Lookup a [`KubernetesCluster`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupKubernetesCluster(pub i64);

/// Lookup a [`KubernetesRole`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupKubernetesRole(pub i64);

/// Lookup a [`Project`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupProject(pub i64);

/// Lookup a [`Release`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupRelease(pub i64);

/// Lookup a [`Stage`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupStage(pub i64);

/// Lookup a [`User`] record by ID.
#[derive(Clone, Copy, Debug)]
pub struct LookupUser(pub i64);

/// Find the most recently created release of a pipeline whose deploy succeeded.
///
/// Releases are considered when they belong to the pipeline project and their deploy
/// ran through the pipeline stage with a succeeded job.
/// Releases without a deploy, or with deploys in any other state, are ignored.
/// When `before_release_id` is set only releases created before it are considered.
#[derive(Clone, Copy, Debug)]
pub struct PreviousSuccessfulRelease {
    /// Pipeline to search releases in.
    pub pipeline: PipelineID,

    /// Release looking for its predecessor, if it was already persisted.
    pub before_release_id: Option<i64>,
}

// --- Internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`QueryOp`](super::QueryOp) trait.
    pub trait SealQueryOp {}
}

// --- Implement QueryOp and super traits on types for transparent operations --- //
macro_rules! lookup_record {
    ($lookup:ident, $model:ident) => {
        impl SealQueryOp for $lookup {}
        impl QueryOp for $lookup {
            type Response = Option<$model>;
        }
        impl From<$lookup> for QueryOps {
            fn from(value: $lookup) -> Self {
                QueryOps::$model(value.0)
            }
        }
        impl From<QueryResponses> for Option<$model> {
            fn from(value: QueryResponses) -> Self {
                match value {
                    QueryResponses::$model(record) => record,
                    _ => panic!("unexpected result type for the given query operation"),
                }
            }
        }
    };
}

lookup_record!(LookupDeploy, Deploy);
lookup_record!(LookupDeployGroup, DeployGroup);
lookup_record!(LookupKubernetesCluster, KubernetesCluster);
lookup_record!(LookupKubernetesRole, KubernetesRole);
lookup_record!(LookupProject, Project);
lookup_record!(LookupRelease, Release);
lookup_record!(LookupStage, Stage);
lookup_record!(LookupUser, User);

impl SealQueryOp for CountReleases {}
impl QueryOp for CountReleases {
    type Response = u64;
}
impl From<CountReleases> for QueryOps {
    fn from(value: CountReleases) -> Self {
        QueryOps::CountReleases(value.0)
    }
}

impl SealQueryOp for ListBuildsBySha {}
impl QueryOp for ListBuildsBySha {
    type Response = Vec<Build>;
}
impl From<ListBuildsBySha> for QueryOps {
    fn from(value: ListBuildsBySha) -> Self {
        QueryOps::ListBuildsBySha(value.0)
    }
}

impl SealQueryOp for ListReleaseDocs {}
impl QueryOp for ListReleaseDocs {
    type Response = Vec<ReleaseDoc>;
}
impl From<ListReleaseDocs> for QueryOps {
    fn from(value: ListReleaseDocs) -> Self {
        QueryOps::ListReleaseDocs(value.0)
    }
}

impl SealQueryOp for PreviousSuccessfulRelease {}
impl QueryOp for PreviousSuccessfulRelease {
    type Response = Option<Release>;
}
impl From<PreviousSuccessfulRelease> for QueryOps {
    fn from(value: PreviousSuccessfulRelease) -> Self {
        QueryOps::PreviousSuccessfulRelease(value)
    }
}

// --- Implement QueryResponses conversions on return types for transparent operations --- //
impl From<QueryResponses> for u64 {
    fn from(value: QueryResponses) -> Self {
        match value {
            QueryResponses::Count(count) => count,
            _ => panic!("unexpected result type for the given query operation"),
        }
    }
}
impl From<QueryResponses> for Vec<Build> {
    fn from(value: QueryResponses) -> Self {
        match value {
            QueryResponses::Builds(builds) => builds,
            _ => panic!("unexpected result type for the given query operation"),
        }
    }
}
impl From<QueryResponses> for Vec<ReleaseDoc> {
    fn from(value: QueryResponses) -> Self {
        match value {
            QueryResponses::ReleaseDocs(docs) => docs,
            _ => panic!("unexpected result type for the given query operation"),
        }
    }
}
