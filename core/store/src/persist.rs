//! ShipCore persistent store operations to persist records.
use shipcore_models::Build;
use shipcore_models::Deploy;
use shipcore_models::DeployGroup;
use shipcore_models::KubernetesCluster;
use shipcore_models::KubernetesRole;
use shipcore_models::NewRelease;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::Stage;
use shipcore_models::User;

use self::seal::SealPersistOp;

/// Internal trait to enable persist operations on the persistent store.
pub trait PersistOp: Into<PersistOps> + SealPersistOp {
    /// Type returned by the matching persist operation.
    type Response: From<PersistResponses>;
}

/// List of all persist operations the persistent store must implement.
pub enum PersistOps {
    /// Persist a build record.
    Build(Build),

    /// Persist a deploy record.
    Deploy(Deploy),

    /// Persist a deploy group record.
    DeployGroup(DeployGroup),

    /// Persist a Kubernetes cluster record.
    KubernetesCluster(KubernetesCluster),

    /// Persist a Kubernetes role record.
    KubernetesRole(KubernetesRole),

    /// Persist a project record.
    Project(Project),

    /// Atomically create a release and all of its documents.
    Release(NewRelease),

    /// Persist a stage record.
    Stage(Stage),

    /// Persist a user record.
    User(User),
}

/// List of all responses from persist operations.
pub enum PersistResponses {
    /// A new release was created with the given ID.
    Release(Release),

    /// The operation completed successfully and does not return data.
    Success,
}

// --- Internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`PersistOp`](super::PersistOp) trait.
    pub trait SealPersistOp {}
}

// --- Implement PersistOp and super traits on types for transparent operations --- //
macro_rules! persist_record {
    ($model:ident) => {
        impl PersistOp for $model {
            type Response = ();
        }
        impl SealPersistOp for $model {}
        impl From<$model> for PersistOps {
            fn from(value: $model) -> Self {
                PersistOps::$model(value)
            }
        }
    };
}

persist_record!(Build);
persist_record!(Deploy);
persist_record!(DeployGroup);
persist_record!(KubernetesCluster);
persist_record!(KubernetesRole);
persist_record!(Project);
persist_record!(Stage);
persist_record!(User);

impl PersistOp for NewRelease {
    type Response = Release;
}
impl SealPersistOp for NewRelease {}
impl From<NewRelease> for PersistOps {
    fn from(value: NewRelease) -> Self {
        PersistOps::Release(value)
    }
}

// --- Implement PersistResponses conversions on return types for transparent operations --- //
impl From<PersistResponses> for () {
    fn from(value: PersistResponses) -> Self {
        match value {
            PersistResponses::Success => (),
            _ => panic!("unexpected result type for the given persist operation"),
        }
    }
}
impl From<PersistResponses> for Release {
    fn from(value: PersistResponses) -> Self {
        match value {
            PersistResponses::Release(release) => release,
            _ => panic!("unexpected result type for the given persist operation"),
        }
    }
}
