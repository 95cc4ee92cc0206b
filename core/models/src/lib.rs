//! Data models for ShipCore Kubernetes releases and the records they reference.
mod build;
mod deploy;
mod kubernetes;
mod project;
mod release;
mod user;

pub use self::build::Build;
pub use self::deploy::Deploy;
pub use self::deploy::JobStatus;
pub use self::deploy::Stage;
pub use self::kubernetes::DeployGroup;
pub use self::kubernetes::KubernetesCluster;
pub use self::kubernetes::KubernetesRole;
pub use self::project::Project;
pub use self::release::NewRelease;
pub use self::release::NewReleaseDoc;
pub use self::release::Release;
pub use self::release::ReleaseDoc;
pub use self::user::ReleaseUser;
pub use self::user::User;
