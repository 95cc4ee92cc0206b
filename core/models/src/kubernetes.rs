//! Kubernetes clusters, the deploy groups targeting them and the roles deployed into them.
use serde::Deserialize;
use serde::Serialize;

/// A named cluster/namespace context roles can be deployed into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployGroup {
    /// Unique ID of the deploy group.
    pub id: i64,

    /// Human readable name of the deploy group.
    pub name: String,

    /// Short identifier of the group, exposed to workloads as their environment.
    pub env_value: String,

    /// Namespace resources are deployed to when their manifest does not name one.
    pub namespace: String,

    /// Cluster the deploy group lives in.
    pub cluster_id: i64,
}

/// A Kubernetes cluster reachable through its API server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesCluster {
    /// Unique ID of the cluster.
    pub id: i64,

    /// Human readable name of the cluster.
    pub name: String,

    /// URL of the API server, the schema selects the client implementation.
    pub api_url: String,
}

/// An application role of a project, defined by a config file in the project repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesRole {
    /// Unique ID of the role.
    pub id: i64,

    /// Project the role belongs to.
    pub project_id: i64,

    /// Human readable name of the role.
    pub name: String,

    /// Path of the role's resource definitions within the repository.
    pub config_file: String,

    /// Name of the service exposing the role, if any.
    #[serde(default)]
    pub service_name: Option<String>,
}
