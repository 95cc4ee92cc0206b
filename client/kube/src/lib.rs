//! Async client library to query Kubernetes clusters targeted by releases.
//!
//! The transport to the Kubernetes API server is provided by implementations of
//! the [`IKubernetes`] trait, this crate only defines the operations releases need.
use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

#[cfg(any(test, feature = "test-fixture"))]
pub mod fixture;

/// Async API client to a Kubernetes cluster.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn IKubernetes>,
}

impl Client {
    /// List pods in a namespace matching a label selector.
    pub async fn get_pods(&self, query: &PodQuery) -> Result<Vec<Pod>> {
        self.backend.get_pods(query).await
    }
}

impl<K> From<K> for Client
where
    K: IKubernetes + 'static,
{
    fn from(value: K) -> Self {
        let backend = Arc::new(value);
        Client { backend }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// Interface to Kubernetes API clients.
///
/// Enables implementation of Kubernetes API clients across different transports.
#[async_trait::async_trait]
pub trait IKubernetes: Send + Sync {
    /// List pods in a namespace matching a label selector.
    async fn get_pods(&self, query: &PodQuery) -> Result<Vec<Pod>>;
}

/// Namespace and label selector scoping a pods listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodQuery {
    /// Namespace to list pods from.
    pub namespace: String,

    /// Equality based label selector, in the `key=value,key=value` format.
    pub label_selector: String,
}

impl PodQuery {
    /// Parse the equality based label selector into label requirements.
    ///
    /// Malformed entries (with no `=`) are ignored.
    pub fn requirements(&self) -> BTreeMap<&str, &str> {
        self.label_selector
            .split(',')
            .filter_map(|entry| entry.split_once('='))
            .map(|(key, value)| (key.trim(), value.trim()))
            .collect()
    }

    /// Check if a set of labels satisfies all requirements of the selector.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements()
            .into_iter()
            .all(|(key, value)| labels.get(key).map(String::as_str) == Some(value))
    }
}

/// Summary of a pod running in a Kubernetes cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    /// Name of the pod.
    pub name: String,

    /// Namespace the pod runs in.
    pub namespace: String,

    /// Labels attached to the pod.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Lifecycle phase of the pod, as reported by the cluster.
    pub phase: PodPhase,

    /// All containers in the pod passed their readiness checks.
    #[serde(default)]
    pub ready: bool,
}

/// Lifecycle phase of a pod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::PodQuery;

    fn query(selector: &str) -> PodQuery {
        PodQuery {
            namespace: "default".into(),
            label_selector: selector.into(),
        }
    }

    #[test]
    fn requirements_are_parsed() {
        let query = query("release_id=1, deploy_group_id=2");
        let requirements: Vec<(&str, &str)> = query.requirements().into_iter().collect();
        assert_eq!(requirements, [("deploy_group_id", "2"), ("release_id", "1")]);
    }

    #[test]
    fn matches_all_labels() {
        let mut labels = BTreeMap::new();
        labels.insert("release_id".to_string(), "1".to_string());
        labels.insert("deploy_group_id".to_string(), "2".to_string());
        labels.insert("role".to_string(), "app".to_string());
        assert!(query("release_id=1,deploy_group_id=2").matches(&labels));
        assert!(!query("release_id=3,deploy_group_id=2").matches(&labels));
        assert!(!query("release_id=1,team=core").matches(&labels));
    }
}
