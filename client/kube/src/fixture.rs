//! Mock client implementation for unit tests.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;

use super::Pod;
use super::PodPhase;
use super::PodQuery;

/// Mock client implementation for unit tests.
///
/// Clones share the same state so tests can inspect a mock after handing it to a [`crate::Client`].
#[derive(Clone, Default)]
pub struct Client {
    state: Arc<Mutex<ClientState>>,
}

impl Client {
    /// Append a running and ready pod with a random name to a namespace.
    pub fn append_pod<S>(&self, namespace: S, labels: BTreeMap<String, String>) -> Pod
    where
        S: Into<String>,
    {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(5)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        let pod = Pod {
            name: format!("pod-{}", suffix),
            namespace: namespace.into(),
            labels,
            phase: PodPhase::Running,
            ready: true,
        };
        self.state.lock().unwrap().pods.push(pod.clone());
        pod
    }

    /// Queries received by the client, in the order they were received.
    pub fn queries(&self) -> Vec<PodQuery> {
        self.state.lock().unwrap().queries.clone()
    }
}

#[async_trait::async_trait]
impl super::IKubernetes for Client {
    async fn get_pods(&self, query: &PodQuery) -> Result<Vec<Pod>> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());
        let pods = state
            .pods
            .iter()
            .filter(|pod| pod.namespace == query.namespace && query.matches(&pod.labels))
            .cloned()
            .collect();
        Ok(pods)
    }
}

/// Internal state to implement Kubernetes mocking.
#[derive(Default)]
struct ClientState {
    pods: Vec<Pod>,
    queries: Vec<PodQuery>,
}
