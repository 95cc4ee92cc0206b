//! Client factory returning mock clients for unit tests.
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use shipcore_context::Context;
use shipcore_models::KubernetesCluster;
use shipkube_client::fixture::Client as MockClient;
use shipkube_client::Client;

/// Factory returning one mock client per cluster API URL.
#[derive(Clone, Default)]
pub struct FixtureFactory {
    clusters: Arc<Mutex<HashMap<String, MockClient>>>,
}

impl FixtureFactory {
    /// Access the mock client for a cluster API URL, creating it if needed.
    pub fn cluster<S>(&self, api_url: S) -> MockClient
    where
        S: Into<String>,
    {
        self.clusters
            .lock()
            .unwrap()
            .entry(api_url.into())
            .or_default()
            .clone()
    }
}

#[async_trait::async_trait]
impl super::UrlFactory for FixtureFactory {
    async fn init(&self, _: &Context, cluster: &KubernetesCluster) -> Result<Client> {
        let mock = self.cluster(cluster.api_url.clone());
        Ok(Client::from(mock))
    }
}
