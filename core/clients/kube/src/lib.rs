//! Registry and factories to initialise Kubernetes API clients on demand.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use shipcore_context::Context;
use shipcore_models::KubernetesCluster;
use shipkube_client::Client;

pub mod errors;
#[cfg(any(test, feature = "test-fixture"))]
pub mod fixture;

/// Convenience type for heap allocated [`UrlFactory`]s.
pub type ArcedUrlFactory = Arc<dyn UrlFactory>;

/// Async function to initialise Kubernetes clients on demand.
///
/// Factories are selected by the schema of the cluster's API URL.
#[async_trait::async_trait]
pub trait UrlFactory: Send + Sync {
    /// Initialise a new client for the [`KubernetesCluster`].
    async fn init(&self, context: &Context, cluster: &KubernetesCluster) -> Result<Client>;
}

/// Registry of Kubernetes API client factories.
#[derive(Clone)]
pub struct KubeClients {
    url_schemas: HashMap<String, ArcedUrlFactory>,
}

impl KubeClients {
    /// Create a [`KubeClients`] registry with no factories configured.
    pub fn empty() -> KubeClients {
        KubeClients {
            url_schemas: Default::default(),
        }
    }

    /// Initialise a client to interact with a [`KubernetesCluster`].
    pub async fn factory(&self, context: &Context, cluster: &KubernetesCluster) -> Result<Client> {
        let (schema, _) = match cluster.api_url.split_once(':') {
            Some(parts) => parts,
            None => {
                let error = self::errors::UrlClientNoSchema {
                    cluster_id: cluster.id,
                    name: cluster.name.clone(),
                };
                anyhow::bail!(error);
            }
        };
        let factory = match self.url_schemas.get(schema) {
            Some(factory) => factory,
            None => {
                let error = self::errors::UrlClientUnknownSchema {
                    cluster_id: cluster.id,
                    name: cluster.name.clone(),
                    schema: schema.to_string(),
                };
                anyhow::bail!(error);
            }
        };
        factory.init(context, cluster).await
    }

    /// Register a URL client factory for a schema.
    pub fn with_url_factory<F, S>(&mut self, schema: S, factory: F) -> &mut Self
    where
        S: Into<String>,
        F: UrlFactory + 'static,
    {
        let schema = schema.into();
        let factory = Arc::new(factory);
        self.url_schemas.insert(schema, factory);
        self
    }
}

impl Default for KubeClients {
    fn default() -> Self {
        KubeClients::empty()
    }
}
