//! Errors around Kubernetes clients lookup or initialisation.

/// URL-based client for a Kubernetes cluster does not have a schema.
#[derive(Debug, thiserror::Error)]
#[error("URL-based client for kubernetes cluster '{name}' (id {cluster_id}) does not have a schema")]
pub struct UrlClientNoSchema {
    pub cluster_id: i64,
    pub name: String,
}

/// Unknown schema provided for URL-based client for a Kubernetes cluster.
#[derive(Debug, thiserror::Error)]
#[error("Unknown schema '{schema}' provided for URL-based client for kubernetes cluster '{name}' (id {cluster_id})")]
pub struct UrlClientUnknownSchema {
    pub cluster_id: i64,
    pub name: String,
    pub schema: String,
}
