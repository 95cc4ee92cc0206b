//! Kubernetes resources defined by role config files and release documents.
use anyhow::Context as AnyContext;
use anyhow::Result;
use serde::Deserialize;
use serde_yaml::Mapping;
use serde_yaml::Value;

use crate::errors::ResourceInvalid;

/// Kinds of Kubernetes resources releases know how to handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ConfigMap,
    CronJob,
    DaemonSet,
    Deployment,
    Job,
    Pod,
    PodDisruptionBudget,
    Service,
    StatefulSet,
    Other(String),
}

impl ResourceKind {
    /// Name of the kind as it appears in resource definitions.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::CronJob => "CronJob",
            Self::DaemonSet => "DaemonSet",
            Self::Deployment => "Deployment",
            Self::Job => "Job",
            Self::Pod => "Pod",
            Self::PodDisruptionBudget => "PodDisruptionBudget",
            Self::Service => "Service",
            Self::StatefulSet => "StatefulSet",
            Self::Other(kind) => kind,
        }
    }

    /// Resources of this kind run pods labelled with the release that created them.
    pub fn owns_pods(&self) -> bool {
        matches!(
            self,
            Self::CronJob
                | Self::DaemonSet
                | Self::Deployment
                | Self::Job
                | Self::Pod
                | Self::StatefulSet
        )
    }

    /// Patch updates to resources of this kind do not refresh the labels of their pods.
    ///
    /// Pods of these resources keep the labels of the release that last replaced them.
    pub fn patch_replace(&self) -> bool {
        matches!(self, Self::StatefulSet)
    }
}

impl From<&str> for ResourceKind {
    fn from(value: &str) -> Self {
        match value {
            "ConfigMap" => Self::ConfigMap,
            "CronJob" => Self::CronJob,
            "DaemonSet" => Self::DaemonSet,
            "Deployment" => Self::Deployment,
            "Job" => Self::Job,
            "Pod" => Self::Pod,
            "PodDisruptionBudget" => Self::PodDisruptionBudget,
            "Service" => Self::Service,
            "StatefulSet" => Self::StatefulSet,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single Kubernetes resource definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    /// Kind of the resource.
    pub kind: ResourceKind,

    /// Name of the resource, empty when the definition does not set one.
    pub name: String,

    /// Namespace the resource lives in.
    ///
    /// This is the namespace in the definition or the deploy group namespace otherwise.
    pub namespace: String,

    /// Full resource definition.
    pub manifest: Value,
}

impl Resource {
    /// Build a resource from its definition.
    pub fn build(manifest: Value, default_namespace: &str) -> Result<Resource> {
        let root = match manifest.as_mapping() {
            Some(root) => root,
            None => anyhow::bail!(ResourceInvalid::new("definition is not a mapping")),
        };
        let kind = match root.get("kind").and_then(Value::as_str) {
            Some(kind) => ResourceKind::from(kind),
            None => anyhow::bail!(ResourceInvalid::new("definition has no kind")),
        };
        let metadata = root.get("metadata").and_then(Value::as_mapping);
        let name = metadata
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let namespace = metadata
            .and_then(|metadata| metadata.get("namespace"))
            .and_then(Value::as_str)
            .unwrap_or(default_namespace)
            .to_string();
        Ok(Resource {
            kind,
            name,
            namespace,
            manifest,
        })
    }

    /// Mutable access to the pod spec of pod-owning resources.
    pub fn pod_spec_mut(&mut self) -> Option<&mut Mapping> {
        let path: &[&str] = match self.kind {
            ResourceKind::Pod => &["spec"],
            ResourceKind::CronJob => &["spec", "jobTemplate", "spec", "template", "spec"],
            ref kind if kind.owns_pods() => &["spec", "template", "spec"],
            _ => return None,
        };
        let mut node = &mut self.manifest;
        for key in path {
            node = node.as_mapping_mut()?.get_mut(*key)?;
        }
        node.as_mapping_mut()
    }

    /// Read only access to the pod spec of pod-owning resources.
    pub fn pod_spec(&self) -> Option<&Mapping> {
        let path: &[&str] = match self.kind {
            ResourceKind::Pod => &["spec"],
            ResourceKind::CronJob => &["spec", "jobTemplate", "spec", "template", "spec"],
            ref kind if kind.owns_pods() => &["spec", "template", "spec"],
            _ => return None,
        };
        let mut node = &self.manifest;
        for key in path {
            node = node.as_mapping()?.get(*key)?;
        }
        node.as_mapping()
    }
}

/// Decode all resources in a multi-document YAML stream.
///
/// Empty documents are skipped.
pub fn parse_resources(content: &str, default_namespace: &str) -> Result<Vec<Resource>> {
    let mut resources = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let manifest = Value::deserialize(document).context(ResourceInvalid::new(
            "definitions are not a valid YAML stream",
        ))?;
        if manifest.is_null() {
            continue;
        }
        resources.push(Resource::build(manifest, default_namespace)?);
    }
    Ok(resources)
}

/// Encode resources into a multi-document YAML stream.
pub fn render_resources(resources: &[Resource]) -> Result<String> {
    let mut documents = Vec::with_capacity(resources.len());
    for resource in resources {
        documents.push(serde_yaml::to_string(&resource.manifest)?);
    }
    Ok(documents.join("---\n"))
}

/// Resource used to address the pods of a role.
///
/// This is the first pod-owning resource or the first resource if none own pods.
pub fn primary(resources: &[Resource]) -> Option<&Resource> {
    resources
        .iter()
        .find(|resource| resource.kind.owns_pods())
        .or_else(|| resources.first())
}
