//! Render the resources a release document deploys.
use anyhow::Result;
use serde_yaml::Mapping;
use serde_yaml::Value;

use shipcore_models::DeployGroup;
use shipcore_models::KubernetesRole;

use crate::quantity;
use crate::resources::Resource;
use crate::role_config::RoleConfig;
use crate::role_config::RoleSpec;

/// Everything needed to render the resources of a role in a deploy group.
pub struct DocTemplate<'a> {
    pub deploy_group: &'a DeployGroup,
    pub role: &'a KubernetesRole,
    pub config: &'a RoleConfig,

    /// Final replica count and allocations, with overrides applied.
    pub spec: RoleSpec,
}

/// Render the final resource definitions for a release document.
pub trait TemplateFiller: Send + Sync {
    /// Render the resources as a multi-document YAML stream.
    fn fill(&self, template: &DocTemplate) -> Result<String>;
}

/// Apply replica count, resource allocations and namespace to resource definitions.
///
/// - The replica count is set on pod-owning resources that support it.
/// - Requests and limits are set on the first container of pod-owning resources.
/// - Resources without an explicit namespace are placed in the deploy group namespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverridesFiller;

impl TemplateFiller for OverridesFiller {
    fn fill(&self, template: &DocTemplate) -> Result<String> {
        let mut resources = template.config.resources.clone();
        for resource in resources.iter_mut() {
            set_namespace(resource, &template.deploy_group.namespace);
            if !resource.kind.owns_pods() {
                continue;
            }
            if supports_replicas(resource) {
                set_replicas(resource, template.spec.replicas);
            }
            set_container_resources(resource, &template.spec);
        }
        crate::resources::render_resources(&resources)
    }
}

fn supports_replicas(resource: &Resource) -> bool {
    use crate::resources::ResourceKind;
    matches!(
        resource.kind,
        ResourceKind::Deployment | ResourceKind::StatefulSet
    )
}

fn set_namespace(resource: &mut Resource, namespace: &str) {
    let root = match resource.manifest.as_mapping_mut() {
        Some(root) => root,
        None => return,
    };
    let metadata = root
        .entry(Value::from("metadata"))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if let Some(metadata) = metadata.as_mapping_mut() {
        if !metadata.contains_key("namespace") {
            metadata.insert(Value::from("namespace"), Value::from(namespace));
        }
    }
    resource.namespace = match metadata.get("namespace").and_then(Value::as_str) {
        Some(namespace) => namespace.to_string(),
        None => namespace.to_string(),
    };
}

fn set_replicas(resource: &mut Resource, replicas: u32) {
    let spec = resource
        .manifest
        .as_mapping_mut()
        .and_then(|root| root.get_mut("spec"))
        .and_then(Value::as_mapping_mut);
    if let Some(spec) = spec {
        spec.insert(Value::from("replicas"), Value::from(replicas));
    }
}

fn set_container_resources(resource: &mut Resource, spec: &RoleSpec) {
    let container = resource
        .pod_spec_mut()
        .and_then(|pod| pod.get_mut("containers"))
        .and_then(Value::as_sequence_mut)
        .and_then(|containers| containers.first_mut())
        .and_then(Value::as_mapping_mut);
    let container = match container {
        Some(container) => container,
        None => return,
    };

    let mut requests = Mapping::new();
    requests.insert("cpu".into(), quantity::format_cpu(spec.requests_cpu).into());
    requests.insert(
        "memory".into(),
        quantity::format_memory(spec.requests_memory).into(),
    );
    let mut limits = Mapping::new();
    limits.insert("cpu".into(), quantity::format_cpu(spec.limits_cpu).into());
    limits.insert(
        "memory".into(),
        quantity::format_memory(spec.limits_memory).into(),
    );
    let mut resources = Mapping::new();
    resources.insert("requests".into(), Value::Mapping(requests));
    resources.insert("limits".into(), Value::Mapping(limits));
    container.insert("resources".into(), Value::Mapping(resources));
}
