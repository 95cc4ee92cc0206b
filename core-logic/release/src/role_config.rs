//! Resolve the resource definitions and defaults of a role at a git revision.
use anyhow::Context as AnyContext;
use anyhow::Result;
use serde_yaml::Mapping;
use serde_yaml::Value;

use shipcore_context::Context;
use shipcore_models::KubernetesRole;

use crate::errors::RoleConfigInvalid;
use crate::errors::RoleConfigMissing;
use crate::quantity;
use crate::resources::Resource;

/// Default number of replicas when a workload does not specify one.
const DEFAULT_REPLICAS: u32 = 1;

/// Access to files in a project's source repository.
#[async_trait::async_trait]
pub trait RepositorySource: Send + Sync {
    /// Content of the file at `path` as of `git_ref`, or `None` if the file does not exist.
    async fn file_content(&self, git_ref: &str, path: &str) -> Result<Option<String>>;
}

/// Replica count and resource allocations for each replica of a role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoleSpec {
    pub replicas: u32,
    pub requests_cpu: f64,
    pub requests_memory: u64,
    pub limits_cpu: f64,
    pub limits_memory: u64,
}

impl Default for RoleSpec {
    fn default() -> Self {
        RoleSpec {
            replicas: DEFAULT_REPLICAS,
            requests_cpu: 0.0,
            requests_memory: 0,
            limits_cpu: 0.0,
            limits_memory: 0,
        }
    }
}

/// Resource definitions of a role along with the defaults they declare.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleConfig {
    /// Defaults declared by the primary workload of the role.
    pub defaults: RoleSpec,

    /// All resources defined for the role, in file order.
    pub resources: Vec<Resource>,
}

/// Fetch and decode the config file of a role at the given commit.
pub async fn resolve(
    context: &Context,
    repository: &dyn RepositorySource,
    role: &KubernetesRole,
    git_sha: &str,
    default_namespace: &str,
) -> Result<RoleConfig> {
    let content = repository.file_content(git_sha, &role.config_file).await?;
    let content = match content {
        Some(content) => content,
        None => anyhow::bail!(RoleConfigMissing {
            role: role.name.clone(),
            path: role.config_file.clone(),
            git_sha: git_sha.to_string(),
        }),
    };

    let invalid = || RoleConfigInvalid {
        role: role.name.clone(),
        path: role.config_file.clone(),
    };
    let resources =
        crate::resources::parse_resources(&content, default_namespace).with_context(invalid)?;
    if resources.is_empty() {
        anyhow::bail!(invalid());
    }
    let defaults = defaults(&resources).with_context(invalid)?;
    slog::debug!(
        context.logger, "Resolved role config";
        "role" => &role.name,
        "git_sha" => git_sha,
        "resources" => resources.len(),
    );
    Ok(RoleConfig {
        defaults,
        resources,
    })
}

/// Extract the defaults declared by the first pod-owning resource.
fn defaults(resources: &[Resource]) -> Result<RoleSpec> {
    let mut spec = RoleSpec::default();
    let workload = match resources.iter().find(|resource| resource.kind.owns_pods()) {
        Some(workload) => workload,
        None => return Ok(spec),
    };

    let replicas = workload
        .manifest
        .get("spec")
        .and_then(|spec| spec.get("replicas"))
        .and_then(Value::as_u64);
    if let Some(replicas) = replicas {
        spec.replicas = u32::try_from(replicas)?;
    }

    let resources = workload
        .pod_spec()
        .and_then(|pod| pod.get("containers"))
        .and_then(Value::as_sequence)
        .and_then(|containers| containers.first())
        .and_then(|container| container.get("resources"));
    let requests = resources.and_then(|resources| resources.get("requests"));
    let limits = resources.and_then(|resources| resources.get("limits"));
    if let Some(cpu) = quantity_field(requests, "cpu") {
        spec.requests_cpu = quantity::parse_cpu(&cpu)?;
    }
    if let Some(memory) = quantity_field(requests, "memory") {
        spec.requests_memory = quantity::parse_memory(&memory)?;
    }
    if let Some(cpu) = quantity_field(limits, "cpu") {
        spec.limits_cpu = quantity::parse_cpu(&cpu)?;
    }
    if let Some(memory) = quantity_field(limits, "memory") {
        spec.limits_memory = quantity::parse_memory(&memory)?;
    }
    Ok(spec)
}

/// Read a quantity that may be written as a YAML string or number.
fn quantity_field(node: Option<&Value>, key: &str) -> Option<String> {
    let value = node.and_then(Value::as_mapping).and_then(|node: &Mapping| node.get(key))?;
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}
