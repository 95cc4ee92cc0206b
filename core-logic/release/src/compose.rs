//! Validate and atomically create releases.
use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use shipcore_context::Context;
use shipcore_injector::Injector;
use shipcore_models::Deploy;
use shipcore_models::DeployGroup;
use shipcore_models::KubernetesRole;
use shipcore_models::NewRelease;
use shipcore_models::NewReleaseDoc;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::User;

use crate::errors::MissingRoles;
use crate::errors::MissingTargets;
use crate::filler::DocTemplate;
use crate::filler::OverridesFiller;
use crate::filler::TemplateFiller;
use crate::role_config::RepositorySource;
use crate::role_config::RoleSpec;

/// Request to create a new release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateReleaseParams {
    pub project: Project,
    pub user: User,

    /// Deploy the release is created for, if any.
    #[serde(default)]
    pub deploy: Option<Deploy>,

    /// Exact commit to deploy.
    pub git_sha: String,

    /// Branch or tag the commit was requested as.
    pub git_ref: String,

    /// Deploy groups to release into, in order.
    #[serde(default)]
    pub deploy_groups: Option<Vec<DeployGroupEntry>>,
}

/// Roles to release into a deploy group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeployGroupEntry {
    pub deploy_group: DeployGroup,

    /// Roles to deploy, in order.
    #[serde(default)]
    pub roles: Option<Vec<RoleEntry>>,
}

/// A role to release along with overrides to the defaults in its config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub role: KubernetesRole,

    #[serde(default)]
    pub replicas: Option<u32>,
    #[serde(default)]
    pub requests_cpu: Option<f64>,
    #[serde(default)]
    pub requests_memory: Option<u64>,
    #[serde(default)]
    pub limits_cpu: Option<f64>,
    #[serde(default)]
    pub limits_memory: Option<u64>,
}

impl RoleEntry {
    /// Reject overrides that can't be rendered as resource quantities.
    pub fn validate(&self) -> Result<()> {
        for cores in [self.requests_cpu, self.limits_cpu].into_iter().flatten() {
            crate::quantity::check_cores(cores)?;
        }
        Ok(())
    }

    /// Apply the overrides in this entry on top of the given defaults.
    pub fn apply(&self, defaults: RoleSpec) -> RoleSpec {
        RoleSpec {
            replicas: self.replicas.unwrap_or(defaults.replicas),
            requests_cpu: self.requests_cpu.unwrap_or(defaults.requests_cpu),
            requests_memory: self.requests_memory.unwrap_or(defaults.requests_memory),
            limits_cpu: self.limits_cpu.unwrap_or(defaults.limits_cpu),
            limits_memory: self.limits_memory.unwrap_or(defaults.limits_memory),
        }
    }
}

/// Create releases from role configs in the project repository.
#[derive(Clone)]
pub struct ReleaseComposer {
    filler: Arc<dyn TemplateFiller>,
    injector: Injector,
    repository: Arc<dyn RepositorySource>,
}

impl ReleaseComposer {
    /// Compose releases with the default [`OverridesFiller`].
    pub fn new<R>(injector: Injector, repository: R) -> ReleaseComposer
    where
        R: RepositorySource + 'static,
    {
        ReleaseComposer {
            filler: Arc::new(OverridesFiller),
            injector,
            repository: Arc::new(repository),
        }
    }

    /// Replace the [`TemplateFiller`] used to render release documents.
    pub fn with_filler<F>(mut self, filler: F) -> ReleaseComposer
    where
        F: TemplateFiller + 'static,
    {
        self.filler = Arc::new(filler);
        self
    }

    /// Create a release with one document for each role in each deploy group.
    ///
    /// Nothing is persisted unless all role configs resolve and render successfully,
    /// in which case the release and all its documents are persisted together.
    pub async fn create_release(
        &self,
        context: &Context,
        params: CreateReleaseParams,
    ) -> Result<Release> {
        let targets = validate(&params)?;
        let context = context.derive_with(|builder| {
            builder.actor(params.user.id).log_values(slog::o!(
                "project_id" => params.project.id,
                "git_sha" => params.git_sha.clone(),
            ))
        });

        let mut docs = Vec::new();
        for entry in targets {
            let group = &entry.deploy_group;
            for role_entry in entry.roles.iter().flatten() {
                let role = &role_entry.role;
                let config = crate::role_config::resolve(
                    &context,
                    self.repository.as_ref(),
                    role,
                    &params.git_sha,
                    &group.namespace,
                )
                .await?;
                let spec = role_entry.apply(config.defaults);
                let template = DocTemplate {
                    deploy_group: group,
                    role,
                    config: &config,
                    spec,
                };
                let resource_template = self.filler.fill(&template)?;
                docs.push(NewReleaseDoc {
                    deploy_group_id: group.id,
                    kubernetes_role_id: role.id,
                    replica_target: spec.replicas,
                    requests_cpu: spec.requests_cpu,
                    requests_memory: spec.requests_memory,
                    limits_cpu: spec.limits_cpu,
                    limits_memory: spec.limits_memory,
                    resource_template,
                });
            }
        }

        let mut release = NewRelease {
            project_id: params.project.id,
            user_id: params.user.id,
            deploy_id: params.deploy.as_ref().map(|deploy| deploy.id),
            git_sha: params.git_sha.clone(),
            git_ref: params.git_ref.clone(),
            blue_phase: false,
            created_at: OffsetDateTime::now_utc(),
            docs,
        };
        let store = &self.injector.store;
        release.blue_phase = crate::blue_green::resolve_phase(&context, store, &release).await?;

        let doc_count = release.docs.len();
        let release = store.persist(&context, release).await?;
        slog::info!(
            context.logger, "Created release";
            "release_id" => release.id,
            "docs" => doc_count,
            "blue_phase" => release.blue_phase,
        );
        Ok(release)
    }
}

/// Ensure the request targets at least one deploy group and each group has valid roles.
fn validate(params: &CreateReleaseParams) -> Result<&[DeployGroupEntry]> {
    let targets = match params.deploy_groups.as_deref() {
        None | Some([]) => anyhow::bail!(MissingTargets),
        Some(targets) => targets,
    };
    for (index, entry) in targets.iter().enumerate() {
        let empty = entry.roles.as_ref().map(Vec::is_empty).unwrap_or(true);
        if empty {
            anyhow::bail!(MissingRoles::new(index));
        }
    }
    for role in targets.iter().filter_map(|entry| entry.roles.as_ref()).flatten() {
        role.validate()?;
    }
    Ok(targets)
}
