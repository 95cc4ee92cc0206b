//! Resolve records linked to a release.
use anyhow::Result;

use shipcore_context::Context;
use shipcore_models::Build;
use shipcore_models::KubernetesRole;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::ReleaseDoc;
use shipcore_models::ReleaseUser;
use shipcore_store::query::ListBuildsBySha;
use shipcore_store::query::LookupKubernetesRole;
use shipcore_store::query::LookupProject;
use shipcore_store::query::LookupUser;
use shipcore_store::Store;

use crate::errors::ProjectNotFound;
use crate::errors::RoleNotFound;

/// URL of the release page in the form `<base>/projects/<permalink>/kubernetes/releases/<id>`.
pub fn release_url(base_url: &str, project: &Project, release: &Release) -> String {
    format!(
        "{}/projects/{}/kubernetes/releases/{}",
        base_url.trim_end_matches('/'),
        project.permalink,
        release.id,
    )
}

/// Builds of the release commit, across all projects.
pub async fn release_builds(
    context: &Context,
    store: &Store,
    release: &Release,
) -> Result<Vec<Build>> {
    let query = ListBuildsBySha(release.git_sha.clone());
    store.query(context, query).await
}

/// Project the release belongs to.
pub async fn release_project(
    context: &Context,
    store: &Store,
    release: &Release,
) -> Result<Project> {
    match store.query(context, LookupProject(release.project_id)).await? {
        Some(project) => Ok(project),
        None => anyhow::bail!(ProjectNotFound {
            project_id: release.project_id
        }),
    }
}

/// User that created the release, or a placeholder if they no longer exist.
pub async fn release_user(
    context: &Context,
    store: &Store,
    release: &Release,
) -> Result<ReleaseUser> {
    let user = store.query(context, LookupUser(release.user_id)).await?;
    Ok(ReleaseUser::resolve(release.user_id, user))
}

/// Role a release document deploys.
pub async fn doc_role(context: &Context, store: &Store, doc: &ReleaseDoc) -> Result<KubernetesRole> {
    let role_id = doc.kubernetes_role_id;
    match store.query(context, LookupKubernetesRole(role_id)).await? {
        Some(role) => Ok(role),
        None => anyhow::bail!(RoleNotFound { role_id }),
    }
}
