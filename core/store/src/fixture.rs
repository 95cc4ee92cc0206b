//! Inefficient in-memory implementation of [`Store`](super::Store) for unit tests.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Result;

use shipcore_models::Build;
use shipcore_models::Deploy;
use shipcore_models::DeployGroup;
use shipcore_models::KubernetesCluster;
use shipcore_models::KubernetesRole;
use shipcore_models::NewRelease;
use shipcore_models::Project;
use shipcore_models::Release;
use shipcore_models::ReleaseDoc;
use shipcore_models::Stage;
use shipcore_models::User;

use shipcore_context::Context;

use super::DeleteOps;
use super::DeleteResponses;
use super::PersistOps;
use super::PersistResponses;
use super::QueryOps;
use super::QueryResponses;
use super::StoreBackend;
use crate::errors::ReleaseWithoutDocs;
use crate::errors::RoleProjectMismatch;
use crate::query::PreviousSuccessfulRelease;

/// In-memory implementation of a mock [`Store`](super::Store) for unit tests.
#[derive(Clone)]
pub struct StoreFixture {
    /// Shared in-memory state to mock the DB with.
    inner: Arc<Mutex<StoreFixtureState>>,
}

impl StoreFixture {
    /// Lock and access the shared inner store.
    fn access(&self) -> MutexGuard<StoreFixtureState> {
        self.inner
            .lock()
            .expect("StoreFixture::inner state lock poisoned")
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        let inner = StoreFixtureState::default();
        let inner = Mutex::new(inner);
        let inner = Arc::new(inner);
        StoreFixture { inner }
    }
}

#[async_trait::async_trait]
impl StoreBackend for StoreFixture {
    async fn delete(&self, _: &Context, op: DeleteOps) -> Result<DeleteResponses> {
        let mut store = self.access();
        match op {
            DeleteOps::Deploy(deploy) => store.deploys.remove(&deploy.0).map(|_| ()),
            DeleteOps::User(user) => store.users.remove(&user.0).map(|_| ()),
        };
        Ok(DeleteResponses::Success)
    }

    async fn query(&self, _: &Context, op: QueryOps) -> Result<QueryResponses> {
        let store = self.access();
        let response = match op {
            QueryOps::CountReleases(project_id) => {
                let count = store
                    .releases
                    .values()
                    .filter(|release| release.project_id == project_id)
                    .count();
                QueryResponses::Count(count as u64)
            }
            QueryOps::ListBuildsBySha(git_sha) => {
                let builds = store
                    .builds
                    .values()
                    .filter(|build| build.git_sha == git_sha)
                    .cloned()
                    .collect();
                QueryResponses::Builds(builds)
            }
            QueryOps::ListReleaseDocs(release_id) => {
                let docs = store
                    .release_docs
                    .values()
                    .filter(|doc| doc.release_id == release_id)
                    .cloned()
                    .collect();
                QueryResponses::ReleaseDocs(docs)
            }
            QueryOps::Deploy(id) => QueryResponses::Deploy(store.deploys.get(&id).cloned()),
            QueryOps::DeployGroup(id) => {
                QueryResponses::DeployGroup(store.deploy_groups.get(&id).cloned())
            }
            QueryOps::KubernetesCluster(id) => {
                QueryResponses::KubernetesCluster(store.clusters.get(&id).cloned())
            }
            QueryOps::KubernetesRole(id) => {
                QueryResponses::KubernetesRole(store.roles.get(&id).cloned())
            }
            QueryOps::PreviousSuccessfulRelease(query) => {
                QueryResponses::Release(store.previous_successful_release(query))
            }
            QueryOps::Project(id) => QueryResponses::Project(store.projects.get(&id).cloned()),
            QueryOps::Release(id) => QueryResponses::Release(store.releases.get(&id).cloned()),
            QueryOps::Stage(id) => QueryResponses::Stage(store.stages.get(&id).cloned()),
            QueryOps::User(id) => QueryResponses::User(store.users.get(&id).cloned()),
        };
        Ok(response)
    }

    async fn persist(&self, _: &Context, op: PersistOps) -> Result<PersistResponses> {
        let mut store = self.access();
        match op {
            PersistOps::Build(build) => {
                store.builds.insert(build.id, build);
            }
            PersistOps::Deploy(deploy) => {
                store.deploys.insert(deploy.id, deploy);
            }
            PersistOps::DeployGroup(group) => {
                store.deploy_groups.insert(group.id, group);
            }
            PersistOps::KubernetesCluster(cluster) => {
                store.clusters.insert(cluster.id, cluster);
            }
            PersistOps::KubernetesRole(role) => {
                store.roles.insert(role.id, role);
            }
            PersistOps::Project(project) => {
                store.projects.insert(project.id, project);
            }
            PersistOps::Release(release) => {
                let release = store.create_release(release)?;
                return Ok(PersistResponses::Release(release));
            }
            PersistOps::Stage(stage) => {
                store.stages.insert(stage.id, stage);
            }
            PersistOps::User(user) => {
                store.users.insert(user.id, user);
            }
        };
        Ok(PersistResponses::Success)
    }
}

/// Container for the shared state.
#[derive(Default)]
struct StoreFixtureState {
    builds: BTreeMap<i64, Build>,
    clusters: BTreeMap<i64, KubernetesCluster>,
    deploy_groups: BTreeMap<i64, DeployGroup>,
    deploys: BTreeMap<i64, Deploy>,
    projects: BTreeMap<i64, Project>,
    release_docs: BTreeMap<i64, ReleaseDoc>,
    releases: BTreeMap<i64, Release>,
    roles: BTreeMap<i64, KubernetesRole>,
    stages: BTreeMap<i64, Stage>,
    users: BTreeMap<i64, User>,
}

impl StoreFixtureState {
    /// Validate the whole release before inserting any of it.
    fn create_release(&mut self, mut release: NewRelease) -> Result<Release> {
        if release.docs.is_empty() {
            anyhow::bail!(ReleaseWithoutDocs {
                project_id: release.project_id,
            });
        }
        for doc in &release.docs {
            let role_project = self
                .roles
                .get(&doc.kubernetes_role_id)
                .map(|role| role.project_id);
            if role_project != Some(release.project_id) {
                anyhow::bail!(RoleProjectMismatch {
                    project_id: release.project_id,
                    role_id: doc.kubernetes_role_id,
                });
            }
        }

        let release_id = next_id(&self.releases);
        let mut doc_id = next_id(&self.release_docs);
        let docs = std::mem::take(&mut release.docs);
        for doc in docs {
            let doc = doc.into_doc(doc_id, release_id);
            self.release_docs.insert(doc_id, doc);
            doc_id += 1;
        }
        let release = release.into_release(release_id);
        self.releases.insert(release_id, release.clone());
        Ok(release)
    }

    fn previous_successful_release(&self, query: PreviousSuccessfulRelease) -> Option<Release> {
        self.releases
            .values()
            .rev()
            .filter(|release| release.project_id == query.pipeline.project_id)
            .filter(|release| match query.before_release_id {
                Some(before) => release.id < before,
                None => true,
            })
            .find(|release| {
                release
                    .deploy_id
                    .and_then(|id| self.deploys.get(&id))
                    .map(|deploy| {
                        deploy.stage_id == query.pipeline.stage_id
                            && deploy.job_status.is_succeeded()
                    })
                    .unwrap_or(false)
            })
            .cloned()
    }
}

/// Next free ID for a table, mimicking auto-increment keys.
fn next_id<T>(table: &BTreeMap<i64, T>) -> i64 {
    table.keys().next_back().map(|id| id + 1).unwrap_or(1)
}
