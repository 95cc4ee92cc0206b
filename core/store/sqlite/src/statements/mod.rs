//! SQL statements to implement the [`StoreBackend`] with SQLite.
use anyhow::Result;
use tokio_rusqlite::Connection;

use shipcore_context::Context;
use shipcore_store::delete::DeleteOps;
use shipcore_store::delete::DeleteResponses;
use shipcore_store::persist::PersistOps;
use shipcore_store::persist::PersistResponses;
use shipcore_store::query::QueryOps;
use shipcore_store::query::QueryResponses;
use shipcore_store::StoreBackend;

mod records;
mod release;

use self::records::BUILDS;
use self::records::CLUSTERS;
use self::records::DEPLOYS;
use self::records::DEPLOY_GROUPS;
use self::records::PROJECTS;
use self::records::ROLES;
use self::records::STAGES;
use self::records::USERS;

/// implementation of the [`StoreBackend`] interface using SQLite.
pub struct SQLiteStore {
    /// Connection to the SQLite DB persisting data.
    connection: Connection,
}

impl SQLiteStore {
    /// Initialise a new SQLite backed [`StoreBackend`].
    pub fn new(connection: Connection) -> Self {
        SQLiteStore { connection }
    }
}

#[async_trait::async_trait]
impl StoreBackend for SQLiteStore {
    async fn delete(&self, _: &Context, op: DeleteOps) -> Result<DeleteResponses> {
        let conn = &self.connection;
        match op {
            DeleteOps::Deploy(deploy) => records::delete(conn, &DEPLOYS, deploy.0).await?,
            DeleteOps::User(user) => records::delete(conn, &USERS, user.0).await?,
        };
        Ok(DeleteResponses::Success)
    }

    async fn query(&self, _: &Context, op: QueryOps) -> Result<QueryResponses> {
        let conn = &self.connection;
        let response = match op {
            QueryOps::CountReleases(project_id) => {
                QueryResponses::Count(release::count(conn, project_id).await?)
            }
            QueryOps::ListBuildsBySha(git_sha) => {
                QueryResponses::Builds(records::builds_by_sha(conn, git_sha).await?)
            }
            QueryOps::ListReleaseDocs(release_id) => {
                QueryResponses::ReleaseDocs(release::docs(conn, release_id).await?)
            }
            QueryOps::Deploy(id) => {
                QueryResponses::Deploy(records::lookup(conn, &DEPLOYS, id).await?)
            }
            QueryOps::DeployGroup(id) => {
                QueryResponses::DeployGroup(records::lookup(conn, &DEPLOY_GROUPS, id).await?)
            }
            QueryOps::KubernetesCluster(id) => {
                QueryResponses::KubernetesCluster(records::lookup(conn, &CLUSTERS, id).await?)
            }
            QueryOps::KubernetesRole(id) => {
                QueryResponses::KubernetesRole(records::lookup(conn, &ROLES, id).await?)
            }
            QueryOps::PreviousSuccessfulRelease(query) => {
                QueryResponses::Release(release::previous_successful(conn, query).await?)
            }
            QueryOps::Project(id) => {
                QueryResponses::Project(records::lookup(conn, &PROJECTS, id).await?)
            }
            QueryOps::Release(id) => QueryResponses::Release(release::lookup(conn, id).await?),
            QueryOps::Stage(id) => {
                QueryResponses::Stage(records::lookup(conn, &STAGES, id).await?)
            }
            QueryOps::User(id) => QueryResponses::User(records::lookup(conn, &USERS, id).await?),
        };
        Ok(response)
    }

    async fn persist(&self, context: &Context, op: PersistOps) -> Result<PersistResponses> {
        let conn = &self.connection;
        match op {
            PersistOps::Build(build) => records::persist(conn, &BUILDS, build.id, &build).await?,
            PersistOps::Deploy(deploy) => {
                records::persist(conn, &DEPLOYS, deploy.id, &deploy).await?
            }
            PersistOps::DeployGroup(group) => {
                records::persist(conn, &DEPLOY_GROUPS, group.id, &group).await?
            }
            PersistOps::KubernetesCluster(cluster) => {
                records::persist(conn, &CLUSTERS, cluster.id, &cluster).await?
            }
            PersistOps::KubernetesRole(role) => {
                records::persist(conn, &ROLES, role.id, &role).await?
            }
            PersistOps::Project(project) => {
                records::persist(conn, &PROJECTS, project.id, &project).await?
            }
            PersistOps::Release(release) => {
                let release = release::create(context, conn, release).await?;
                return Ok(PersistResponses::Release(release));
            }
            PersistOps::Stage(stage) => records::persist(conn, &STAGES, stage.id, &stage).await?,
            PersistOps::User(user) => records::persist(conn, &USERS, user.id, &user).await?,
        };
        Ok(PersistResponses::Success)
    }
}

#[cfg(test)]
pub mod tests {
    use shipcore_store::Store;

    use super::SQLiteStore;
    use crate::factory::create_client;

    /// Initialise an [`SQLiteStore`] instance for unit tests.
    pub async fn sqlite_store() -> SQLiteStore {
        let context = shipcore_context::Context::fixture();
        let connection = create_client(&context, crate::factory::MEMORY_PATH)
            .await
            .unwrap();
        crate::factory::migrate(&connection).await.unwrap();
        SQLiteStore { connection }
    }

    /// Same as [`sqlite_store`] but returns a user facing [`Store`] object instead.
    pub async fn store() -> Store {
        let store = sqlite_store().await;
        Store::from(store)
    }
}
