//! Persistent store operations on records referenced by releases.
//!
//! These records are stored as JSON documents keyed by their ID.
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_rusqlite::Connection;

use shipcore_models::Build;

/// SQL statements to operate on a table of JSON records.
pub struct Table {
    /// Name of the record type, used to label telemetry.
    pub op: &'static str,
    pub delete: &'static str,
    pub lookup: &'static str,
    pub persist: &'static str,
}

pub const BUILDS: Table = Table {
    op: "build",
    delete: "DELETE FROM store_builds WHERE id = ?1;",
    lookup: "SELECT build AS record FROM store_builds WHERE id = ?1;",
    persist: r#"
INSERT INTO store_builds (id, build)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    build=?2
;"#,
};

pub const CLUSTERS: Table = Table {
    op: "kubernetes_cluster",
    delete: "DELETE FROM store_kubernetes_clusters WHERE id = ?1;",
    lookup: "SELECT cluster AS record FROM store_kubernetes_clusters WHERE id = ?1;",
    persist: r#"
INSERT INTO store_kubernetes_clusters (id, cluster)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    cluster=?2
;"#,
};

pub const DEPLOYS: Table = Table {
    op: "deploy",
    delete: "DELETE FROM store_deploys WHERE id = ?1;",
    lookup: "SELECT deploy AS record FROM store_deploys WHERE id = ?1;",
    persist: r#"
INSERT INTO store_deploys (id, deploy)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    deploy=?2
;"#,
};

pub const DEPLOY_GROUPS: Table = Table {
    op: "deploy_group",
    delete: "DELETE FROM store_deploy_groups WHERE id = ?1;",
    lookup: "SELECT deploy_group AS record FROM store_deploy_groups WHERE id = ?1;",
    persist: r#"
INSERT INTO store_deploy_groups (id, deploy_group)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    deploy_group=?2
;"#,
};

pub const PROJECTS: Table = Table {
    op: "project",
    delete: "DELETE FROM store_projects WHERE id = ?1;",
    lookup: "SELECT project AS record FROM store_projects WHERE id = ?1;",
    persist: r#"
INSERT INTO store_projects (id, project)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    project=?2
;"#,
};

pub const ROLES: Table = Table {
    op: "kubernetes_role",
    delete: "DELETE FROM store_kubernetes_roles WHERE id = ?1;",
    lookup: "SELECT role AS record FROM store_kubernetes_roles WHERE id = ?1;",
    persist: r#"
INSERT INTO store_kubernetes_roles (id, role)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    role=?2
;"#,
};

pub const STAGES: Table = Table {
    op: "stage",
    delete: "DELETE FROM store_stages WHERE id = ?1;",
    lookup: "SELECT stage AS record FROM store_stages WHERE id = ?1;",
    persist: r#"
INSERT INTO store_stages (id, stage)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    stage=?2
;"#,
};

pub const USERS: Table = Table {
    op: "user",
    delete: "DELETE FROM store_users WHERE id = ?1;",
    lookup: "SELECT user AS record FROM store_users WHERE id = ?1;",
    persist: r#"
INSERT INTO store_users (id, user)
VALUES (?1, ?2)
ON CONFLICT(id)
DO UPDATE SET
    user=?2
;"#,
};

const BUILDS_BY_SHA_SQL: &str = r#"
SELECT build AS record
FROM store_builds
WHERE json_extract(build, '$.git_sha') = ?1
ORDER BY id ASC;
"#;

/// Delete a record from the store, ignoring missing records.
pub async fn delete(connection: &Connection, table: &Table, id: i64) -> Result<()> {
    let sql = table.delete;
    let op = format!("{}.delete", table.op);
    let call = connection.call(move |connection| {
        connection.execute(sql, [id])?;
        Ok(())
    });
    crate::telemetry::observe(&op, call).await?;
    Ok(())
}

/// Lookup a record from the store, if one is available.
pub async fn lookup<T>(connection: &Connection, table: &Table, id: i64) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let sql = table.lookup;
    let op = format!("{}.lookup", table.op);
    let call = connection.call(move |connection| {
        let mut statement = connection.prepare_cached(sql)?;
        let mut rows = statement.query([id])?;
        let row = match rows.next()? {
            None => None,
            Some(row) => {
                let record: String = row.get("record")?;
                Some(record)
            }
        };
        Ok(row)
    });
    let record = crate::telemetry::observe(&op, call).await?;
    match record {
        None => Ok(None),
        Some(record) => {
            let record = serde_json::from_str(&record)?;
            Ok(Some(record))
        }
    }
}

/// Persist a new or updated record into the store.
pub async fn persist<T>(connection: &Connection, table: &Table, id: i64, record: &T) -> Result<()>
where
    T: Serialize,
{
    let record = serde_json::to_string(record)?;
    let sql = table.persist;
    let op = format!("{}.persist", table.op);
    let call = connection.call(move |connection| {
        connection.execute(sql, rusqlite::params![id, record])?;
        Ok(())
    });
    crate::telemetry::observe(&op, call).await?;
    Ok(())
}

/// List builds of any project for the given commit.
pub async fn builds_by_sha(connection: &Connection, git_sha: String) -> Result<Vec<Build>> {
    let call = connection.call(move |connection| {
        let mut statement = connection.prepare_cached(BUILDS_BY_SHA_SQL)?;
        let mut rows = statement.query([git_sha])?;

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let item: String = row.get("record")?;
            items.push(item);
        }
        Ok(items)
    });
    let items = crate::telemetry::observe("build.listBySha", call).await?;
    items
        .iter()
        .map(|item| serde_json::from_str(item).map_err(anyhow::Error::from))
        .collect()
}
