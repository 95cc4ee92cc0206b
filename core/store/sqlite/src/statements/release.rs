//! Persistent store operations on Releases and their documents.
use anyhow::Result;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio_rusqlite::Connection;

use shipcore_context::Context;
use shipcore_models::NewRelease;
use shipcore_models::Release;
use shipcore_models::ReleaseDoc;
use shipcore_store::errors::ReleaseWithoutDocs;
use shipcore_store::errors::RoleProjectMismatch;
use shipcore_store::query::PreviousSuccessfulRelease;

const COUNT_SQL: &str = r#"
SELECT COUNT(*) AS releases
FROM store_releases
WHERE project_id = ?1;
"#;

const INSERT_DOC_SQL: &str = r#"
INSERT INTO store_release_docs (
    release_id,
    deploy_group_id,
    kubernetes_role_id,
    replica_target,
    requests_cpu,
    requests_memory,
    limits_cpu,
    limits_memory,
    resource_template
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);
"#;

const INSERT_RELEASE_SQL: &str = r#"
INSERT INTO store_releases (
    project_id,
    user_id,
    deploy_id,
    git_sha,
    git_ref,
    blue_phase,
    created_at
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);
"#;

const LIST_DOCS_SQL: &str = r#"
SELECT
    id,
    release_id,
    deploy_group_id,
    kubernetes_role_id,
    replica_target,
    requests_cpu,
    requests_memory,
    limits_cpu,
    limits_memory,
    resource_template
FROM store_release_docs
WHERE release_id = ?1
ORDER BY id ASC;
"#;

const LOOKUP_SQL: &str = r#"
SELECT id, project_id, user_id, deploy_id, git_sha, git_ref, blue_phase, created_at
FROM store_releases
WHERE id = ?1;
"#;

const PREVIOUS_SUCCESSFUL_SQL: &str = r#"
SELECT
    r.id AS id,
    r.project_id AS project_id,
    r.user_id AS user_id,
    r.deploy_id AS deploy_id,
    r.git_sha AS git_sha,
    r.git_ref AS git_ref,
    r.blue_phase AS blue_phase,
    r.created_at AS created_at
FROM store_releases AS r
JOIN store_deploys AS d ON d.id = r.deploy_id
WHERE
    r.project_id = ?1
    AND json_extract(d.deploy, '$.stage_id') = ?2
    AND json_extract(d.deploy, '$.job_status') = 'succeeded'
    AND (?3 IS NULL OR r.id < ?3)
ORDER BY r.id DESC
LIMIT 1;
"#;

const ROLE_PROJECT_SQL: &str = r#"
SELECT json_extract(role, '$.project_id')
FROM store_kubernetes_roles
WHERE id = ?1;
"#;

/// Raw release columns, decoded outside of the DB thread.
struct ReleaseRow {
    id: i64,
    project_id: i64,
    user_id: i64,
    deploy_id: Option<i64>,
    git_sha: String,
    git_ref: String,
    blue_phase: bool,
    created_at: String,
}

impl ReleaseRow {
    fn from_row(row: &Row) -> rusqlite::Result<ReleaseRow> {
        Ok(ReleaseRow {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            user_id: row.get("user_id")?,
            deploy_id: row.get("deploy_id")?,
            git_sha: row.get("git_sha")?,
            git_ref: row.get("git_ref")?,
            blue_phase: row.get("blue_phase")?,
            created_at: row.get("created_at")?,
        })
    }

    fn decode(self) -> Result<Release> {
        let created_at = OffsetDateTime::parse(&self.created_at, &Rfc3339)?;
        Ok(Release {
            id: self.id,
            project_id: self.project_id,
            user_id: self.user_id,
            deploy_id: self.deploy_id,
            git_sha: self.git_sha,
            git_ref: self.git_ref,
            blue_phase: self.blue_phase,
            created_at,
        })
    }
}

/// Raw release document columns, decoded outside of the DB thread.
struct DocRow {
    id: i64,
    release_id: i64,
    deploy_group_id: i64,
    kubernetes_role_id: i64,
    replica_target: i64,
    requests_cpu: f64,
    requests_memory: i64,
    limits_cpu: f64,
    limits_memory: i64,
    resource_template: String,
}

impl DocRow {
    fn from_row(row: &Row) -> rusqlite::Result<DocRow> {
        Ok(DocRow {
            id: row.get("id")?,
            release_id: row.get("release_id")?,
            deploy_group_id: row.get("deploy_group_id")?,
            kubernetes_role_id: row.get("kubernetes_role_id")?,
            replica_target: row.get("replica_target")?,
            requests_cpu: row.get("requests_cpu")?,
            requests_memory: row.get("requests_memory")?,
            limits_cpu: row.get("limits_cpu")?,
            limits_memory: row.get("limits_memory")?,
            resource_template: row.get("resource_template")?,
        })
    }

    fn decode(self) -> Result<ReleaseDoc> {
        Ok(ReleaseDoc {
            id: self.id,
            release_id: self.release_id,
            deploy_group_id: self.deploy_group_id,
            kubernetes_role_id: self.kubernetes_role_id,
            replica_target: u32::try_from(self.replica_target)?,
            requests_cpu: self.requests_cpu,
            requests_memory: u64::try_from(self.requests_memory)?,
            limits_cpu: self.limits_cpu,
            limits_memory: u64::try_from(self.limits_memory)?,
            resource_template: self.resource_template,
        })
    }
}

/// Memory columns of a document, checked to fit the DB integer type.
struct DocMemory {
    requests: i64,
    limits: i64,
}

/// Result of the release insert transaction.
enum CreateOutcome {
    Created { release_id: i64, doc_ids: Vec<i64> },
    RoleProjectMismatch(i64),
}

/// Count the releases of a project.
pub async fn count(connection: &Connection, project_id: i64) -> Result<u64> {
    let call = connection.call(move |connection| {
        let count: i64 = connection.query_row(COUNT_SQL, [project_id], |row| row.get(0))?;
        Ok(count)
    });
    let count = crate::telemetry::observe("release.count", call).await?;
    Ok(u64::try_from(count)?)
}

/// Insert a release and all of its documents in a single transaction.
pub async fn create(
    context: &Context,
    connection: &Connection,
    release: NewRelease,
) -> Result<Release> {
    if release.docs.is_empty() {
        anyhow::bail!(ReleaseWithoutDocs {
            project_id: release.project_id,
        });
    }
    let created_at = release.created_at.format(&Rfc3339)?;
    let memory = release
        .docs
        .iter()
        .map(|doc| -> Result<DocMemory> {
            Ok(DocMemory {
                requests: i64::try_from(doc.requests_memory)?,
                limits: i64::try_from(doc.limits_memory)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let record = release.clone();
    let call = connection.call(move |connection| {
        // The transaction rolls back when dropped without commit.
        let tx = connection.transaction()?;
        for doc in &record.docs {
            let project_id: Option<i64> = tx
                .query_row(ROLE_PROJECT_SQL, [doc.kubernetes_role_id], |row| row.get(0))
                .optional()?;
            if project_id != Some(record.project_id) {
                return Ok(CreateOutcome::RoleProjectMismatch(doc.kubernetes_role_id));
            }
        }

        tx.execute(
            INSERT_RELEASE_SQL,
            rusqlite::params![
                record.project_id,
                record.user_id,
                record.deploy_id,
                record.git_sha,
                record.git_ref,
                record.blue_phase,
                created_at,
            ],
        )?;
        let release_id = tx.last_insert_rowid();

        let mut doc_ids = Vec::with_capacity(record.docs.len());
        {
            let mut statement = tx.prepare_cached(INSERT_DOC_SQL)?;
            for (doc, memory) in record.docs.iter().zip(&memory) {
                statement.execute(rusqlite::params![
                    release_id,
                    doc.deploy_group_id,
                    doc.kubernetes_role_id,
                    i64::from(doc.replica_target),
                    doc.requests_cpu,
                    memory.requests,
                    doc.limits_cpu,
                    memory.limits,
                    doc.resource_template,
                ])?;
                doc_ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        Ok(CreateOutcome::Created {
            release_id,
            doc_ids,
        })
    });

    match crate::telemetry::observe("release.create", call).await? {
        CreateOutcome::RoleProjectMismatch(role_id) => anyhow::bail!(RoleProjectMismatch {
            project_id: release.project_id,
            role_id,
        }),
        CreateOutcome::Created {
            release_id,
            doc_ids,
        } => {
            slog::debug!(
                context.logger,
                "Release persisted with {} documents", doc_ids.len();
                "release_id" => release_id
            );
            Ok(release.into_release(release_id))
        }
    }
}

/// List the documents of a release, in creation order.
pub async fn docs(connection: &Connection, release_id: i64) -> Result<Vec<ReleaseDoc>> {
    let call = connection.call(move |connection| {
        let mut statement = connection.prepare_cached(LIST_DOCS_SQL)?;
        let mut rows = statement.query([release_id])?;

        let mut docs = Vec::new();
        while let Some(row) = rows.next()? {
            docs.push(DocRow::from_row(row)?);
        }
        Ok(docs)
    });
    let docs = crate::telemetry::observe("release.docs", call).await?;
    docs.into_iter().map(DocRow::decode).collect()
}

/// Lookup a release by ID.
pub async fn lookup(connection: &Connection, id: i64) -> Result<Option<Release>> {
    let call = connection.call(move |connection| {
        let row = connection
            .query_row(LOOKUP_SQL, [id], ReleaseRow::from_row)
            .optional()?;
        Ok(row)
    });
    let row = crate::telemetry::observe("release.lookup", call).await?;
    row.map(ReleaseRow::decode).transpose()
}

/// Find the most recent release of a pipeline with a succeeded deploy.
pub async fn previous_successful(
    connection: &Connection,
    query: PreviousSuccessfulRelease,
) -> Result<Option<Release>> {
    let call = connection.call(move |connection| {
        let row = connection
            .query_row(
                PREVIOUS_SUCCESSFUL_SQL,
                rusqlite::params![
                    query.pipeline.project_id,
                    query.pipeline.stage_id,
                    query.before_release_id,
                ],
                ReleaseRow::from_row,
            )
            .optional()?;
        Ok(row)
    });
    let row = crate::telemetry::observe("release.previousSuccessful", call).await?;
    row.map(ReleaseRow::decode).transpose()
}
