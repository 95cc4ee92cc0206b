//! Lookup releases in the deploy history of a pipeline.
use anyhow::Result;

use shipcore_context::Context;
use shipcore_models::NewRelease;
use shipcore_models::Release;
use shipcore_store::ids::PipelineID;
use shipcore_store::query::LookupDeploy;
use shipcore_store::query::PreviousSuccessfulRelease;
use shipcore_store::Store;

/// Identify the position of a (possibly not yet persisted) release in deploy history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryScope {
    /// Project the release belongs to.
    pub project_id: i64,

    /// Deploy the release is for, if any.
    pub deploy_id: Option<i64>,

    /// ID of the release itself, once persisted.
    pub release_id: Option<i64>,
}

impl From<&Release> for HistoryScope {
    fn from(value: &Release) -> Self {
        HistoryScope {
            project_id: value.project_id,
            deploy_id: value.deploy_id,
            release_id: Some(value.id),
        }
    }
}

impl From<&NewRelease> for HistoryScope {
    fn from(value: &NewRelease) -> Self {
        HistoryScope {
            project_id: value.project_id,
            deploy_id: value.deploy_id,
            release_id: None,
        }
    }
}

/// Find the most recent release before the given one successfully deployed to the same stage.
///
/// Returns `None` when the release has no deploy or its deploy no longer exists.
pub async fn previous_successful_release<S>(
    context: &Context,
    store: &Store,
    scope: S,
) -> Result<Option<Release>>
where
    S: Into<HistoryScope>,
{
    let scope = scope.into();
    let deploy_id = match scope.deploy_id {
        Some(deploy_id) => deploy_id,
        None => return Ok(None),
    };
    let deploy = match store.query(context, LookupDeploy(deploy_id)).await? {
        Some(deploy) => deploy,
        None => return Ok(None),
    };
    let query = PreviousSuccessfulRelease {
        pipeline: PipelineID {
            project_id: scope.project_id,
            stage_id: deploy.stage_id,
        },
        before_release_id: scope.release_id,
    };
    store.query(context, query).await
}
