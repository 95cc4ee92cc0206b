//! Alternate releases between the blue and green slots of blue/green stages.
use anyhow::Result;

use shipcore_context::Context;
use shipcore_models::Release;
use shipcore_store::query::LookupDeploy;
use shipcore_store::query::LookupStage;
use shipcore_store::Store;

use crate::errors::DeployNotFound;
use crate::errors::StageNotFound;
use crate::history::HistoryScope;

/// Slot a release deploys into on blue/green stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlueGreenColor {
    Blue,
    Green,
}

impl BlueGreenColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }
}

impl std::fmt::Display for BlueGreenColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check if the deploy of a release runs through a blue/green stage.
async fn uses_blue_green(context: &Context, store: &Store, deploy_id: Option<i64>) -> Result<bool> {
    let deploy_id = match deploy_id {
        Some(deploy_id) => deploy_id,
        None => return Ok(false),
    };
    let deploy = match store.query(context, LookupDeploy(deploy_id)).await? {
        Some(deploy) => deploy,
        None => anyhow::bail!(DeployNotFound { deploy_id }),
    };
    let stage = match store.query(context, LookupStage(deploy.stage_id)).await? {
        Some(stage) => stage,
        None => anyhow::bail!(StageNotFound {
            stage_id: deploy.stage_id
        }),
    };
    Ok(stage.blue_green)
}

/// Determine the blue/green phase of a release.
///
/// - Releases for stages not using blue/green are never in the blue phase.
/// - The first release of a blue/green stage is blue.
/// - Following releases flip the phase of the previous successful release.
///
/// Concurrent releases for the same stage may observe the same history and land on
/// the same phase.
pub async fn resolve_phase<S>(context: &Context, store: &Store, scope: S) -> Result<bool>
where
    S: Into<HistoryScope>,
{
    let scope = scope.into();
    if !uses_blue_green(context, store, scope.deploy_id).await? {
        return Ok(false);
    }
    let previous = crate::history::previous_successful_release(context, store, scope).await?;
    let phase = match previous {
        None => true,
        Some(previous) => !previous.blue_phase,
    };
    Ok(phase)
}

/// Color of the slot a release deploys into, `None` when its stage does not use blue/green.
pub async fn blue_green_color(
    context: &Context,
    store: &Store,
    release: &Release,
) -> Result<Option<BlueGreenColor>> {
    if !uses_blue_green(context, store, release.deploy_id).await? {
        return Ok(None);
    }
    let color = if release.blue_phase {
        BlueGreenColor::Blue
    } else {
        BlueGreenColor::Green
    };
    Ok(Some(color))
}
