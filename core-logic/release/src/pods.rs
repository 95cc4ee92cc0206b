//! Aggregate the pods of a release across all of its clusters.
use anyhow::Result;

use shipcore_context::Context;
use shipcore_injector::Injector;
use shipcore_models::Release;
use shipkube_client::Pod;
use shipkube_client::PodQuery;

/// Pods of a release, grouped by the query that found them.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleasePods {
    /// Pods found by each routed query, in routing order.
    pub groups: Vec<(PodQuery, Vec<Pod>)>,

    /// Number of pods across all groups.
    pub total: usize,
}

/// Query all clusters of a release concurrently and collect their pods.
///
/// Results are reported only once all queries completed and any failed query fails the lookup.
pub async fn release_pods(
    context: &Context,
    injector: &Injector,
    release: &Release,
) -> Result<ReleasePods> {
    let entries = crate::router::clients(context, injector, release).await?;
    let queries = entries.iter().map(|(client, query)| async move {
        let pods = client.get_pods(query).await?;
        Ok::<_, anyhow::Error>((query.clone(), pods))
    });
    let groups = futures::future::try_join_all(queries).await?;
    let total = groups.iter().map(|(_, pods)| pods.len()).sum();
    slog::debug!(
        context.logger, "Collected release pods";
        "release_id" => release.id,
        "total" => total,
    );
    Ok(ReleasePods { groups, total })
}
