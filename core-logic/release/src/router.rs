//! Route live cluster queries for the pods of a release.
use anyhow::Context as AnyContext;
use anyhow::Result;

use shipcore_context::Context;
use shipcore_injector::Injector;
use shipcore_models::Release;
use shipcore_models::ReleaseDoc;
use shipcore_store::query::ListReleaseDocs;
use shipcore_store::query::LookupDeployGroup;
use shipcore_store::query::LookupKubernetesCluster;
use shipkube_client::Client;
use shipkube_client::PodQuery;

use crate::errors::ClusterNotFound;
use crate::errors::DeployGroupNotFound;
use crate::errors::ReleaseDocInvalid;

/// Clients and pod queries to inspect a release in each of its deploy groups.
///
/// One entry is returned for each deploy group of the release, in document order.
/// Releases with no documents have no entries.
///
/// Resources that do not refresh pod labels on patch (see [`ResourceKind::patch_replace`])
/// are queried by the previous successful release instead.
/// When a deploy group mixes such resources with others, the first document with a
/// patch-replaced primary resource decides the namespace and selector of the group.
/// Otherwise the first document of the group does.
///
/// [`ResourceKind::patch_replace`]: crate::resources::ResourceKind::patch_replace
pub async fn clients(
    context: &Context,
    injector: &Injector,
    release: &Release,
) -> Result<Vec<(Client, PodQuery)>> {
    let store = &injector.store;
    let docs = store.query(context, ListReleaseDocs::from(release)).await?;
    let mut groups: Vec<(i64, Vec<&ReleaseDoc>)> = Vec::new();
    for doc in &docs {
        match groups
            .iter_mut()
            .find(|(group_id, _)| *group_id == doc.deploy_group_id)
        {
            Some((_, group_docs)) => group_docs.push(doc),
            None => groups.push((doc.deploy_group_id, vec![doc])),
        }
    }

    // Looked up at most once, and only if needed.
    let mut previous: Option<Option<Release>> = None;
    let mut entries = Vec::with_capacity(groups.len());
    for (group_id, group_docs) in groups {
        let group = match store.query(context, LookupDeployGroup(group_id)).await? {
            Some(group) => group,
            None => anyhow::bail!(DeployGroupNotFound {
                deploy_group_id: group_id
            }),
        };
        let cluster = match store
            .query(context, LookupKubernetesCluster(group.cluster_id))
            .await?
        {
            Some(cluster) => cluster,
            None => anyhow::bail!(ClusterNotFound {
                cluster_id: group.cluster_id
            }),
        };
        let client = injector.clients.kubernetes.factory(context, &cluster).await?;

        let mut target: Option<Target> = None;
        for doc in group_docs {
            let resources =
                crate::resources::parse_resources(&doc.resource_template, &group.namespace)
                    .with_context(|| ReleaseDocInvalid { doc_id: doc.id })?;
            let primary = crate::resources::primary(&resources);
            let candidate = Target {
                namespace: primary
                    .map(|resource| resource.namespace.clone())
                    .unwrap_or_else(|| group.namespace.clone()),
                patch_replace: primary
                    .map(|resource| resource.kind.patch_replace())
                    .unwrap_or(false),
            };
            if candidate.patch_replace {
                target = Some(candidate);
                break;
            }
            target.get_or_insert(candidate);
        }
        let target = target.unwrap_or_else(|| Target {
            namespace: group.namespace.clone(),
            patch_replace: false,
        });

        let mut release_id = release.id;
        if target.patch_replace {
            if previous.is_none() {
                let found =
                    crate::history::previous_successful_release(context, store, release).await?;
                previous = Some(found);
            }
            if let Some(Some(previous)) = &previous {
                release_id = previous.id;
            }
        }

        let selector = crate::selector::pod_selector(release_id, group.id);
        slog::trace!(
            context.logger, "Routing pod queries for deploy group";
            "release_id" => release.id,
            "deploy_group_id" => group.id,
            "selector" => selector.query(),
        );
        let query = PodQuery {
            namespace: target.namespace,
            label_selector: selector.query(),
        };
        entries.push((client, query));
    }
    Ok(entries)
}

/// Namespace and selection mode decided for a deploy group.
struct Target {
    namespace: String,
    patch_replace: bool,
}
