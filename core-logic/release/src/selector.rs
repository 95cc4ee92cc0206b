//! Label selectors identifying the pods of a release in a deploy group.
use std::collections::BTreeMap;

/// Label carrying the ID of the release pods belong to.
pub const RELEASE_ID_LABEL: &str = "release_id";

/// Label carrying the ID of the deploy group pods run in.
pub const DEPLOY_GROUP_ID_LABEL: &str = "deploy_group_id";

/// Selector for all pods of a release in a deploy group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PodSelector {
    pub release_id: i64,
    pub deploy_group_id: i64,
}

impl PodSelector {
    /// Label selector query in the `release_id=<r>,deploy_group_id=<d>` format.
    ///
    /// The order of labels is fixed so the query is stable across calls.
    pub fn query(&self) -> String {
        format!(
            "{}={},{}={}",
            RELEASE_ID_LABEL, self.release_id, DEPLOY_GROUP_ID_LABEL, self.deploy_group_id,
        )
    }

    /// Labels attached to the selected pods.
    pub fn labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(RELEASE_ID_LABEL.to_string(), self.release_id.to_string());
        labels.insert(
            DEPLOY_GROUP_ID_LABEL.to_string(),
            self.deploy_group_id.to_string(),
        );
        labels
    }
}

/// Build the selector for pods of a release running in a deploy group.
pub fn pod_selector(release_id: i64, deploy_group_id: i64) -> PodSelector {
    PodSelector {
        release_id,
        deploy_group_id,
    }
}
