//! Docker image builds produced from a git revision.
use serde::Deserialize;
use serde::Serialize;

/// A container image built for a project at a git revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Unique ID of the build.
    pub id: i64,

    /// Project the build was started for.
    pub project_id: i64,

    /// Exact commit the image was built from.
    pub git_sha: String,

    /// Branch or tag the build was requested for.
    pub git_ref: String,

    /// Digest of the pushed image, once the build completed.
    #[serde(default)]
    pub docker_repo_digest: Option<String>,
}
