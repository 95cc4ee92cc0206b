//! Deploy pipelines (stages) and the deploys that run through them.
use serde::Deserialize;
use serde::Serialize;

/// A deploy pipeline for a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Unique ID of the stage.
    pub id: i64,

    /// Project the stage deploys.
    pub project_id: i64,

    /// Human readable name of the stage.
    pub name: String,

    /// Deploys through this stage alternate between blue and green slots.
    #[serde(default)]
    pub blue_green: bool,
}

/// A deploy of a project through one of its stages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deploy {
    /// Unique ID of the deploy.
    pub id: i64,

    /// Project being deployed.
    pub project_id: i64,

    /// Stage the deploy runs through.
    pub stage_id: i64,

    /// Branch or tag requested for the deploy.
    pub git_ref: String,

    /// Outcome of the job executing the deploy.
    pub job_status: JobStatus,
}

/// Status of the job executing a deploy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "cancelled")]
    Cancelled,

    #[serde(rename = "errored")]
    Errored,

    #[serde(rename = "failed")]
    Failed,

    #[serde(rename = "pending")]
    Pending,

    #[serde(rename = "running")]
    Running,

    #[serde(rename = "succeeded")]
    Succeeded,
}

impl JobStatus {
    /// The job completed successfully.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }

    /// Value stored in the persistent store for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Errored => "errored",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cancelled" => Ok(Self::Cancelled),
            "errored" => Ok(Self::Errored),
            "failed" => Ok(Self::Failed),
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

/// A job status value is not one of the known statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownJobStatus(pub String);

impl std::fmt::Display for UnknownJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "unknown job status '{}'", self.0)
    }
}

impl std::error::Error for UnknownJobStatus {}

#[cfg(test)]
mod tests {
    use super::JobStatus;

    #[test]
    fn status_parse_matches_display() {
        let status: JobStatus = "succeeded".parse().unwrap();
        assert_eq!(status, JobStatus::Succeeded);
        assert_eq!(JobStatus::Failed.to_string(), "failed");
        assert!("done".parse::<JobStatus>().is_err());
    }

    #[test]
    fn status_serialises_lowercase() {
        let encoded = serde_json::to_string(&JobStatus::Cancelled).unwrap();
        assert_eq!(encoded, r#""cancelled""#);
    }
}
