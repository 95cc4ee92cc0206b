use serde::Deserialize;
use serde::Serialize;

/// A project owning roles, stages and releases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique ID of the project.
    pub id: i64,

    /// Human readable name of the project.
    pub name: String,

    /// URL safe identifier of the project.
    pub permalink: String,
}
