//! Compose Kubernetes releases and address the pods they run.
//!
//! A release is an immutable snapshot of which roles of a project, at which commit,
//! run in which deploy groups.
//! This crate implements:
//!
//! - Release composition from role config files ([`ReleaseComposer`]).
//! - Blue/green phase alternation across a stage's deploy history.
//! - Routing of pod queries to the clusters of each deploy group.
//! - Aggregation of pods across all clusters of a release.
mod blue_green;
mod compose;
mod filler;
mod history;
mod links;
mod pods;
mod router;
mod selector;

pub mod errors;
pub mod quantity;
pub mod resources;
pub mod role_config;

#[cfg(test)]
mod tests;

pub use self::blue_green::blue_green_color;
pub use self::blue_green::resolve_phase;
pub use self::blue_green::BlueGreenColor;
pub use self::compose::CreateReleaseParams;
pub use self::compose::DeployGroupEntry;
pub use self::compose::ReleaseComposer;
pub use self::compose::RoleEntry;
pub use self::filler::DocTemplate;
pub use self::filler::OverridesFiller;
pub use self::filler::TemplateFiller;
pub use self::history::previous_successful_release;
pub use self::history::HistoryScope;
pub use self::links::doc_role;
pub use self::links::release_builds;
pub use self::links::release_project;
pub use self::links::release_url;
pub use self::links::release_user;
pub use self::pods::release_pods;
pub use self::pods::ReleasePods;
pub use self::router::clients;
pub use self::selector::pod_selector;
pub use self::selector::PodSelector;
pub use self::selector::DEPLOY_GROUP_ID_LABEL;
pub use self::selector::RELEASE_ID_LABEL;
