//! Users and the lookup-only references releases hold to them.
use serde::Deserialize;
use serde::Serialize;

/// Display name used for users that no longer exist.
const UNKNOWN_USER_NAME: &str = "Unknown user";

/// A user of the system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique ID of the user.
    pub id: i64,

    /// Display name of the user.
    pub name: String,

    /// Contact email for the user.
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of resolving the user that created a release.
///
/// Users can be deleted while releases they created live on.
/// Lookups of missing users resolve to [`ReleaseUser::Unknown`] so historical
/// releases can still be displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseUser {
    /// The user still exists.
    Known(User),

    /// The user with the given ID no longer exists.
    Unknown { id: i64 },
}

impl ReleaseUser {
    /// Wrap the result of a user lookup.
    pub fn resolve(id: i64, user: Option<User>) -> ReleaseUser {
        match user {
            Some(user) => ReleaseUser::Known(user),
            None => ReleaseUser::Unknown { id },
        }
    }

    /// ID of the referenced user.
    pub fn id(&self) -> i64 {
        match self {
            Self::Known(user) => user.id,
            Self::Unknown { id } => *id,
        }
    }

    /// Display name of the user.
    pub fn name(&self) -> &str {
        match self {
            Self::Known(user) => &user.name,
            Self::Unknown { .. } => UNKNOWN_USER_NAME,
        }
    }

    /// Contact email for the user, if known.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Known(user) => user.email.as_deref(),
            Self::Unknown { .. } => None,
        }
    }

    /// True if the referenced user was found.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}
