//! ShipCore persistent store operations to delete records.
//!
//! Releases and their documents are never deleted directly.
//! Records they reference can go away though and readers must cope with that.
use shipcore_models::Deploy;
use shipcore_models::User;

use self::seal::SealDeleteOp;

/// Internal trait to enable delete operations on the persistent store.
pub trait DeleteOp: Into<DeleteOps> + SealDeleteOp {
    /// Type returned by the matching delete operation.
    type Response: From<DeleteResponses>;
}

/// List of all delete operations the persistent store must implement.
pub enum DeleteOps {
    /// Delete a deploy by ID.
    Deploy(DeleteDeploy),

    /// Delete a user by ID.
    User(DeleteUser),
}

/// List of all responses from delete operations.
pub enum DeleteResponses {
    /// The operation completed successfully and does not return data.
    Success,
}

// --- High level delete operations --- //
/// Request deletion of a [`Deploy`] record.
#[derive(Clone, Copy, Debug)]
pub struct DeleteDeploy(pub i64);
impl From<&Deploy> for DeleteDeploy {
    fn from(value: &Deploy) -> Self {
        DeleteDeploy(value.id)
    }
}

/// Request deletion of a [`User`] record.
#[derive(Clone, Copy, Debug)]
pub struct DeleteUser(pub i64);
impl From<&User> for DeleteUser {
    fn from(value: &User) -> Self {
        DeleteUser(value.id)
    }
}

// --- Internal implementation details follow --- //
/// Private module to seal implementation details.
mod seal {
    /// Super-trait to seal the [`DeleteOp`](super::DeleteOp) trait.
    pub trait SealDeleteOp {}
}

// --- Implement DeleteOp and super traits on types for transparent operations --- //
impl DeleteOp for DeleteDeploy {
    type Response = ();
}
impl SealDeleteOp for DeleteDeploy {}
impl From<DeleteDeploy> for DeleteOps {
    fn from(value: DeleteDeploy) -> Self {
        DeleteOps::Deploy(value)
    }
}

impl DeleteOp for &Deploy {
    type Response = ();
}
impl SealDeleteOp for &Deploy {}
impl From<&Deploy> for DeleteOps {
    fn from(value: &Deploy) -> Self {
        DeleteOps::Deploy(value.into())
    }
}

impl DeleteOp for DeleteUser {
    type Response = ();
}
impl SealDeleteOp for DeleteUser {}
impl From<DeleteUser> for DeleteOps {
    fn from(value: DeleteUser) -> Self {
        DeleteOps::User(value)
    }
}

impl DeleteOp for &User {
    type Response = ();
}
impl SealDeleteOp for &User {}
impl From<&User> for DeleteOps {
    fn from(value: &User) -> Self {
        DeleteOps::User(value.into())
    }
}

// --- Implement DeleteResponses conversions on return types for transparent operations --- //
impl From<DeleteResponses> for () {
    fn from(value: DeleteResponses) -> Self {
        match value {
            DeleteResponses::Success => (),
        }
    }
}
