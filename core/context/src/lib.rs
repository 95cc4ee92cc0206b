//! The [`Context`] is a general purpose immutable container to carry scoped values around.
//!
//! Code executed as part of ShipCore operations can access operation scoped values.
//!
//! Contexts are organised into a tree structure:
//!
//! - A root context represents the general process wide scope.
//! - Derived contexts represents a narrower scope within their parent with additional
//!   or updated information attached to them.
//!
//! For example: [`Context`]s provide access to the current [`Logger`].
//! For the root context this is the process-wide logger with no additional attributes.
//! While a release is being composed a derived context carries a [`Logger`] decorated
//! with the project and release attributes.
use slog::Logger;
use slog::OwnedKV;
use slog::SendSyncRefUnwindSafeKV;

/// The [`Context`] is a general purpose container to carry scoped values around.
///
/// Refer to the [crate level docs](crate) for details.
#[derive(Clone, Debug)]
pub struct Context {
    /// ID of the user the operation is performed on behalf of, if known.
    pub actor: Option<i64>,

    /// Logger with contextual attributes attached to it.
    pub logger: Logger,
}

impl Context {
    /// Derive a new [`Context`] by making changes to the current one.
    pub fn derive(&self) -> ContextBuilder {
        ContextBuilder {
            actor: self.actor,
            logger: self.logger.clone(),
        }
    }

    /// Derive a new [`Context`] by making changes to the current one using the provided callback.
    pub fn derive_with<F>(&self, callback: F) -> Context
    where
        F: FnOnce(ContextBuilder) -> ContextBuilder,
    {
        let builder = callback(self.derive());
        builder.build()
    }

    /// Initialise a new root context with no values attached.
    pub fn root(logger: Logger) -> ContextBuilder {
        ContextBuilder {
            actor: None,
            logger,
        }
    }
}

/// A builder for root and derived contexts.
pub struct ContextBuilder {
    actor: Option<i64>,
    logger: Logger,
}

impl ContextBuilder {
    /// Record the user the operation is performed for.
    ///
    /// The user ID is also attached to the logger so all events can be traced back to them.
    pub fn actor(mut self, user_id: i64) -> Self {
        self.actor = Some(user_id);
        self.log_values(slog::o!("actor" => user_id))
    }

    /// Finalise the build process and return a new [`Context`].
    pub fn build(self) -> Context {
        Context {
            actor: self.actor,
            logger: self.logger,
        }
    }

    /// Update the [`Context`] logger to attach new log key/pair values.
    pub fn log_values<T>(mut self, entries: OwnedKV<T>) -> Self
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        self.logger = self.logger.new(entries);
        self
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Context {
    /// Create an empty context useful for test.
    pub fn fixture() -> Context {
        let logger = Logger::root(slog::Discard, slog::o!());
        Context {
            actor: None,
            logger,
        }
    }
}
