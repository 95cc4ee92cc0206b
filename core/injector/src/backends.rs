//! Dependency backends configuration and initialisation logic.
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use shipcore_store::StoreFactory;

/// Persistent Store backend not recognised.
#[derive(Debug, thiserror::Error)]
#[error("persistent store backend '{0}' not recognised")]
pub struct StoreBackendNotFound(pub String);

/// Registers of backend factories for implementations supported by the process/build.
#[derive(Clone, Default)]
pub struct Backends {
    /// Supported Persistent Store backends.
    stores: HashMap<String, Arc<dyn StoreFactory>>,
}

impl Backends {
    /// Registry with all backends supported by the build.
    ///
    /// Supported dependencies can be tuned at compile time using crate features.
    pub fn with_defaults() -> Backends {
        #[allow(unused_mut)]
        let mut backends = Backends::default();
        #[cfg(feature = "shipcore-store-sqlite")]
        backends.register_store("sqlite", shipcore_store_sqlite::SQLiteFactory);
        backends
    }

    /// Register a new factory for a Persistent Store implementation.
    ///
    /// # Panics
    ///
    /// This method panics if the identifier of the new Persistent Store backend is already in use.
    pub fn register_store<B, S>(&mut self, id: S, backend: B) -> &mut Self
    where
        B: StoreFactory + 'static,
        S: Into<String>,
    {
        match self.stores.entry(id.into()) {
            Entry::Occupied(entry) => {
                panic!(
                    "a StoreBackend with id '{}' is already registered",
                    entry.key()
                )
            }
            Entry::Vacant(entry) => entry.insert(Arc::new(backend)),
        };
        self
    }

    /// Lookup a [`StoreFactory`] by ID.
    pub fn store(&self, id: &str) -> Result<&dyn StoreFactory> {
        let factory = self
            .stores
            .get(id)
            .ok_or_else(|| StoreBackendNotFound(id.to_string()))?;
        Ok(factory.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::Backends;
    use super::StoreBackendNotFound;

    #[test]
    fn unknown_store_backend() {
        let backends = Backends::default();
        let error = match backends.store("sqlite") {
            Ok(_) => panic!("store backend should not be registered"),
            Err(error) => error,
        };
        assert!(error.is::<StoreBackendNotFound>());
    }

    #[test]
    fn defaults_include_sqlite() {
        let backends = Backends::with_defaults();
        assert!(backends.store("sqlite").is_ok());
    }
}
