//! Dependency injection to enable easy access to Process Global resources.
use std::sync::RwLock;

use anyhow::Result;
use once_cell::sync::Lazy;

use shipcore_conf::Conf;
use shipcore_context::Context;
use shipcore_store::Store;
use shipcore_store::StoreFactoryArgs;
use shipcore_store::StoreFactorySyncArgs;

mod backends;
mod clients;

pub use self::backends::Backends;
pub use self::backends::StoreBackendNotFound;
pub use self::clients::Clients;

/// Singleton instance of the Process Globals container.
static GLOBAL_INJECTOR: Lazy<RwLock<Option<Injector>>> = Lazy::new(|| RwLock::new(None));

/// Container for all process global dependencies to be injected in other components.
#[derive(Clone)]
pub struct Injector {
    /// Registries of clients to interact with external systems.
    pub clients: Clients,

    /// Process global configuration.
    pub conf: Conf,

    /// Root context for operations performed by the process.
    pub context: Context,

    /// Interface to the persistent store.
    pub store: Store,
}

impl Injector {
    /// Initialise all process dependencies from configuration.
    ///
    /// The persistent store schema is synchronised before the store is returned.
    pub async fn initialise(
        context: &Context,
        conf: Conf,
        backends: &Backends,
        clients: Clients,
        registry: &prometheus::Registry,
    ) -> Result<Injector> {
        let factory = backends.store(&conf.store.backend)?;
        factory.conf_check(context, &conf.store.options)?;
        factory.register_metrics(registry)?;
        factory
            .sync(StoreFactorySyncArgs {
                conf: &conf.store.options,
                context,
            })
            .await?;
        let store = factory
            .store(StoreFactoryArgs {
                conf: &conf.store.options,
                context,
            })
            .await?;
        slog::debug!(
            context.logger, "Process dependencies initialised";
            "store" => &conf.store.backend,
        );
        let injector = Injector {
            clients,
            conf,
            context: context.clone(),
            store,
        };
        Ok(injector)
    }

    /// Get the globally set [`Injector`] instance.
    ///
    /// # Panics
    ///
    /// Panics if no [`Injector`] was set during process initialisation.
    pub fn global() -> Injector {
        GLOBAL_INJECTOR
            .read()
            .expect("GLOBAL_INJECTOR RwLock poisoned")
            .as_ref()
            .expect("global injector is not initialised")
            .clone()
    }

    /// Set the [`Injector`] instance for the process to fetch with [`Injector::global`].
    ///
    /// # Panics
    ///
    /// Panics if an [`Injector`] has already been set.
    pub fn set_global(injector: Injector) {
        // Obtain a lock to initialise the global injector.
        let mut global_injector = GLOBAL_INJECTOR
            .write()
            .expect("GLOBAL_INJECTOR RwLock poisoned");

        // If the global injector is already initialised panic (without poisoning the lock).
        if global_injector.is_some() {
            drop(global_injector);
            panic!("global injector already initialised");
        }

        slog::trace!(
            injector.context.logger,
            "Initialising Global Injector for the process"
        );
        *global_injector = Some(injector);
    }
}

#[cfg(any(test, feature = "test-fixture"))]
impl Injector {
    /// [`Injector`] instance to be used with unit tests.
    pub fn fixture() -> Injector {
        let conf = Conf {
            base_url: "https://ship.example.com".into(),
            store: shipcore_conf::BackendConf {
                backend: "fixture".into(),
                options: Default::default(),
            },
        };
        Injector {
            clients: Clients::empty(),
            conf,
            context: Context::fixture(),
            store: Store::fixture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use shipcore_conf::BackendConf;
    use shipcore_conf::Conf;
    use shipcore_context::Context;
    use shipcore_store::query::CountReleases;

    use super::Backends;
    use super::Clients;
    use super::Injector;

    #[tokio::test]
    async fn initialise_sqlite_store() {
        let context = Context::fixture();
        let conf = Conf {
            base_url: "https://ship.example.com".into(),
            store: BackendConf {
                backend: "sqlite".into(),
                options: serde_json::json!({"path": ":memory:"}),
            },
        };
        let backends = Backends::with_defaults();
        let registry = prometheus::Registry::new();
        let injector = Injector::initialise(&context, conf, &backends, Clients::empty(), &registry)
            .await
            .unwrap();
        let count = injector
            .store
            .query(&context, CountReleases(1))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
