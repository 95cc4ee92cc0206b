//! Data object storing ShipCore's configuration.
use serde::Deserialize;
use serde::Serialize;

/// Global configuration for the ShipCore process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conf {
    /// Public URL the application is served from, used to build links to releases.
    #[serde(default = "Conf::default_base_url")]
    pub base_url: String,

    /// Persistent Store service configuration.
    pub store: BackendConf,
}

impl Conf {
    fn default_base_url() -> String {
        "http://localhost:3000".into()
    }
}

/// Unstructured configuration for runtime selected service backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackendConf {
    /// ID of the backend selected to provide the service.
    pub backend: String,

    /// Backend specific configuration options.
    #[serde(default, flatten)]
    pub options: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::Conf;

    #[test]
    fn base_url_defaults() {
        let conf: Conf = serde_yaml::from_str("store:\n  backend: sqlite\n").unwrap();
        assert_eq!(conf.base_url, "http://localhost:3000");
        assert_eq!(conf.store.backend, "sqlite");
    }
}
