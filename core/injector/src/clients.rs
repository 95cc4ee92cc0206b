//! Container for various client registries to be injected in other components.
use shipcore_clients_kube::KubeClients;

/// Container for various client registries to be injected in other components.
#[derive(Clone, Default)]
pub struct Clients {
    /// Configured factories for Kubernetes API clients.
    pub kubernetes: KubeClients,
}

impl Clients {
    /// Initialise registries with no factories configured.
    pub fn empty() -> Clients {
        Clients {
            kubernetes: KubeClients::empty(),
        }
    }
}
