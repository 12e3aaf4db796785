use std::sync::Arc;

use super::{KeyValueStore, Shadowed};

const ADDRESS_KEY: &str = "server_url";

/// Holder of the server base address. The value is kept exactly as given;
/// normalization happens in the transport.
pub struct EndpointStore {
    address: Shadowed,
    default_address: String,
}

impl EndpointStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, default_address: impl Into<String>) -> Self {
        Self {
            address: Shadowed::new(ADDRESS_KEY, backend),
            default_address: default_address.into(),
        }
    }

    pub fn set_address(&self, url: &str) {
        tracing::info!(address = url, "Server address changed");
        self.address.set(Some(url));
    }

    pub fn get_address(&self) -> String {
        self.address
            .get()
            .unwrap_or_else(|| self.default_address.clone())
    }

    /// Forget the configured address and go back to the default.
    pub fn reset(&self) {
        self.address.set(None);
    }

    pub fn is_default(&self) -> bool {
        self.address.get().is_none()
    }
}
