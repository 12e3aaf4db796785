use std::sync::Arc;

use crate::error::SessionError;
use crate::hashing::{PasswordHasher, Sha256Hasher};
use crate::router::StartupRouter;
use crate::session::Session;
use crate::settings::Settings;
use crate::storage::{CredentialStore, EndpointStore, FileStore, KeyValueStore, MemoryStore};
use crate::transport::{Timeouts, TransportClient};

/// Process-wide session services. Build once at startup and share; nothing
/// here is torn down before the process exits.
pub struct Services {
    pub settings: Settings,
    pub credentials: Arc<CredentialStore>,
    pub endpoints: Arc<EndpointStore>,
    pub transport: Arc<TransportClient>,
    pub session: Session,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl Services {
    /// Services persisted under the configured data directory.
    pub fn from_settings(settings: Settings) -> Result<Self, SessionError> {
        settings.validate().map_err(SessionError::Configuration)?;
        let data_dir = settings.data_dir()?;
        let backend = Arc::new(FileStore::open(&data_dir)?);
        tracing::info!(data_dir = %data_dir.display(), "Session storage opened");
        Self::with_backend(settings, backend)
    }

    /// Services that forget everything when dropped.
    pub fn in_memory(settings: Settings) -> Result<Self, SessionError> {
        Self::with_backend(settings, Arc::new(MemoryStore::new()))
    }

    pub fn with_backend(
        settings: Settings,
        backend: Arc<dyn KeyValueStore>,
    ) -> Result<Self, SessionError> {
        let credentials = Arc::new(CredentialStore::new(backend.clone()));
        let endpoints = Arc::new(EndpointStore::new(backend, settings.server_url.clone()));
        let transport = Arc::new(TransportClient::new(
            endpoints.clone(),
            Timeouts::from(&settings),
        )?);
        let session = Session::new(transport.clone(), credentials.clone());

        Ok(Self {
            settings,
            credentials,
            endpoints,
            transport,
            session,
            hasher: Arc::new(Sha256Hasher),
        })
    }

    pub fn startup_router(&self) -> StartupRouter {
        StartupRouter::spawn(self.credentials.clone(), self.settings.settle_delay())
    }
}
