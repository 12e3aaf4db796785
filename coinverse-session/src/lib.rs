//! Client session layer for the CoinVerse account-book service.
//!
//! [`Session::perform`] is the single way to call the server: it picks up the
//! current server address through the [`TransportClient`], sends one
//! operation and classifies the reply into a [`CallOutcome`]. The
//! [`StartupRouter`] decides at launch whether a stored token exists.

mod error;
mod hashing;
mod protocol;
mod router;
mod services;
mod session;
mod settings;
pub mod storage;
mod transport;

pub use error::SessionError;
pub use hashing::{PasswordHasher, Sha256Hasher};
pub use protocol::{
    classify, classify_body, CallError, CallOutcome, NetError, DEFAULT_BIZ_MESSAGE,
    UNKNOWN_BIZ_CODE,
};
pub use router::{decide, Route, StartupRouter};
pub use services::Services;
pub use session::Session;
pub use settings::{Settings, DEFAULT_SERVER_URL};
pub use storage::{CredentialStore, EndpointStore, FileStore, KeyValueStore, MemoryStore};
pub use transport::{normalize_address, Connection, Timeouts, TransportClient};

// Development server (public for binary and tests)
#[cfg(feature = "server")]
pub mod server;
