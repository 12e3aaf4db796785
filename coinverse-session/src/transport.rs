use arc_swap::ArcSwapOption;
use coinverse_api::{Envelope, Method, Operation};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::SessionError;
use crate::protocol::NetError;
use crate::settings::Settings;
use crate::storage::EndpointStore;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl From<&Settings> for Timeouts {
    fn from(settings: &Settings) -> Self {
        Self {
            connect: settings.connect_timeout(),
            read: settings.read_timeout(),
        }
    }
}

/// An HTTP client bound to one normalized server address.
#[derive(Debug)]
pub struct Connection {
    address: String,
    base_url: Url,
    http: Client,
}

impl Connection {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn execute<O>(&self, operation: &O) -> Result<Envelope<O::Payload>, NetError>
    where
        O: Operation,
    {
        let url = self
            .base_url
            .join(&operation.endpoint())
            .map_err(|source| NetError::InvalidAddress {
                address: self.address.clone(),
                source,
            })?;
        let body = serde_json::to_vec(operation).map_err(NetError::Encode)?;

        tracing::debug!(operation = O::NAME, method = ?O::METHOD, %url, "--> request");
        tracing::trace!(operation = O::NAME, body = %String::from_utf8_lossy(&body), "--> body");

        let request = match O::METHOD {
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
        };
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(operation = O::NAME, status = status.as_u16(), len = bytes.len(), "<-- response");
        tracing::trace!(operation = O::NAME, body = %String::from_utf8_lossy(&bytes), "<-- body");

        if !status.is_success() {
            return Err(NetError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Envelope::from_slice(&bytes).map_err(NetError::Decode)
    }
}

/// Hands out a [`Connection`] for whatever address the endpoint store holds
/// right now, rebuilding only when that address changed.
pub struct TransportClient {
    endpoints: Arc<EndpointStore>,
    http: Client,
    cached: ArcSwapOption<Connection>,
    rebuilds: AtomicU64,
}

impl TransportClient {
    pub fn new(endpoints: Arc<EndpointStore>, timeouts: Timeouts) -> Result<Self, SessionError> {
        let http = Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()?;

        Ok(Self {
            endpoints,
            http,
            cached: ArcSwapOption::empty(),
            rebuilds: AtomicU64::new(0),
        })
    }

    pub fn acquire(&self) -> Result<Arc<Connection>, NetError> {
        let address = normalize_address(&self.endpoints.get_address());

        if let Some(connection) = self.cached.load_full() {
            if connection.address == address {
                return Ok(connection);
            }
        }

        let base_url = Url::parse(&address).map_err(|source| NetError::InvalidAddress {
            address: address.clone(),
            source,
        })?;
        let connection = Arc::new(Connection {
            address,
            base_url,
            http: self.http.clone(),
        });

        // Racing callers may each build one; whichever lands last stays cached.
        self.cached.store(Some(Arc::clone(&connection)));
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(address = %connection.address, "Built connection");

        Ok(connection)
    }

    /// Number of connections built so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }
}

/// Strip trailing slashes and append exactly one.
pub fn normalize_address(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn transport(default: &str) -> (Arc<EndpointStore>, TransportClient) {
        let endpoints = Arc::new(EndpointStore::new(Arc::new(MemoryStore::new()), default));
        let transport = TransportClient::new(endpoints.clone(), Timeouts::default()).unwrap();
        (endpoints, transport)
    }

    #[test]
    fn normalize_appends_exactly_one_slash() {
        assert_eq!(normalize_address("http://h:1919"), "http://h:1919/");
        assert_eq!(normalize_address("http://h:1919/"), "http://h:1919/");
        assert_eq!(normalize_address("http://h:1919///"), "http://h:1919/");
        assert_eq!(normalize_address(" http://h/api/ "), "http://h/api/");
    }

    #[test]
    fn unchanged_address_reuses_the_connection() {
        let (_, transport) = transport("http://127.0.0.1:8000");
        let first = transport.acquire().unwrap();
        let second = transport.acquire().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.rebuild_count(), 1);
    }

    #[test]
    fn equivalent_spellings_share_a_connection() {
        let (endpoints, transport) = transport("http://127.0.0.1:8000");
        let first = transport.acquire().unwrap();
        endpoints.set_address("http://127.0.0.1:8000//");
        let second = transport.acquire().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_address_rebuilds_once() {
        let (endpoints, transport) = transport("http://127.0.0.1:8000");
        let first = transport.acquire().unwrap();

        endpoints.set_address("http://10.0.0.7:1919");
        let second = transport.acquire().unwrap();
        let third = transport.acquire().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(second.address(), "http://10.0.0.7:1919/");
        assert_eq!(transport.rebuild_count(), 2);
    }

    #[test]
    fn invalid_address_is_a_net_error() {
        let (endpoints, transport) = transport("http://127.0.0.1:8000");
        endpoints.set_address("not a url");
        let err = transport.acquire().unwrap_err();
        assert!(matches!(err, NetError::InvalidAddress { .. }));
    }

    #[test]
    fn concurrent_acquire_never_returns_a_foreign_address() {
        let (endpoints, transport) = transport("http://127.0.0.1:8000");
        let transport = Arc::new(transport);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let endpoints = endpoints.clone();
                let transport = transport.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        if i % 2 == 0 && j % 10 == 0 {
                            endpoints.set_address(&format!("http://10.0.0.{}:8000", j / 10));
                        }
                        let connection = transport.acquire().unwrap();
                        assert!(connection.address().starts_with("http://"));
                        assert!(connection.address().ends_with(":8000/"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let settled = transport.acquire().unwrap();
        assert_eq!(settled.address(), normalize_address(&endpoints.get_address()));
    }
}
