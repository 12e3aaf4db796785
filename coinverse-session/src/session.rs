use coinverse_api::{Envelope, Operation};
use std::sync::Arc;

use crate::protocol::{classify, CallOutcome};
use crate::storage::CredentialStore;
use crate::transport::TransportClient;

/// The one entry point feature code uses to talk to the server.
///
/// Every call runs exactly once: acquire a connection, send, classify. A
/// successful login stores the issued token before the caller sees `Ok`.
/// Authenticated operations carry the token in their own request fields, and
/// clearing the token after logout is the caller's job.
#[derive(Clone)]
pub struct Session {
    transport: Arc<TransportClient>,
    credentials: Arc<CredentialStore>,
}

impl Session {
    pub fn new(transport: Arc<TransportClient>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn perform<O>(&self, operation: O) -> CallOutcome<Envelope<O::Payload>>
    where
        O: Operation,
    {
        let connection = match self.transport.acquire() {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(operation = O::NAME, error = %e, "No usable server address");
                return CallOutcome::NetError(e);
            }
        };

        let outcome = classify(connection.execute(&operation).await);

        match &outcome {
            CallOutcome::Ok(envelope) => {
                if let Some(token) = O::issued_token(&envelope.payload) {
                    self.credentials.save(Some(token));
                    tracing::info!(operation = O::NAME, "Stored new session token");
                }
                tracing::debug!(operation = O::NAME, "Call succeeded");
            }
            CallOutcome::BizError { code, message } => {
                tracing::warn!(operation = O::NAME, code, %message, "Server rejected call");
            }
            CallOutcome::NetError(e) => {
                tracing::warn!(operation = O::NAME, error = %e, "Call failed");
            }
        }

        outcome
    }

    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }
}
