pub mod endpoints;
mod envelope;
mod macros;
pub mod repositories;

pub use crate::envelope::Envelope;
use repositories::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Path segment every CoinVerse endpoint is rooted at.
pub const API_PREFIX: &str = "CoinVerse";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

/// One named remote action. The request body is the JSON serialization of
/// the implementing type; the reply is an [`Envelope`] around `Payload`.
pub trait Operation: Serialize {
    const METHOD: Method;
    const NAME: &'static str;

    type Payload: DeserializeOwned + Default;

    /// Path relative to the server base address, without a leading slash.
    fn endpoint(&self) -> Cow<'_, str>;

    /// Session token handed out by a successful reply, if this operation is
    /// the one that establishes a session.
    ///
    /// Returning `None` leaves whatever token is already stored in place: a
    /// successful reply that carries no token does not end the old session.
    fn issued_token(_payload: &Self::Payload) -> Option<&str> {
        None
    }
}

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn books() -> BookRepository {
        BookRepository::new()
    }

    pub fn transactions() -> TransactionRepository {
        TransactionRepository::new()
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
