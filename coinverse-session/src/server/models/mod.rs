mod requests;

pub use requests::*;

use serde::Serialize;
use std::collections::BTreeMap;

use coinverse_api::endpoints::{BookId, TransactionId};

/// Reply body shared by every endpoint except token refresh: the envelope
/// fields next to whatever the endpoint returns.
#[derive(Debug, Serialize)]
pub struct Reply<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub msg: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Default> Reply<T> {
    pub fn ok(code: Option<i64>, msg: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code,
            msg: msg.into(),
            data,
        }
    }

    pub fn failed(code: Option<i64>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            msg: msg.into(),
            data: T::default(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Empty {}

#[derive(Debug, Default, Serialize)]
pub struct LoginData {
    pub token_type: &'static str,
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
}

/// Each book is a single-entry object `{id: [name, balance]}`.
#[derive(Debug, Default, Serialize)]
pub struct BooksData {
    pub books: Vec<BTreeMap<BookId, (String, f64)>>,
}

/// Each transaction is a single-entry object `{id: [category, note, amount]}`.
#[derive(Debug, Default, Serialize)]
pub struct DetailData {
    pub transactions: Vec<BTreeMap<TransactionId, (String, Option<String>, f64)>>,
}

/// Token refresh keeps its own shape, including the misspelled flag.
#[derive(Debug, Serialize)]
pub struct RefreshReply {
    pub sucess: bool,
    pub expired: bool,
    pub msg: String,
    pub access_token: String,
    pub token_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
