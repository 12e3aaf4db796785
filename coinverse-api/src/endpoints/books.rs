use super::{BookId, NoPayload, TransactionId, nullable_list, optional_text, optional_time};
use crate::macros::setter;
use crate::{Method, Operation};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// Common

/// An account book as listed for the signed-in user.
///
/// On the wire each book is a single-entry object mapping its id to a
/// `[name, balance]` pair; it is flattened into a record on decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<BookId, (String, f64)>")]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub balance: f64,
}

impl TryFrom<BTreeMap<BookId, (String, f64)>> for Book {
    type Error = String;

    fn try_from(entry: BTreeMap<BookId, (String, f64)>) -> Result<Self, Self::Error> {
        let (id, (name, balance)) = single_entry(entry)?;
        Ok(Self { id, name, balance })
    }
}

/// A transaction in a book detail reply, encoded on the wire as
/// `{"<id>": [category, note, amount]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<TransactionId, (String, Option<String>, f64)>")]
pub struct BookTransaction {
    pub id: TransactionId,
    pub category: String,
    pub note: Option<String>,
    pub amount: f64,
}

impl TryFrom<BTreeMap<TransactionId, (String, Option<String>, f64)>> for BookTransaction {
    type Error = String;

    fn try_from(
        entry: BTreeMap<TransactionId, (String, Option<String>, f64)>,
    ) -> Result<Self, Self::Error> {
        let (id, (category, note, amount)) = single_entry(entry)?;
        Ok(Self {
            id,
            category,
            note,
            amount,
        })
    }
}

fn single_entry<K, V>(entry: BTreeMap<K, V>) -> Result<(K, V), String> {
    let len = entry.len();
    let mut entries = entry.into_iter();
    match (entries.next(), len) {
        (Some(pair), 1) => Ok(pair),
        _ => Err(format!("expected a single id entry, found {len}")),
    }
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct CreateBook {
    token: String,
    book_name: String,
}

impl CreateBook {
    pub fn new(token: impl Into<String>, book_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            book_name: book_name.into(),
        }
    }
}

impl Operation for CreateBook {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "create_book";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/create_book".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListBooks {
    token: String,
}

impl ListBooks {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Operation for ListBooks {
    const METHOD: Method = Method::Put;
    const NAME: &'static str = "list_books";
    type Payload = BooksPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/list_books".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveBook {
    token: String,
    book_id: BookId,
}

impl RemoveBook {
    pub fn new(token: impl Into<String>, book_id: BookId) -> Self {
        Self {
            token: token.into(),
            book_id,
        }
    }
}

impl Operation for RemoveBook {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "remove_book";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/books/remove_book".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetBookDetail {
    token: String,
    account_book_id: BookId,
    #[serde(serialize_with = "optional_time")]
    start_time: Option<NaiveDateTime>,
    #[serde(serialize_with = "optional_time")]
    end_time: Option<NaiveDateTime>,
    #[serde(serialize_with = "optional_text")]
    note: Option<String>,
}

impl GetBookDetail {
    pub fn new(token: impl Into<String>, account_book_id: BookId) -> Self {
        Self {
            token: token.into(),
            account_book_id,
            start_time: None,
            end_time: None,
            note: None,
        }
    }

    setter!(opt start_time: NaiveDateTime);
    setter!(opt end_time: NaiveDateTime);
    setter!(opt note: String);
}

impl Operation for GetBookDetail {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "book_detail";
    type Payload = BookDetailPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/books_detail".into()
    }
}

// Responses

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BooksPayload {
    #[serde(default, deserialize_with = "nullable_list")]
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookDetailPayload {
    #[serde(default, deserialize_with = "nullable_list")]
    pub transactions: Vec<BookTransaction>,
}
