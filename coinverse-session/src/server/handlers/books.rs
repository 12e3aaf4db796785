use axum::{extract::State, Json};
use std::collections::BTreeMap;

use super::rejected;
use crate::server::{
    error::LedgerError,
    models::{
        BookDetailRequest, BooksData, CreateBookRequest, DetailData, Empty, RemoveBookRequest,
        Reply, TokenRequest,
    },
    services::{parse_time, EntryFilter},
    AppState,
};

pub async fn create_book(
    State(state): State<AppState>,
    Json(req): Json<CreateBookRequest>,
) -> Json<Reply<Empty>> {
    let reply = match state.ledger.create_book(&req.token, &req.book_name) {
        Ok(book_id) => {
            tracing::info!(book_id, "Book created");
            Reply::ok(Some(0), "Book created successfully", Empty {})
        }
        Err(e) => {
            let code = match e {
                LedgerError::TokenNotFound => 1,
                LedgerError::TokenExpired => 2,
                LedgerError::DuplicateBook => 3,
                LedgerError::MissingField(_) => 4,
                _ => 5,
            };
            rejected("create_book", Some(code), e)
        }
    };

    Json(reply)
}

pub async fn list_books(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<Reply<BooksData>> {
    let reply = match state.ledger.list_books(&req.token) {
        Ok(books) if books.is_empty() => Reply::ok(Some(0), "No books found", BooksData::default()),
        Ok(books) => Reply::ok(
            Some(0),
            "Books found",
            BooksData {
                books: books
                    .into_iter()
                    .map(|book| BTreeMap::from([(book.id, (book.name, book.balance))]))
                    .collect(),
            },
        ),
        Err(e) => {
            let code = match e {
                LedgerError::TokenNotFound => 1,
                LedgerError::TokenExpired => 2,
                _ => 3,
            };
            rejected("list_books", Some(code), e)
        }
    };

    Json(reply)
}

pub async fn remove_book(
    State(state): State<AppState>,
    Json(req): Json<RemoveBookRequest>,
) -> Json<Reply<Empty>> {
    let reply = match state.ledger.remove_book(&req.token, req.book_id) {
        Ok(()) => {
            tracing::info!(book_id = req.book_id, "Book removed");
            Reply::ok(Some(0), "Book removed successfully", Empty {})
        }
        Err(e) => {
            let code = match e {
                LedgerError::TokenNotFound => 1,
                LedgerError::TokenExpired => 2,
                _ => 3,
            };
            rejected("remove_book", Some(code), e)
        }
    };

    Json(reply)
}

pub async fn book_detail(
    State(state): State<AppState>,
    Json(req): Json<BookDetailRequest>,
) -> Json<Reply<DetailData>> {
    let result = detail_filter(&req).and_then(|filter| {
        state
            .ledger
            .transactions(&req.token, req.account_book_id, &filter)
    });

    let reply = match result {
        Ok(entries) => Reply::ok(
            Some(0),
            "Success",
            DetailData {
                transactions: entries
                    .into_iter()
                    .map(|entry| BTreeMap::from([(entry.id, (entry.category, entry.note, entry.amount))]))
                    .collect(),
            },
        ),
        Err(e) => {
            let code = match e {
                LedgerError::InvalidTime(_) => 1,
                LedgerError::TokenNotFound => 2,
                LedgerError::TokenExpired => 3,
                _ => 4,
            };
            rejected("book_detail", Some(code), e)
        }
    };

    Json(reply)
}

fn detail_filter(req: &BookDetailRequest) -> Result<EntryFilter, LedgerError> {
    Ok(EntryFilter {
        start: parse_time(&req.start_time)?,
        end: parse_time(&req.end_time)?,
        note: Some(req.note.clone()).filter(|note| !note.is_empty()),
    })
}
