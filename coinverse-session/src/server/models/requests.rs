use serde::Deserialize;

use coinverse_api::endpoints::BookId;

// POST /CoinVerse/register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub pwd_hash: String,
}

// POST /CoinVerse/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name_or_email: String,
    pub pwd_hash: String,
    #[serde(default)]
    pub maintain_online: bool,
}

// POST /CoinVerse/refresh_token, POST /CoinVerse/logout
#[derive(Debug, Deserialize)]
pub struct OldTokenRequest {
    pub old_token: String,
}

// POST /CoinVerse/users/me, PUT /CoinVerse/list_books
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

// PUT /CoinVerse/users/me/change_password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub name_or_email: String,
    pub old_pwd_hash: String,
    pub new_pwd_hash: String,
}

// POST /CoinVerse/create_book
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub token: String,
    pub book_name: String,
}

// POST /CoinVerse/books/remove_book
#[derive(Debug, Deserialize)]
pub struct RemoveBookRequest {
    pub token: String,
    pub book_id: BookId,
}

// POST /CoinVerse/books_detail
#[derive(Debug, Deserialize)]
pub struct BookDetailRequest {
    pub token: String,
    pub account_book_id: BookId,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub note: String,
}

// POST /CoinVerse/book/transactions/add_income
#[derive(Debug, Deserialize)]
pub struct AddIncomeRequest {
    pub token: String,
    pub account_book_id: BookId,
    pub amount: f64,
    pub income_idx: i64,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub note: String,
}

// POST /CoinVerse/book/transactions/add_outcome
#[derive(Debug, Deserialize)]
pub struct AddOutcomeRequest {
    pub token: String,
    pub account_book_id: BookId,
    pub amount: f64,
    pub outcome_idx: i64,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub note: String,
}
