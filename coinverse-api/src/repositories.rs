use crate::endpoints::{
    BookId,
    auth::{ChangePassword, GetProfile, Login, Logout, RefreshToken, Register},
    books::{CreateBook, GetBookDetail, ListBooks, RemoveBook},
    transactions::{AddIncome, AddOutcome, IncomeCategory, OutcomeCategory},
};

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn register(&self, name: &str, email: &str, pwd_hash: &str) -> Register {
        Register::new(name, email, pwd_hash)
    }

    pub fn login(&self, name_or_email: &str, pwd_hash: &str) -> Login {
        Login::new(name_or_email, pwd_hash)
    }

    pub fn refresh(&self, old_token: &str) -> RefreshToken {
        RefreshToken::new(old_token)
    }

    pub fn logout(&self, old_token: &str) -> Logout {
        Logout::new(old_token)
    }

    pub fn change_password(&self, name_or_email: &str, old_pwd_hash: &str, new_pwd_hash: &str) -> ChangePassword {
        ChangePassword::new(name_or_email, old_pwd_hash, new_pwd_hash)
    }

    pub fn profile(&self, token: &str) -> GetProfile {
        GetProfile::new(token)
    }
}

impl Default for AuthRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct BookRepository {
    token: String,
}

impl BookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub fn create(&self, book_name: &str) -> CreateBook {
        CreateBook::new(self.token.clone(), book_name)
    }

    pub fn list(&self) -> ListBooks {
        ListBooks::new(self.token.clone())
    }

    pub fn remove(&self, book_id: BookId) -> RemoveBook {
        RemoveBook::new(self.token.clone(), book_id)
    }

    pub fn detail(&self, book_id: BookId) -> GetBookDetail {
        GetBookDetail::new(self.token.clone(), book_id)
    }
}

#[derive(Default)]
pub struct TransactionRepository {
    token: String,
    book_id: BookId,
}

impl TransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub fn with_book(mut self, book_id: BookId) -> Self {
        self.book_id = book_id;
        self
    }

    pub fn income(&self, amount: f64, category: IncomeCategory) -> AddIncome {
        AddIncome::new(self.token.clone(), self.book_id, amount, category)
    }

    pub fn outcome(&self, amount: f64, category: OutcomeCategory) -> AddOutcome {
        AddOutcome::new(self.token.clone(), self.book_id, amount, category)
    }
}
