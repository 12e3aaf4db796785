use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use dashmap::{mapref::entry::Entry as Slot, DashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

use coinverse_api::endpoints::{
    transactions::{IncomeCategory, OutcomeCategory},
    BookId, TransactionId,
};

use crate::server::error::LedgerError;

const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone)]
struct Account {
    name: String,
    email: String,
    pwd_hash: String,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
}

impl Account {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

#[derive(Debug, Clone)]
struct BookRecord {
    owner: String,
    name: String,
}

#[derive(Debug, Clone)]
struct Entry {
    book_id: BookId,
    amount: f64,
    time: NaiveDateTime,
    note: String,
    category: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: TransactionId,
    pub category: String,
    pub note: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub note: Option<String>,
}

/// In-memory accounts, books and transactions keyed the way the server
/// exposes them. Accounts are keyed by name; tokens index back to it.
pub struct Ledger {
    accounts: DashMap<String, Account>,
    tokens: DashMap<String, String>,
    books: DashMap<BookId, BookRecord>,
    entries: DashMap<TransactionId, Entry>,
    next_book_id: AtomicI64,
    next_entry_id: AtomicI64,
    token_ttl: TimeDelta,
}

impl Ledger {
    pub fn new(token_ttl_seconds: u64) -> Self {
        let token_ttl = i64::try_from(token_ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        tracing::info!(
            "Ledger initialized with token TTL of {} seconds",
            token_ttl_seconds
        );

        Self {
            accounts: DashMap::new(),
            tokens: DashMap::new(),
            books: DashMap::new(),
            entries: DashMap::new(),
            next_book_id: AtomicI64::new(1),
            next_entry_id: AtomicI64::new(1),
            token_ttl,
        }
    }

    // Accounts

    pub fn register(&self, name: &str, email: &str, pwd_hash: &str) -> Result<(), LedgerError> {
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(LedgerError::InvalidName);
        }
        if !is_valid_email(email) {
            return Err(LedgerError::InvalidEmail);
        }
        if self.accounts.iter().any(|account| account.email == email) {
            return Err(LedgerError::DuplicateAccount(email.to_string()));
        }

        match self.accounts.entry(name.to_string()) {
            Slot::Occupied(_) => Err(LedgerError::DuplicateAccount(name.to_string())),
            Slot::Vacant(slot) => {
                slot.insert(Account {
                    name: name.to_string(),
                    email: email.to_string(),
                    pwd_hash: pwd_hash.to_string(),
                    token: None,
                    token_expires_at: None,
                });
                tracing::debug!(name = %name, "Registered account");
                Ok(())
            }
        }
    }

    /// Issue a fresh token, replacing any previous one.
    pub fn login(&self, name_or_email: &str, pwd_hash: &str) -> Result<String, LedgerError> {
        let name = self.find_account(name_or_email)?;
        let token = new_token();

        let previous = {
            let mut account = self
                .accounts
                .get_mut(&name)
                .ok_or(LedgerError::AccountNotFound)?;
            if account.pwd_hash != pwd_hash {
                return Err(LedgerError::PasswordMismatch);
            }
            account.token_expires_at = self.expiry_from_now();
            account.token.replace(token.clone())
        };

        if let Some(previous) = previous {
            self.tokens.remove(&previous);
        }
        self.tokens.insert(token.clone(), name);
        Ok(token)
    }

    /// Swap a live token for a new one with a fresh expiry.
    pub fn refresh(&self, old_token: &str) -> Result<String, LedgerError> {
        let name = self.authenticate(old_token)?;
        let token = new_token();

        {
            let mut account = self
                .accounts
                .get_mut(&name)
                .ok_or(LedgerError::TokenNotFound)?;
            account.token = Some(token.clone());
            account.token_expires_at = self.expiry_from_now();
        }

        self.tokens.remove(old_token);
        self.tokens.insert(token.clone(), name);
        Ok(token)
    }

    /// Expire the token in place; later use reports it as expired.
    pub fn logout(&self, token: &str) -> Result<(), LedgerError> {
        let name = self.account_for(token)?;
        let now = Utc::now();

        if let Some(mut account) = self.accounts.get_mut(&name) {
            if !account.is_expired(now) {
                account.token_expires_at = Some(now - TimeDelta::seconds(1));
            }
        }
        Ok(())
    }

    /// `(name, email)` of the token's account.
    pub fn profile(&self, token: &str) -> Result<(String, String), LedgerError> {
        let name = self.authenticate(token)?;
        self.accounts
            .get(&name)
            .map(|account| (account.name.clone(), account.email.clone()))
            .ok_or(LedgerError::TokenNotFound)
    }

    pub fn change_password(
        &self,
        name_or_email: &str,
        old_pwd_hash: &str,
        new_pwd_hash: &str,
    ) -> Result<(), LedgerError> {
        if old_pwd_hash == new_pwd_hash {
            return Err(LedgerError::SamePassword);
        }

        let name = self.find_account(name_or_email)?;
        let mut account = self
            .accounts
            .get_mut(&name)
            .ok_or(LedgerError::AccountNotFound)?;
        if account.pwd_hash != old_pwd_hash {
            return Err(LedgerError::WrongOldPassword);
        }
        account.pwd_hash = new_pwd_hash.to_string();
        Ok(())
    }

    // A TTL too large to represent never expires.
    fn expiry_from_now(&self) -> Option<DateTime<Utc>> {
        Utc::now().checked_add_signed(self.token_ttl)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    // Books

    pub fn create_book(&self, token: &str, book_name: &str) -> Result<BookId, LedgerError> {
        if book_name.trim().is_empty() {
            return Err(LedgerError::MissingField("Book name is required."));
        }
        let owner = self.authenticate(token)?;

        if self
            .books
            .iter()
            .any(|book| book.owner == owner && book.name == book_name)
        {
            return Err(LedgerError::DuplicateBook);
        }

        let id = self.next_book_id.fetch_add(1, Ordering::Relaxed);
        self.books.insert(
            id,
            BookRecord {
                owner,
                name: book_name.to_string(),
            },
        );
        tracing::debug!(book_id = id, "Created book");
        Ok(id)
    }

    /// The token owner's books in creation order, with balances.
    pub fn list_books(&self, token: &str) -> Result<Vec<BookSummary>, LedgerError> {
        let owner = self.authenticate(token)?;

        let mut books: Vec<BookSummary> = self
            .books
            .iter()
            .filter(|book| book.owner == owner)
            .map(|book| BookSummary {
                id: *book.key(),
                name: book.name.clone(),
                balance: 0.0,
            })
            .collect();
        books.sort_by_key(|book| book.id);

        for book in &mut books {
            book.balance = self.balance(book.id);
        }
        Ok(books)
    }

    pub fn remove_book(&self, token: &str, book_id: BookId) -> Result<(), LedgerError> {
        let owner = self.authenticate(token)?;

        self.books
            .remove_if(&book_id, |_, book| book.owner == owner)
            .ok_or(LedgerError::BookNotFound)?;
        self.entries.retain(|_, entry| entry.book_id != book_id);
        Ok(())
    }

    pub fn balance(&self, book_id: BookId) -> f64 {
        self.entries
            .iter()
            .filter(|entry| entry.book_id == book_id)
            .map(|entry| entry.amount)
            .sum()
    }

    // Transactions

    /// Matching transactions, earliest first. Without an end bound only
    /// transactions up to now are listed.
    pub fn transactions(
        &self,
        token: &str,
        book_id: BookId,
        filter: &EntryFilter,
    ) -> Result<Vec<EntryView>, LedgerError> {
        let owner = self.authenticate(token)?;
        self.ensure_owned(&owner, book_id)?;

        let end = filter.end.unwrap_or_else(local_now);
        let mut matched: Vec<(NaiveDateTime, EntryView)> = self
            .entries
            .iter()
            .filter(|entry| entry.book_id == book_id)
            .filter(|entry| filter.start.is_none_or(|start| entry.time >= start))
            .filter(|entry| entry.time <= end)
            .filter(|entry| {
                filter
                    .note
                    .as_deref()
                    .is_none_or(|needle| entry.note.contains(needle))
            })
            .map(|entry| {
                (
                    entry.time,
                    EntryView {
                        id: *entry.key(),
                        category: entry.category.to_string(),
                        note: Some(entry.note.clone()).filter(|note| !note.is_empty()),
                        amount: entry.amount,
                    },
                )
            })
            .collect();

        matched.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        Ok(matched.into_iter().map(|(_, view)| view).collect())
    }

    pub fn add_income(
        &self,
        token: &str,
        book_id: BookId,
        amount: f64,
        category: IncomeCategory,
        time: Option<NaiveDateTime>,
        note: &str,
    ) -> Result<TransactionId, LedgerError> {
        let owner = self.authenticate(token)?;
        self.ensure_owned(&owner, book_id)?;
        if amount < 0.0 {
            return Err(LedgerError::NegativeIncome);
        }
        Ok(self.record(book_id, amount, category.name(), time, note))
    }

    /// Expenses are stored as negative amounts.
    pub fn add_outcome(
        &self,
        token: &str,
        book_id: BookId,
        amount: f64,
        category: OutcomeCategory,
        time: Option<NaiveDateTime>,
        note: &str,
    ) -> Result<TransactionId, LedgerError> {
        let owner = self.authenticate(token)?;
        self.ensure_owned(&owner, book_id)?;
        if amount >= 0.0 {
            return Err(LedgerError::NonNegativeOutcome);
        }
        Ok(self.record(book_id, amount, category.name(), time, note))
    }

    fn record(
        &self,
        book_id: BookId,
        amount: f64,
        category: &'static str,
        time: Option<NaiveDateTime>,
        note: &str,
    ) -> TransactionId {
        let id = self.next_entry_id.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            id,
            Entry {
                book_id,
                amount,
                time: time.unwrap_or_else(local_now),
                note: note.to_string(),
                category,
            },
        );
        tracing::debug!(book_id, transaction_id = id, amount, "Recorded transaction");
        id
    }

    // Lookups

    fn find_account(&self, name_or_email: &str) -> Result<String, LedgerError> {
        if self.accounts.contains_key(name_or_email) {
            return Ok(name_or_email.to_string());
        }
        self.accounts
            .iter()
            .find(|account| account.email == name_or_email)
            .map(|account| account.key().clone())
            .ok_or(LedgerError::AccountNotFound)
    }

    fn account_for(&self, token: &str) -> Result<String, LedgerError> {
        self.tokens
            .get(token)
            .map(|name| name.value().clone())
            .ok_or(LedgerError::TokenNotFound)
    }

    /// Name of the account holding a live token.
    fn authenticate(&self, token: &str) -> Result<String, LedgerError> {
        let name = self.account_for(token)?;
        let account = self.accounts.get(&name).ok_or(LedgerError::TokenNotFound)?;
        if account.is_expired(Utc::now()) {
            return Err(LedgerError::TokenExpired);
        }
        Ok(name)
    }

    fn ensure_owned(&self, owner: &str, book_id: BookId) -> Result<(), LedgerError> {
        match self.books.get(&book_id) {
            Some(book) if book.owner == owner => Ok(()),
            _ => Err(LedgerError::BookNotFound),
        }
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Parse an ISO-8601 style timestamp. Blank input means "not given".
pub fn parse_time(raw: &str) -> Result<Option<NaiveDateTime>, LedgerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(time));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| LedgerError::InvalidTime(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: u64 = 15 * 24 * 3600;

    fn logged_in(ledger: &Ledger) -> String {
        ledger.register("alice", "alice@example.com", "h1").unwrap();
        ledger.login("alice", "h1").unwrap()
    }

    fn at(raw: &str) -> Option<NaiveDateTime> {
        parse_time(raw).unwrap()
    }

    #[test]
    fn register_validates_and_rejects_duplicates() {
        let ledger = Ledger::new(TTL);
        assert_eq!(
            ledger.register("bob", "not-an-email", "h"),
            Err(LedgerError::InvalidEmail)
        );
        assert_eq!(ledger.register("", "a@b.c", "h"), Err(LedgerError::InvalidName));

        ledger.register("bob", "bob@example.com", "h").unwrap();
        assert!(matches!(
            ledger.register("bob", "other@example.com", "h"),
            Err(LedgerError::DuplicateAccount(_))
        ));
        assert!(matches!(
            ledger.register("robert", "bob@example.com", "h"),
            Err(LedgerError::DuplicateAccount(_))
        ));
        assert_eq!(ledger.account_count(), 1);
    }

    #[test]
    fn login_by_name_or_email() {
        let ledger = Ledger::new(TTL);
        ledger.register("alice", "alice@example.com", "h1").unwrap();

        assert!(ledger.login("alice", "h1").is_ok());
        assert!(ledger.login("alice@example.com", "h1").is_ok());
        assert_eq!(ledger.login("alice", "nope"), Err(LedgerError::PasswordMismatch));
        assert_eq!(ledger.login("carol", "h1"), Err(LedgerError::AccountNotFound));
    }

    #[test]
    fn new_login_invalidates_the_previous_token() {
        let ledger = Ledger::new(TTL);
        let first = logged_in(&ledger);
        let second = ledger.login("alice", "h1").unwrap();

        assert_ne!(first, second);
        assert_eq!(ledger.profile(&first), Err(LedgerError::TokenNotFound));
        assert!(ledger.profile(&second).is_ok());
    }

    #[test]
    fn refresh_swaps_tokens() {
        let ledger = Ledger::new(TTL);
        let token = logged_in(&ledger);
        let fresh = ledger.refresh(&token).unwrap();

        assert_eq!(ledger.profile(&token), Err(LedgerError::TokenNotFound));
        assert_eq!(
            ledger.profile(&fresh).unwrap(),
            ("alice".to_string(), "alice@example.com".to_string())
        );
    }

    #[test]
    fn logout_expires_the_token() {
        let ledger = Ledger::new(TTL);
        let token = logged_in(&ledger);

        ledger.logout(&token).unwrap();
        assert_eq!(ledger.list_books(&token), Err(LedgerError::TokenExpired));
        assert_eq!(ledger.refresh(&token), Err(LedgerError::TokenExpired));
        // Logging out twice is fine.
        assert!(ledger.logout(&token).is_ok());
        assert_eq!(ledger.logout("unknown"), Err(LedgerError::TokenNotFound));
    }

    #[test]
    fn zero_ttl_tokens_expire_immediately() {
        let ledger = Ledger::new(0);
        let token = logged_in(&ledger);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(ledger.create_book(&token, "b"), Err(LedgerError::TokenExpired));
    }

    #[test]
    fn change_password_rules() {
        let ledger = Ledger::new(TTL);
        ledger.register("alice", "alice@example.com", "h1").unwrap();

        assert_eq!(
            ledger.change_password("alice", "h1", "h1"),
            Err(LedgerError::SamePassword)
        );
        assert_eq!(
            ledger.change_password("alice", "bad", "h2"),
            Err(LedgerError::WrongOldPassword)
        );
        ledger.change_password("alice@example.com", "h1", "h2").unwrap();
        assert!(ledger.login("alice", "h2").is_ok());
    }

    #[test]
    fn books_are_per_account_and_unique_by_name() {
        let ledger = Ledger::new(TTL);
        let alice = logged_in(&ledger);
        ledger.register("bob", "bob@example.com", "h").unwrap();
        let bob = ledger.login("bob", "h").unwrap();

        let trip = ledger.create_book(&alice, "Trip").unwrap();
        assert_eq!(ledger.create_book(&alice, "Trip"), Err(LedgerError::DuplicateBook));
        assert!(ledger.create_book(&bob, "Trip").is_ok());
        assert_eq!(
            ledger.create_book(&alice, "  "),
            Err(LedgerError::MissingField("Book name is required."))
        );

        assert_eq!(ledger.remove_book(&bob, trip), Err(LedgerError::BookNotFound));
        assert_eq!(ledger.list_books(&alice).unwrap().len(), 1);

        ledger.remove_book(&alice, trip).unwrap();
        assert!(ledger.list_books(&alice).unwrap().is_empty());
    }

    #[test]
    fn balance_sums_signed_amounts() {
        let ledger = Ledger::new(TTL);
        let token = logged_in(&ledger);
        let book = ledger.create_book(&token, "Home").unwrap();

        ledger
            .add_income(&token, book, 100.0, IncomeCategory::Salary, None, "")
            .unwrap();
        ledger
            .add_outcome(&token, book, -30.5, OutcomeCategory::Food, None, "lunch")
            .unwrap();

        assert_eq!(
            ledger.add_outcome(&token, book, 5.0, OutcomeCategory::Food, None, ""),
            Err(LedgerError::NonNegativeOutcome)
        );
        assert_eq!(
            ledger.add_income(&token, book, -5.0, IncomeCategory::Bonus, None, ""),
            Err(LedgerError::NegativeIncome)
        );

        let books = ledger.list_books(&token).unwrap();
        assert_eq!(books[0].balance, 69.5);
    }

    #[test]
    fn transactions_filter_and_sort() {
        let ledger = Ledger::new(TTL);
        let token = logged_in(&ledger);
        let book = ledger.create_book(&token, "Home").unwrap();

        ledger
            .add_outcome(&token, book, -12.0, OutcomeCategory::Rent, at("2024-03-01T10:00:00"), "march rent")
            .unwrap();
        ledger
            .add_income(&token, book, 50.0, IncomeCategory::Bonus, at("2024-01-15T09:00:00"), "")
            .unwrap();
        ledger
            .add_outcome(&token, book, -3.0, OutcomeCategory::Food, at("2024-02-01T12:30:00"), "coffee")
            .unwrap();

        let all = ledger
            .transactions(&token, book, &EntryFilter::default())
            .unwrap();
        let categories: Vec<_> = all.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, ["BONUS", "FOOD", "RENT"]);
        assert_eq!(all[0].note, None);

        let filter = EntryFilter {
            start: at("2024-02-01"),
            end: at("2024-02-28T23:59:59"),
            note: None,
        };
        let february = ledger.transactions(&token, book, &filter).unwrap();
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].note.as_deref(), Some("coffee"));

        let filter = EntryFilter {
            note: Some("rent".into()),
            ..EntryFilter::default()
        };
        assert_eq!(ledger.transactions(&token, book, &filter).unwrap().len(), 1);
    }

    #[test]
    fn removing_a_book_drops_its_transactions() {
        let ledger = Ledger::new(TTL);
        let token = logged_in(&ledger);
        let book = ledger.create_book(&token, "Temp").unwrap();
        ledger
            .add_income(&token, book, 1.0, IncomeCategory::Other, None, "")
            .unwrap();

        ledger.remove_book(&token, book).unwrap();
        assert_eq!(ledger.balance(book), 0.0);
        assert_eq!(
            ledger.transactions(&token, book, &EntryFilter::default()),
            Err(LedgerError::BookNotFound)
        );
    }

    #[test]
    fn parse_time_accepts_iso_forms() {
        assert_eq!(parse_time("").unwrap(), None);
        assert_eq!(parse_time(" ").unwrap(), None);

        let expected = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(parse_time("2024-05-06T07:08:09").unwrap(), Some(expected));
        assert_eq!(parse_time("2024-05-06 07:08:09").unwrap(), Some(expected));
        assert_eq!(parse_time("2024-05-06T07:08:09.000").unwrap(), Some(expected));
        assert!(parse_time("2024-05-06").unwrap().is_some());
        assert!(matches!(parse_time("yesterday"), Err(LedgerError::InvalidTime(_))));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b..co"));
    }
}
