use thiserror::Error;

/// Failures of the in-memory ledger. Each handler maps these onto the
/// business codes of its own endpoint; the message is sent as `msg`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Token not found")]
    TokenNotFound,

    #[error("Token expired, please login again")]
    TokenExpired,

    #[error("Invalid email Format")]
    InvalidEmail,

    #[error("Name must be between 1 and 20 characters")]
    InvalidName,

    #[error("Account {0} already exists\n consider if the account has been existed")]
    DuplicateAccount(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Old password is incorrect")]
    WrongOldPassword,

    #[error("Old password and new password cannot be the same")]
    SamePassword,

    #[error("{0}")]
    MissingField(&'static str),

    #[error("Duplicated book name")]
    DuplicateBook,

    #[error("Account book not found or does not belong to this account.")]
    BookNotFound,

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("{0} Type Index Error")]
    CategoryIndex(&'static str),

    #[error("Income amount must not be negative")]
    NegativeIncome,

    #[error("Outcome amount must be negative")]
    NonNegativeOutcome,
}
