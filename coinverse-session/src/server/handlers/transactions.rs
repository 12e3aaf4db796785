use axum::{extract::State, Json};

use coinverse_api::endpoints::{
    transactions::{IncomeCategory, OutcomeCategory},
    TransactionId,
};

use super::rejected;
use crate::server::{
    error::LedgerError,
    models::{AddIncomeRequest, AddOutcomeRequest, Empty, Reply},
    services::{parse_time, Ledger},
    AppState,
};

pub async fn add_income(
    State(state): State<AppState>,
    Json(req): Json<AddIncomeRequest>,
) -> Json<Reply<Empty>> {
    let reply = match record_income(&state.ledger, &req) {
        Ok(transaction_id) => {
            tracing::info!(transaction_id, "Income added");
            Reply::ok(Some(0), "Income added successfully", Empty {})
        }
        Err(e) => {
            let code = match e {
                LedgerError::InvalidTime(_) => 1,
                LedgerError::MissingField(_) => 2,
                LedgerError::TokenNotFound => 3,
                LedgerError::TokenExpired => 4,
                LedgerError::CategoryIndex(_) => 5,
                _ => 6,
            };
            rejected("add_income", Some(code), e)
        }
    };

    Json(reply)
}

pub async fn add_outcome(
    State(state): State<AppState>,
    Json(req): Json<AddOutcomeRequest>,
) -> Json<Reply<Empty>> {
    let reply = match record_outcome(&state.ledger, &req) {
        Ok(transaction_id) => {
            tracing::info!(transaction_id, "Outcome added");
            Reply::ok(Some(0), "Outcome added successfully", Empty {})
        }
        Err(e) => {
            let code = match e {
                LedgerError::InvalidTime(_) => 1,
                LedgerError::TokenNotFound => 2,
                LedgerError::TokenExpired => 3,
                LedgerError::NonNegativeOutcome => 4,
                LedgerError::CategoryIndex(_) => 5,
                _ => 6,
            };
            rejected("add_outcome", Some(code), e)
        }
    };

    Json(reply)
}

fn record_income(ledger: &Ledger, req: &AddIncomeRequest) -> Result<TransactionId, LedgerError> {
    let time = parse_time(&req.time)?;
    let category = u8::try_from(req.income_idx)
        .ok()
        .and_then(IncomeCategory::from_index)
        .ok_or(LedgerError::CategoryIndex("Income"))?;

    ledger.add_income(
        &req.token,
        req.account_book_id,
        req.amount,
        category,
        time,
        &req.note,
    )
}

fn record_outcome(ledger: &Ledger, req: &AddOutcomeRequest) -> Result<TransactionId, LedgerError> {
    let time = parse_time(&req.time)?;
    let category = u8::try_from(req.outcome_idx)
        .ok()
        .and_then(OutcomeCategory::from_index)
        .ok_or(LedgerError::CategoryIndex("Outcome"))?;

    ledger.add_outcome(
        &req.token,
        req.account_book_id,
        req.amount,
        category,
        time,
        &req.note,
    )
}
