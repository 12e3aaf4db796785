use super::{BookId, NoPayload, optional_text, optional_time};
use crate::macros::setter;
use crate::{Method, Operation};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

// Common

/// Income categories, serialized as the server's 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeCategory {
    Salary,
    Bonus,
    Invest,
    Other,
}

impl IncomeCategory {
    pub const ALL: [Self; 4] = [Self::Salary, Self::Bonus, Self::Invest, Self::Other];

    pub fn index(self) -> u8 {
        match self {
            Self::Salary => 1,
            Self::Bonus => 2,
            Self::Invest => 3,
            Self::Other => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.index() == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Salary => "SALARY",
            Self::Bonus => "BONUS",
            Self::Invest => "INVEST",
            Self::Other => "OTHER",
        }
    }
}

/// Expense categories, serialized as the server's 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCategory {
    Food,
    Rent,
    Transport,
    Entertain,
    Other,
}

impl OutcomeCategory {
    pub const ALL: [Self; 5] = [
        Self::Food,
        Self::Rent,
        Self::Transport,
        Self::Entertain,
        Self::Other,
    ];

    pub fn index(self) -> u8 {
        match self {
            Self::Food => 1,
            Self::Rent => 2,
            Self::Transport => 3,
            Self::Entertain => 4,
            Self::Other => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.index() == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Food => "FOOD",
            Self::Rent => "RENT",
            Self::Transport => "TRANSPORT",
            Self::Entertain => "ENTERTAIN",
            Self::Other => "OTHER",
        }
    }
}

macro_rules! category_text {
    ($ty:ty) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|c| c.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("unknown category: {s}"))
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.index())
            }
        }
    };
}

category_text!(IncomeCategory);
category_text!(OutcomeCategory);

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct AddIncome {
    token: String,
    account_book_id: BookId,
    amount: f64,
    income_idx: IncomeCategory,
    #[serde(serialize_with = "optional_time")]
    time: Option<NaiveDateTime>,
    #[serde(serialize_with = "optional_text")]
    note: Option<String>,
}

impl AddIncome {
    pub fn new(
        token: impl Into<String>,
        account_book_id: BookId,
        amount: f64,
        category: IncomeCategory,
    ) -> Self {
        Self {
            token: token.into(),
            account_book_id,
            amount,
            income_idx: category,
            time: None,
            note: None,
        }
    }

    setter!(opt time: NaiveDateTime);
    setter!(opt note: String);
}

impl Operation for AddIncome {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "add_income";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/book/transactions/add_income".into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AddOutcome {
    token: String,
    account_book_id: BookId,
    amount: f64,
    outcome_idx: OutcomeCategory,
    #[serde(serialize_with = "optional_time")]
    time: Option<NaiveDateTime>,
    #[serde(serialize_with = "optional_text")]
    note: Option<String>,
}

impl AddOutcome {
    pub fn new(
        token: impl Into<String>,
        account_book_id: BookId,
        amount: f64,
        category: OutcomeCategory,
    ) -> Self {
        Self {
            token: token.into(),
            account_book_id,
            amount,
            outcome_idx: category,
            time: None,
            note: None,
        }
    }

    setter!(opt time: NaiveDateTime);
    setter!(opt note: String);
}

impl Operation for AddOutcome {
    const METHOD: Method = Method::Post;
    const NAME: &'static str = "add_outcome";
    type Payload = NoPayload;

    fn endpoint(&self) -> Cow<'_, str> {
        "CoinVerse/book/transactions/add_outcome".into()
    }
}
