use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Strict parse: anything outside INCOME/EXPENSE is rejected, not
    /// defaulted. Case-insensitive to be forgiving about CLI input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub kind: TxKind,
    /// Category name. A soft reference: renaming a category later does not
    /// touch existing transactions, so this may point at nothing.
    pub category: String,
    /// Always strictly positive; the sign lives in `kind`.
    pub amount: Decimal,
    pub note: String,
    pub tx_date: NaiveDate,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TxKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }
}

/// Raw field values as entered in a form or on the command line,
/// prior to validation.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub note: String,
    /// ISO date, or blank to use the fallback.
    pub tx_date: String,
}

impl TransactionDraft {
    /// Check every field and produce a typed transaction, or a validation
    /// error describing the first problem found. `fallback_date` is today's
    /// date on create and the stored date on edit.
    pub fn validate(&self, fallback_date: NaiveDate) -> Result<Transaction, Error> {
        let kind_raw = self.kind.trim();
        let category = self.category.trim();
        let amount_raw = self.amount.trim();

        if kind_raw.is_empty() || category.is_empty() || amount_raw.is_empty() {
            return Err(Error::validation(
                "type, category and amount are required",
            ));
        }

        let kind = TxKind::parse(kind_raw).ok_or_else(|| {
            Error::validation(format!(
                "invalid transaction type '{kind_raw}' (expected INCOME or EXPENSE)"
            ))
        })?;

        let amount = Decimal::from_str(amount_raw)
            .map_err(|_| Error::validation(format!("amount must be a number, got '{amount_raw}'")))?;
        if amount <= Decimal::ZERO {
            return Err(Error::validation("amount must be greater than zero"));
        }

        let date_raw = self.tx_date.trim();
        let tx_date = if date_raw.is_empty() {
            fallback_date
        } else {
            NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
                .map_err(|_| Error::validation(format!("invalid date '{date_raw}' (use YYYY-MM-DD)")))?
        };

        Ok(Transaction {
            id: None,
            kind,
            category: category.to_string(),
            amount,
            note: self.note.trim().to_string(),
            tx_date,
        })
    }
}
