use rust_decimal::Decimal;

use super::transaction::Transaction;

/// Income/expense/balance sums over some set of transactions.
/// Empty sets yield zeros, never nulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for txn in txns {
            if txn.is_income() {
                income += txn.amount;
            } else {
                expense += txn.amount;
            }
        }
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// One "YYYY-MM" bucket of the monthly chart series. A transaction
/// contributes its amount to exactly one of the two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub period: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One slice of the current-month expense breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}
