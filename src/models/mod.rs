mod budget;
mod category;
mod summary;
mod transaction;

pub use budget::BudgetLine;
pub use category::Category;
pub use summary::{CategoryTotal, MonthlyBucket, Totals};
pub use transaction::{Transaction, TransactionDraft, TxKind};
