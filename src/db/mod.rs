mod schema;

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Categories ────────────────────────────────────────────

    /// Create a category if no category of that (trimmed) name exists yet.
    /// Empty names are silently ignored; an existing category is left
    /// completely untouched, including its kind. Not an upsert.
    pub(crate) fn ensure_category(&self, name: &str, kind: TxKind) -> Result<()> {
        ensure_category_in(&self.conn, name, kind)
    }

    pub(crate) fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, monthly_budget FROM categories ORDER BY name",
        )?;
        let rows = stmt.query_map([], map_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Expense categories in alphabetical order, the set budgets apply to.
    pub(crate) fn get_expense_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, kind, monthly_budget FROM categories
             WHERE kind = 'EXPENSE' ORDER BY name",
        )?;
        let rows = stmt.query_map([], map_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name, kind, monthly_budget FROM categories WHERE id = ?1",
            params![id],
            map_category,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or clear the standing monthly ceiling for one category.
    /// Budgets are not per-month; the same ceiling is evaluated against
    /// whichever month is being viewed.
    pub(crate) fn set_monthly_budget(&self, category_id: i64, value: Option<Decimal>) -> Result<()> {
        if let Some(v) = value {
            if v < Decimal::ZERO {
                return Err(Error::validation("budget must not be negative"));
            }
        }
        let affected = self.conn.execute(
            "UPDATE categories SET monthly_budget = ?1 WHERE id = ?2",
            params![value.map(|v| v.to_string()), category_id],
        )?;
        if affected == 0 {
            return Err(Error::CategoryNotFound(category_id));
        }
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    /// Validate a draft and store it, provisioning its category in the same
    /// SQLite transaction so readers never observe one without the other.
    /// `today` is the injected clock, used when the draft has no date.
    pub(crate) fn create_transaction(
        &mut self,
        draft: &TransactionDraft,
        today: NaiveDate,
    ) -> Result<Transaction> {
        let mut txn = draft.validate(today)?;
        let tx = self.conn.transaction()?;
        ensure_category_in(&tx, &txn.category, txn.kind)?;
        tx.execute(
            "INSERT INTO transactions (kind, category, amount, note, tx_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.kind.as_str(),
                txn.category,
                txn.amount.to_string(),
                txn.note,
                txn.tx_date.format("%Y-%m-%d").to_string(),
            ],
        )?;
        txn.id = Some(tx.last_insert_rowid());
        tx.commit()?;
        Ok(txn)
    }

    /// Replace all fields of an existing transaction. A blank date in the
    /// draft keeps the stored date. A changed category is re-provisioned.
    pub(crate) fn update_transaction(&mut self, id: i64, draft: &TransactionDraft) -> Result<()> {
        let existing = self
            .get_transaction_by_id(id)?
            .ok_or(Error::TransactionNotFound(id))?;
        let txn = draft.validate(existing.tx_date)?;

        let tx = self.conn.transaction()?;
        ensure_category_in(&tx, &txn.category, txn.kind)?;
        tx.execute(
            "UPDATE transactions SET kind = ?1, category = ?2, amount = ?3, note = ?4, tx_date = ?5
             WHERE id = ?6",
            params![
                txn.kind.as_str(),
                txn.category,
                txn.amount.to_string(),
                txn.note,
                txn.tx_date.format("%Y-%m-%d").to_string(),
                id,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::TransactionNotFound(id));
        }
        Ok(())
    }

    pub(crate) fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, kind, category, amount, note, tx_date FROM transactions WHERE id = ?1",
            params![id],
            map_transaction,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Transactions matching the optional month (1-12) and year filters,
    /// newest first (`tx_date DESC, id DESC`), plus income/expense/balance
    /// sums over exactly that filtered set.
    pub(crate) fn list_transactions(
        &self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<(Vec<Transaction>, Totals)> {
        let mut sql = String::from(
            "SELECT id, kind, category, amount, note, tx_date FROM transactions WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(m) = month {
            sql.push_str(&format!(
                " AND strftime('%m', tx_date) = ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("{m:02}")));
        }
        if let Some(y) = year {
            sql.push_str(&format!(
                " AND strftime('%Y', tx_date) = ?{}",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("{y:04}")));
        }

        sql.push_str(" ORDER BY tx_date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), map_transaction)?;
        let txns = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        let totals = Totals::from_transactions(&txns);
        Ok((txns, totals))
    }

    // ── Aggregation ───────────────────────────────────────────

    /// Income, expense and balance over the whole unfiltered ledger.
    pub(crate) fn global_summary(&self) -> Result<Totals> {
        Ok(self.list_transactions(None, None)?.1)
    }

    /// Per-month income/expense buckets, ascending by "YYYY-MM" label.
    /// Months with no transactions are simply absent. An optional year
    /// filter restricts the series to that year.
    pub(crate) fn monthly_series(&self, year: Option<i32>) -> Result<Vec<MonthlyBucket>> {
        let (sql, param_values): (String, Vec<Box<dyn rusqlite::types::ToSql>>) =
            if let Some(y) = year {
                (
                    "SELECT strftime('%Y-%m', tx_date) AS period,
                            CAST(SUM(CASE WHEN kind = 'INCOME' THEN amount ELSE 0 END) AS TEXT),
                            CAST(SUM(CASE WHEN kind = 'EXPENSE' THEN amount ELSE 0 END) AS TEXT)
                     FROM transactions
                     WHERE strftime('%Y', tx_date) = ?1
                     GROUP BY period ORDER BY period"
                        .into(),
                    vec![Box::new(format!("{y:04}"))],
                )
            } else {
                (
                    "SELECT strftime('%Y-%m', tx_date) AS period,
                            CAST(SUM(CASE WHEN kind = 'INCOME' THEN amount ELSE 0 END) AS TEXT),
                            CAST(SUM(CASE WHEN kind = 'EXPENSE' THEN amount ELSE 0 END) AS TEXT)
                     FROM transactions
                     GROUP BY period ORDER BY period"
                        .into(),
                    vec![],
                )
            };

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let inc_str: String = row.get(1)?;
            let exp_str: String = row.get(2)?;
            Ok(MonthlyBucket {
                period: row.get(0)?,
                income: Decimal::from_str(&inc_str).unwrap_or_default(),
                expense: Decimal::from_str(&exp_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Expense totals per category for one calendar month, largest first.
    /// The caller supplies the month; for the dashboard donut that is the
    /// injected "today", never a clock read down here.
    pub(crate) fn category_breakdown(&self, year: i32, month: u32) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, CAST(SUM(amount) AS TEXT)
             FROM transactions
             WHERE kind = 'EXPENSE' AND strftime('%Y-%m', tx_date) = ?1
             GROUP BY category
             ORDER BY SUM(amount) DESC",
        )?;
        let rows = stmt.query_map(params![format!("{year:04}-{month:02}")], |row| {
            let total_str: String = row.get(1)?;
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: Decimal::from_str(&total_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct months and years present in the ledger, ascending, for the
    /// filter selectors. An empty ledger yields the current month and year
    /// so the selectors are never empty.
    pub(crate) fn available_months_years(&self, today: NaiveDate) -> Result<(Vec<u32>, Vec<i32>)> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT CAST(strftime('%m', tx_date) AS INTEGER) FROM transactions ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut months: Vec<u32> = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|m| m as u32)
            .collect();

        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT CAST(strftime('%Y', tx_date) AS INTEGER) FROM transactions ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut years: Vec<i32> = rows
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|y| y as i32)
            .collect();

        if months.is_empty() {
            months.push(today.month());
        }
        if years.is_empty() {
            years.push(today.year());
        }
        Ok((months, years))
    }

    // ── Budget evaluation ─────────────────────────────────────

    /// One line per expense category (alphabetical), joining that month's
    /// spend against the category's standing ceiling. Categories with no
    /// transactions that month report a spend of zero, not null.
    pub(crate) fn evaluate_budgets(&self, year: i32, month: u32) -> Result<Vec<BudgetLine>> {
        let categories = self.get_expense_categories()?;

        let mut stmt = self.conn.prepare(
            "SELECT category, CAST(SUM(amount) AS TEXT)
             FROM transactions
             WHERE kind = 'EXPENSE' AND strftime('%Y-%m', tx_date) = ?1
             GROUP BY category",
        )?;
        let rows = stmt.query_map(params![format!("{year:04}-{month:02}")], |row| {
            let name: String = row.get(0)?;
            let spent_str: String = row.get(1)?;
            Ok((name, Decimal::from_str(&spent_str).unwrap_or_default()))
        })?;
        let spent_by_category: HashMap<String, Decimal> =
            rows.collect::<std::result::Result<HashMap<_, _>, _>>()?;

        Ok(categories
            .into_iter()
            .map(|cat| {
                let spent = spent_by_category
                    .get(&cat.name)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                BudgetLine::evaluate(cat, spent)
            })
            .collect())
    }
}

/// Shared by `Database::ensure_category` and the write paths, which run it
/// against their own open SQLite transaction.
fn ensure_category_in(conn: &Connection, name: &str, kind: TxKind) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(());
    }
    // INSERT OR IGNORE against the UNIQUE name: create-if-absent, and the
    // kind of an existing category is never overwritten.
    conn.execute(
        "INSERT OR IGNORE INTO categories (name, kind) VALUES (?1, ?2)",
        params![name, kind.as_str()],
    )?;
    Ok(())
}

fn map_category(row: &Row) -> rusqlite::Result<Category> {
    let kind_str: String = row.get(2)?;
    let budget_str: Option<String> = row.get(3)?;
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        kind: TxKind::parse(&kind_str).unwrap_or(TxKind::Expense),
        monthly_budget: budget_str.and_then(|s| Decimal::from_str(&s).ok()),
    })
}

fn map_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(1)?;
    let amount_str: String = row.get(3)?;
    let date_str: String = row.get(5)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        kind: TxKind::parse(&kind_str).unwrap_or(TxKind::Expense),
        category: row.get(2)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        note: row.get(4)?,
        tx_date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests;
