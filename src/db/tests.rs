#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2024, 3, 20)
}

fn draft(kind: &str, category: &str, amount: &str, date: &str) -> TransactionDraft {
    TransactionDraft {
        kind: kind.into(),
        category: category.into(),
        amount: amount.into(),
        note: String::new(),
        tx_date: date.into(),
    }
}

/// A small mixed ledger: two months of 2024 plus one month of 2023.
fn setup_test_data(db: &mut Database) {
    let entries = [
        ("INCOME", "Salary", "3000000", "2024-03-01"),
        ("EXPENSE", "Food", "50000", "2024-03-15"),
        ("EXPENSE", "Food", "25000", "2024-03-18"),
        ("EXPENSE", "Transport", "10000", "2024-03-05"),
        ("INCOME", "Salary", "3000000", "2024-02-01"),
        ("EXPENSE", "Food", "80000", "2024-02-10"),
        ("EXPENSE", "Rent", "1500000", "2023-12-01"),
    ];
    for (kind, category, amount, date) in entries {
        db.create_transaction(&draft(kind, category, amount, date), today())
            .unwrap();
    }
}

// ── Schema / open ─────────────────────────────────────────────

#[test]
fn test_open_file_backed_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    {
        let mut db = Database::open(&path).unwrap();
        db.create_transaction(&draft("EXPENSE", "Food", "50000", "2024-03-15"), today())
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let (txns, totals) = db.list_transactions(None, None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category, "Food");
    assert_eq!(totals.expense, dec!(50000));
}

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_categories().unwrap().is_empty());
    let (txns, totals) = db.list_transactions(None, None).unwrap();
    assert!(txns.is_empty());
    assert_eq!(totals, Totals::default());
}

// ── Category provisioning ─────────────────────────────────────

#[test]
fn test_ensure_category_creates_once() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_category("Food", TxKind::Expense).unwrap();
    db.ensure_category("Food", TxKind::Expense).unwrap();

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");
    assert_eq!(cats[0].kind, TxKind::Expense);
    assert!(cats[0].monthly_budget.is_none());
}

#[test]
fn test_ensure_category_never_updates_kind() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_category("Refund", TxKind::Income).unwrap();
    // Second call with a different kind is a no-op, not an upsert.
    db.ensure_category("Refund", TxKind::Expense).unwrap();

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].kind, TxKind::Income);
}

#[test]
fn test_ensure_category_ignores_empty_names() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_category("", TxKind::Expense).unwrap();
    db.ensure_category("   ", TxKind::Expense).unwrap();
    assert!(db.get_categories().unwrap().is_empty());
}

#[test]
fn test_ensure_category_trims_name() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_category("  Food  ", TxKind::Expense).unwrap();
    db.ensure_category("Food", TxKind::Expense).unwrap();

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");
}

#[test]
fn test_category_names_are_case_sensitive() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_category("Food", TxKind::Expense).unwrap();
    db.ensure_category("food", TxKind::Expense).unwrap();
    assert_eq!(db.get_categories().unwrap().len(), 2);
}

// ── Transaction create ────────────────────────────────────────

#[test]
fn test_create_transaction_provisions_category() {
    let mut db = Database::open_in_memory().unwrap();
    let txn = db
        .create_transaction(&draft("EXPENSE", "Food", "50000", "2024-03-15"), today())
        .unwrap();
    assert!(txn.id.is_some());
    assert_eq!(txn.amount, dec!(50000));
    assert_eq!(txn.tx_date, day(2024, 3, 15));

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");
    assert_eq!(cats[0].kind, TxKind::Expense);

    let (txns, totals) = db.list_transactions(Some(3), Some(2024)).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(totals.expense, dec!(50000));
    assert_eq!(totals.income, Decimal::ZERO);
    assert_eq!(totals.balance, dec!(-50000));
}

#[test]
fn test_create_transaction_blank_date_defaults_to_today() {
    let mut db = Database::open_in_memory().unwrap();
    let txn = db
        .create_transaction(&draft("INCOME", "Salary", "3000", ""), today())
        .unwrap();
    assert_eq!(txn.tx_date, today());
}

#[test]
fn test_create_transaction_keeps_existing_category_kind() {
    let mut db = Database::open_in_memory().unwrap();
    db.ensure_category("Misc", TxKind::Income).unwrap();
    db.create_transaction(&draft("EXPENSE", "Misc", "10", ""), today())
        .unwrap();

    let cats = db.get_categories().unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].kind, TxKind::Income);
}

#[test]
fn test_create_transaction_validation_leaves_no_partial_write() {
    let mut db = Database::open_in_memory().unwrap();

    for bad in [
        draft("EXPENSE", "Food", "abc", ""),
        draft("EXPENSE", "Food", "-5", ""),
        draft("EXPENSE", "Food", "0", ""),
        draft("TRANSFER", "Food", "5", ""),
        draft("EXPENSE", "", "5", ""),
        draft("EXPENSE", "Food", "5", "not-a-date"),
    ] {
        let err = db.create_transaction(&bad, today()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    }

    // Neither a transaction nor a category made it to disk.
    assert!(db.list_transactions(None, None).unwrap().0.is_empty());
    assert!(db.get_categories().unwrap().is_empty());
}

// ── Transaction update / delete ───────────────────────────────

#[test]
fn test_update_transaction_reprovisions_category() {
    let mut db = Database::open_in_memory().unwrap();
    let txn = db
        .create_transaction(&draft("EXPENSE", "Food", "50000", "2024-03-15"), today())
        .unwrap();
    let id = txn.id.unwrap();

    db.update_transaction(id, &draft("EXPENSE", "Groceries", "60000", "2024-03-16"))
        .unwrap();

    let updated = db.get_transaction_by_id(id).unwrap().unwrap();
    assert_eq!(updated.category, "Groceries");
    assert_eq!(updated.amount, dec!(60000));
    assert_eq!(updated.tx_date, day(2024, 3, 16));

    // Both the old and the new category exist; the old one is now orphaned
    // only if nothing else references it, which is fine by design.
    let cats = db.get_categories().unwrap();
    assert!(Category::find_by_name(&cats, "Food").is_some());
    assert!(Category::find_by_name(&cats, "Groceries").is_some());
}

#[test]
fn test_update_transaction_blank_date_keeps_stored_date() {
    let mut db = Database::open_in_memory().unwrap();
    let txn = db
        .create_transaction(&draft("EXPENSE", "Food", "50000", "2024-03-15"), today())
        .unwrap();
    let id = txn.id.unwrap();

    db.update_transaction(id, &draft("EXPENSE", "Food", "70000", ""))
        .unwrap();

    let updated = db.get_transaction_by_id(id).unwrap().unwrap();
    assert_eq!(updated.amount, dec!(70000));
    assert_eq!(updated.tx_date, day(2024, 3, 15));
}

#[test]
fn test_update_transaction_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let err = db
        .update_transaction(999, &draft("EXPENSE", "Food", "1", ""))
        .unwrap_err();
    assert!(matches!(err, Error::TransactionNotFound(999)));
}

#[test]
fn test_update_transaction_rejects_invalid_amount() {
    let mut db = Database::open_in_memory().unwrap();
    let txn = db
        .create_transaction(&draft("EXPENSE", "Food", "50000", "2024-03-15"), today())
        .unwrap();
    let id = txn.id.unwrap();

    let err = db
        .update_transaction(id, &draft("EXPENSE", "Food", "-1", ""))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Unchanged on disk.
    let stored = db.get_transaction_by_id(id).unwrap().unwrap();
    assert_eq!(stored.amount, dec!(50000));
}

#[test]
fn test_delete_transaction_removes_from_aggregations() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let (txns, _) = db.list_transactions(Some(3), Some(2024)).unwrap();
    let food = txns.iter().find(|t| t.amount == dec!(50000)).unwrap();
    let before = db.global_summary().unwrap();

    db.delete_transaction(food.id.unwrap()).unwrap();

    let (after_txns, _) = db.list_transactions(Some(3), Some(2024)).unwrap();
    assert!(!after_txns.iter().any(|t| t.id == food.id));

    let after = db.global_summary().unwrap();
    assert_eq!(after.expense, before.expense - dec!(50000));

    let breakdown = db.category_breakdown(2024, 3).unwrap();
    let food_total = breakdown.iter().find(|c| c.category == "Food").unwrap();
    assert_eq!(food_total.total, dec!(25000));
}

#[test]
fn test_delete_transaction_not_found() {
    let db = Database::open_in_memory().unwrap();
    let err = db.delete_transaction(42).unwrap_err();
    assert!(matches!(err, Error::TransactionNotFound(42)));
}

// ── Listing and filters ───────────────────────────────────────

#[test]
fn test_list_transactions_orders_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    // Same-date tie: later insert wins via id DESC.
    db.create_transaction(&draft("EXPENSE", "Food", "1000", "2024-03-15"), today())
        .unwrap();

    let (txns, _) = db.list_transactions(None, None).unwrap();
    let dates: Vec<NaiveDate> = txns.iter().map(|t| t.tx_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let same_day: Vec<&Transaction> =
        txns.iter().filter(|t| t.tx_date == day(2024, 3, 15)).collect();
    assert_eq!(same_day.len(), 2);
    assert!(same_day[0].id > same_day[1].id);
}

#[test]
fn test_list_transactions_month_and_year_filters() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let (txns, totals) = db.list_transactions(Some(3), Some(2024)).unwrap();
    assert_eq!(txns.len(), 4);
    assert_eq!(totals.income, dec!(3000000));
    assert_eq!(totals.expense, dec!(85000));
    assert_eq!(totals.balance, dec!(2915000));

    // Month filter alone matches that month across years.
    let (txns, _) = db.list_transactions(Some(12), None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].category, "Rent");

    // Year filter alone.
    let (txns, _) = db.list_transactions(None, Some(2023)).unwrap();
    assert_eq!(txns.len(), 1);

    let (txns, totals) = db.list_transactions(Some(7), Some(2024)).unwrap();
    assert!(txns.is_empty());
    assert_eq!(totals, Totals::default());
}

// ── Aggregation ───────────────────────────────────────────────

#[test]
fn test_global_summary_balance() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let totals = db.global_summary().unwrap();
    assert_eq!(totals.income, dec!(6000000));
    assert_eq!(totals.expense, dec!(1665000));
    assert_eq!(totals.balance, totals.income - totals.expense);
}

#[test]
fn test_monthly_series_buckets_and_order() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let series = db.monthly_series(None).unwrap();
    let periods: Vec<&str> = series.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(periods, vec!["2023-12", "2024-02", "2024-03"]);

    let feb = &series[1];
    assert_eq!(feb.income, dec!(3000000));
    assert_eq!(feb.expense, dec!(80000));

    // 2024-01 has no transactions and no bucket: gaps are not zero-filled.
    assert!(!periods.contains(&"2024-01"));
}

#[test]
fn test_monthly_series_partitions_global_totals() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let series = db.monthly_series(None).unwrap();
    let income_sum: Decimal = series.iter().map(|b| b.income).sum();
    let expense_sum: Decimal = series.iter().map(|b| b.expense).sum();

    let totals = db.global_summary().unwrap();
    assert_eq!(income_sum, totals.income);
    assert_eq!(expense_sum, totals.expense);
}

#[test]
fn test_monthly_series_year_filter() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let series = db.monthly_series(Some(2024)).unwrap();
    let periods: Vec<&str> = series.iter().map(|b| b.period.as_str()).collect();
    assert_eq!(periods, vec!["2024-02", "2024-03"]);

    assert!(db.monthly_series(Some(2020)).unwrap().is_empty());
}

#[test]
fn test_category_breakdown_expense_only_and_descending() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let breakdown = db.category_breakdown(2024, 3).unwrap();
    let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
    // Food 75000 > Transport 10000; Salary is INCOME and excluded.
    assert_eq!(names, vec!["Food", "Transport"]);
    assert_eq!(breakdown[0].total, dec!(75000));
    assert_eq!(breakdown[1].total, dec!(10000));
}

#[test]
fn test_category_breakdown_scoped_to_month() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let breakdown = db.category_breakdown(2024, 2).unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category, "Food");
    assert_eq!(breakdown[0].total, dec!(80000));

    assert!(db.category_breakdown(2024, 1).unwrap().is_empty());
}

#[test]
fn test_available_months_years_empty_ledger_defaults_to_today() {
    let db = Database::open_in_memory().unwrap();
    let (months, years) = db.available_months_years(day(2025, 7, 4)).unwrap();
    assert_eq!(months, vec![7]);
    assert_eq!(years, vec![2025]);
}

#[test]
fn test_available_months_years_distinct_ascending() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let (months, years) = db.available_months_years(today()).unwrap();
    assert_eq!(months, vec![2, 3, 12]);
    assert_eq!(years, vec![2023, 2024]);
}

// ── Budgets ───────────────────────────────────────────────────

fn category_id(db: &Database, name: &str) -> i64 {
    let cats = db.get_categories().unwrap();
    Category::find_by_name(&cats, name).unwrap().id.unwrap()
}

#[test]
fn test_set_monthly_budget_and_clear() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let food = category_id(&db, "Food");

    db.set_monthly_budget(food, Some(dec!(100000))).unwrap();
    let cat = db.get_category_by_id(food).unwrap().unwrap();
    assert_eq!(cat.monthly_budget, Some(dec!(100000)));

    db.set_monthly_budget(food, None).unwrap();
    let cat = db.get_category_by_id(food).unwrap().unwrap();
    assert!(cat.monthly_budget.is_none());
}

#[test]
fn test_set_monthly_budget_rejects_negative() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    let food = category_id(&db, "Food");

    let err = db.set_monthly_budget(food, Some(dec!(-1))).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_set_monthly_budget_unknown_category() {
    let db = Database::open_in_memory().unwrap();
    let err = db.set_monthly_budget(777, Some(dec!(10))).unwrap_err();
    assert!(matches!(err, Error::CategoryNotFound(777)));
}

#[test]
fn test_evaluate_budgets_alphabetical_expense_categories_only() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);

    let lines = db.evaluate_budgets(2024, 3).unwrap();
    let names: Vec<&str> = lines.iter().map(|l| l.category.name.as_str()).collect();
    // Salary (INCOME) never appears; Rent has no 2024-03 spend but still gets a line.
    assert_eq!(names, vec!["Food", "Rent", "Transport"]);

    let rent = &lines[1];
    assert_eq!(rent.spent, Decimal::ZERO);
    assert_eq!(rent.percent_used, None);
    assert_eq!(rent.remaining, None);
}

#[test]
fn test_evaluate_budgets_overspend_caps_percent_only() {
    let mut db = Database::open_in_memory().unwrap();
    db.create_transaction(&draft("EXPENSE", "Food", "150000", "2024-03-10"), today())
        .unwrap();
    db.set_monthly_budget(category_id(&db, "Food"), Some(dec!(100000)))
        .unwrap();

    let lines = db.evaluate_budgets(2024, 3).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].spent, dec!(150000));
    assert_eq!(lines[0].percent_used, Some(dec!(100)));
    assert_eq!(lines[0].remaining, Some(dec!(-50000)));
}

#[test]
fn test_evaluate_budgets_spend_is_month_scoped() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    db.set_monthly_budget(category_id(&db, "Food"), Some(dec!(100000)))
        .unwrap();

    let march = db.evaluate_budgets(2024, 3).unwrap();
    let food = march.iter().find(|l| l.category.name == "Food").unwrap();
    assert_eq!(food.spent, dec!(75000));
    assert_eq!(food.percent_used, Some(dec!(75)));
    assert_eq!(food.remaining, Some(dec!(25000)));

    let feb = db.evaluate_budgets(2024, 2).unwrap();
    let food = feb.iter().find(|l| l.category.name == "Food").unwrap();
    assert_eq!(food.spent, dec!(80000));
    assert_eq!(food.percent_used, Some(dec!(80)));
}

#[test]
fn test_evaluate_budgets_percent_bounds() {
    let mut db = Database::open_in_memory().unwrap();
    setup_test_data(&mut db);
    db.set_monthly_budget(category_id(&db, "Food"), Some(dec!(100000)))
        .unwrap();
    db.set_monthly_budget(category_id(&db, "Transport"), Some(Decimal::ZERO))
        .unwrap();

    for line in db.evaluate_budgets(2024, 3).unwrap() {
        if let Some(pct) = line.percent_used {
            assert!(pct >= Decimal::ZERO && pct <= dec!(100));
        }
        // remaining is null exactly when no budget is configured.
        assert_eq!(line.remaining.is_none(), line.budget().is_none());
    }
}
