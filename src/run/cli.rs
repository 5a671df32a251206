use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{Category, TransactionDraft, TxKind};
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "add" => cli_add(&args[2..], db, today),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "budgets" | "b" => cli_budgets(&args[2..], db, today),
        "set-budget" => cli_set_budget(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgertui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("LedgerTUI — local-only income and expense ledger");
    println!();
    println!("Usage: ledgertui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                          Launch interactive TUI");
    println!("  summary [year]                  All-time totals and per-month breakdown");
    println!("  list [--month M] [--year Y]     List transactions, newest first");
    println!("  add <kind> <category> <amount>  Record a transaction (kind: INCOME|EXPENSE)");
    println!("    [--date YYYY-MM-DD]           Date of the transaction (default: today)");
    println!("    [--note <text>]               Free-form note");
    println!("  edit <id> <kind> <category> <amount> [--date D] [--note N]");
    println!("                                  Replace the fields of a transaction");
    println!("  delete <id>                     Delete a transaction");
    println!("  budgets [YYYY-MM]               Budget status per expense category");
    println!("  set-budget <category> <amount>  Set a monthly ceiling ('none' clears it)");
    println!("  --help, -h                      Show this help");
    println!("  --version, -V                   Show version");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let year: Option<i32> = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| a.parse())
        .transpose()
        .map_err(|_| anyhow::anyhow!("Year must be a number"))?;

    let totals = db.global_summary()?;
    let series = db.monthly_series(year)?;

    println!("LedgerTUI — summary");
    println!("{}", "─".repeat(44));
    println!("  Income:   {}", format_amount(totals.income));
    println!("  Expenses: {}", format_amount(totals.expense));
    println!("  Balance:  {}", format_amount(totals.balance));

    if !series.is_empty() {
        println!();
        match year {
            Some(y) => println!("By month ({y}):"),
            None => println!("By month:"),
        }
        for bucket in &series {
            println!(
                "  {}  income {:>14}  expenses {:>14}",
                bucket.period,
                format_amount(bucket.income),
                format_amount(bucket.expense)
            );
        }
    }

    Ok(())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let month: Option<u32> = flag_value(args, "--month")
        .map(|v| v.parse())
        .transpose()
        .map_err(|_| anyhow::anyhow!("Month must be a number 1-12"))?;
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            anyhow::bail!("Month must be 1-12");
        }
    }
    let year: Option<i32> = flag_value(args, "--year")
        .map(|v| v.parse())
        .transpose()
        .map_err(|_| anyhow::anyhow!("Year must be a number"))?;

    let (txns, totals) = db.list_transactions(month, year)?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<5} {:<12} {:<8} {:<20} {:>14}  Note",
        "ID", "Date", "Type", "Category", "Amount"
    );
    println!("{}", "─".repeat(80));
    for txn in &txns {
        println!(
            "{:<5} {:<12} {:<8} {:<20} {:>14}  {}",
            txn.id.unwrap_or(0),
            txn.tx_date,
            txn.kind,
            txn.category,
            format_amount(txn.amount),
            txn.note,
        );
    }
    println!("{}", "─".repeat(80));
    println!(
        "income {}  expenses {}  balance {}",
        format_amount(totals.income),
        format_amount(totals.expense),
        format_amount(totals.balance)
    );

    Ok(())
}

fn draft_from_args(args: &[String]) -> Result<TransactionDraft> {
    if args.len() < 3 {
        anyhow::bail!("Expected <kind> <category> <amount>");
    }
    Ok(TransactionDraft {
        kind: args[0].clone(),
        category: args[1].clone(),
        amount: args[2].clone(),
        note: flag_value(args, "--note").unwrap_or("").to_string(),
        tx_date: flag_value(args, "--date").unwrap_or("").to_string(),
    })
}

fn cli_add(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let draft = draft_from_args(args)?;
    let txn = db.create_transaction(&draft, today)?;
    println!(
        "Added #{}: {} {} {} on {}",
        txn.id.unwrap_or(0),
        txn.kind,
        txn.category,
        format_amount(txn.amount),
        txn.tx_date
    );
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: ledgertui edit <id> <kind> <category> <amount> [--date D] [--note N]");
    }
    let id: i64 = args[0]
        .parse()
        .map_err(|_| anyhow::anyhow!("Transaction id must be a number"))?;
    let draft = draft_from_args(&args[1..])?;
    db.update_transaction(id, &draft)?;
    println!("Updated #{id}");
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: ledgertui delete <id>");
    };
    let id: i64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Transaction id must be a number"))?;
    db.delete_transaction(id)?;
    println!("Deleted #{id}");
    Ok(())
}

fn parse_period(raw: &str) -> Result<(i32, u32)> {
    let mut parts = raw.splitn(2, '-');
    let year: i32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("Period must be YYYY-MM"))?;
    let month: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| anyhow::anyhow!("Period must be YYYY-MM"))?;
    Ok((year, month))
}

fn cli_budgets(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let (year, month) = match args.first().filter(|a| !a.starts_with('-')) {
        Some(raw) => parse_period(raw)?,
        None => (today.year(), today.month()),
    };

    let lines = db.evaluate_budgets(year, month)?;
    if lines.is_empty() {
        println!("No expense categories yet");
        return Ok(());
    }

    println!("Budgets for {year:04}-{month:02}");
    println!(
        "{:<20} {:>14} {:>14} {:>8} {:>14}",
        "Category", "Spent", "Budget", "Used", "Remaining"
    );
    println!("{}", "─".repeat(74));
    for line in &lines {
        let budget = line
            .budget()
            .map(format_amount)
            .unwrap_or_else(|| "—".to_string());
        let used = line
            .percent_used
            .map(|p| format!("{p:.0}%"))
            .unwrap_or_else(|| "—".to_string());
        let remaining = line
            .remaining
            .map(format_amount)
            .unwrap_or_else(|| "—".to_string());
        println!(
            "{:<20} {:>14} {:>14} {:>8} {:>14}",
            line.category.name,
            format_amount(line.spent),
            budget,
            used,
            remaining,
        );
    }

    Ok(())
}

fn cli_set_budget(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: ledgertui set-budget <category> <amount|none>");
    }

    // Last argument is the amount so multi-word category names work unquoted
    let (amount_raw, name_parts) = args
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("Usage: ledgertui set-budget <category> <amount|none>"))?;
    let name = name_parts.join(" ");

    let value = if amount_raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(
            Decimal::from_str(amount_raw)
                .map_err(|_| anyhow::anyhow!("Invalid amount: {amount_raw}"))?,
        )
    };

    let categories = db.get_categories()?;
    let cat = Category::find_by_name(&categories, &name)
        .ok_or_else(|| anyhow::anyhow!("Category '{name}' not found"))?;
    if cat.kind != TxKind::Expense {
        anyhow::bail!("'{name}' is an income category; budgets apply to expenses");
    }
    let id = cat
        .id
        .ok_or_else(|| anyhow::anyhow!("Category '{name}' has no id"))?;

    db.set_monthly_budget(id, value)?;
    match value {
        Some(v) => println!("Budget set: {name} = {}", format_amount(v)),
        None => println!("Budget cleared for {name}"),
    }
    Ok(())
}
