use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::{Category, TransactionDraft, TxKind};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit LedgerTUI", cmd_quit, r);
    register_command!("quit", "Quit LedgerTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add EXPENSE Food 50000 2024-03-15 lunch)",
        cmd_add,
        r
    );
    register_command!("a", "Add transaction (e.g. :a INCOME Salary 3000)", cmd_add, r);
    register_command!(
        "edit",
        "Replace the selected transaction (e.g. :edit EXPENSE Food 60000)",
        cmd_edit,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "budget",
        "Set a monthly ceiling (e.g. :budget Food 100000)",
        cmd_budget,
        r
    );
    register_command!(
        "clear-budget",
        "Remove a category's ceiling (e.g. :clear-budget Food)",
        cmd_clear_budget,
        r
    );
    register_command!(
        "month",
        "Filter transactions by month 1-12; no arg clears",
        cmd_month,
        r
    );
    register_command!(
        "year",
        "Filter transactions and chart by year; no arg clears",
        cmd_year,
        r
    );
    register_command!("next-month", "Budgets: view next month", cmd_next_month, r);
    register_command!("prev-month", "Budgets: view previous month", cmd_prev_month, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `<kind> <category> <amount> [yyyy-mm-dd] [note...]`. The category is a
/// single token here; multi-word categories go through the CLI.
fn parse_draft(args: &str) -> Option<TransactionDraft> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let mut draft = TransactionDraft {
        kind: parts[0].into(),
        category: parts[1].into(),
        amount: parts[2].into(),
        ..Default::default()
    };
    let mut rest: &[&str] = &parts[3..];
    if let Some(first) = rest.first() {
        if NaiveDate::parse_from_str(first, "%Y-%m-%d").is_ok() {
            draft.tx_date = (*first).into();
            rest = &rest[1..];
        }
    }
    draft.note = rest.join(" ");
    Some(draft)
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)?;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)?;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh_budgets(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(draft) = parse_draft(args) else {
        app.set_status("Usage: :add <INCOME|EXPENSE> <category> <amount> [yyyy-mm-dd] [note]");
        return Ok(());
    };

    match db.create_transaction(&draft, app.today) {
        Ok(txn) => {
            app.refresh_all(db)?;
            app.set_status(format!(
                "Added {} {} {}",
                txn.kind,
                txn.category,
                super::util::format_amount(txn.amount)
            ));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    let Some(draft) = parse_draft(args) else {
        app.set_status("Usage: :edit <INCOME|EXPENSE> <category> <amount> [yyyy-mm-dd] [note]");
        return Ok(());
    };

    let Some(id) = app.transactions.get(app.transaction_index).and_then(|t| t.id) else {
        return Ok(());
    };

    match db.update_transaction(id, &draft) {
        Ok(()) => {
            app.refresh_all(db)?;
            app.set_status(format!("Updated transaction {id}"));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.transactions.is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.transactions.get(app.transaction_index) {
        if let Some(id) = txn.id {
            let label = format!(
                "{} {} on {}",
                txn.category,
                super::util::format_amount(txn.amount),
                txn.tx_date
            );
            app.confirm_message = format!("Delete '{label}'?");
            app.pending_action = Some(PendingAction::DeleteTransaction { id, label });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :budget <category> <amount>. Example: :budget Food 100000");
        return Ok(());
    }

    // Last token is the amount, everything before is the category name
    let parts: Vec<&str> = args.rsplitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status("Usage: :budget <category> <amount>");
        return Ok(());
    }

    let amount_str = parts[0];
    let category_name = parts[1];

    let amount = match Decimal::from_str(amount_str) {
        Ok(a) => a,
        Err(_) => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    set_budget(app, db, category_name, Some(amount))
}

fn cmd_clear_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :clear-budget <category>");
        return Ok(());
    }
    set_budget(app, db, args, None)
}

fn set_budget(
    app: &mut App,
    db: &mut Database,
    category_name: &str,
    value: Option<Decimal>,
) -> anyhow::Result<()> {
    app.refresh_categories(db)?;
    let Some(cat) = Category::find_by_name(&app.categories, category_name) else {
        app.set_status(format!("Category '{category_name}' not found"));
        return Ok(());
    };
    if cat.kind != TxKind::Expense {
        app.set_status(format!("'{category_name}' is an income category; budgets apply to expenses"));
        return Ok(());
    }
    let Some(cat_id) = cat.id else {
        return Ok(());
    };
    let cat_name = cat.name.clone();

    match db.set_monthly_budget(cat_id, value) {
        Ok(()) => {
            app.refresh_budgets(db)?;
            app.screen = Screen::Budgets;
            match value {
                Some(v) => app.set_status(format!(
                    "Budget set: {cat_name} = {}",
                    super::util::format_amount(v)
                )),
                None => app.set_status(format!("Budget cleared for {cat_name}")),
            }
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.filter_month = None;
        app.screen = Screen::Transactions;
        app.refresh_transactions(db)?;
        app.set_status("Month filter cleared");
        return Ok(());
    }

    match args.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => {
            app.filter_month = Some(m);
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
            app.set_status(format!("Filtering month: {m}"));
        }
        _ => app.set_status("Month must be 1-12"),
    }
    Ok(())
}

fn cmd_year(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.filter_year = None;
        app.chart_year = None;
        app.refresh_transactions(db)?;
        app.refresh_dashboard(db)?;
        app.set_status("Year filter cleared");
        return Ok(());
    }

    match args.parse::<i32>() {
        Ok(y) if (1000..=9999).contains(&y) => {
            app.filter_year = Some(y);
            app.chart_year = Some(y);
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
            app.refresh_dashboard(db)?;
            app.set_status(format!("Filtering year: {y}"));
        }
        _ => app.set_status("Year must be a 4-digit number"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_view_month(1);
    app.refresh_budgets(db)?;
    app.set_status(format!("Budgets for {}", app.view_period()));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_view_month(-1);
    app.refresh_budgets(db)?;
    app.set_status(format!("Budgets for {}", app.view_period()));
    Ok(())
}
