use anyhow::Result;
use chrono::{Datelike, NaiveDate};

use crate::db::Database;
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions, Self::Budgets]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, label: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// The evaluation instant, captured once at startup. Everything that
    /// needs "now" (current-month breakdown, date defaults, empty-selector
    /// fallbacks) reads this field, never the system clock.
    pub(crate) today: NaiveDate,

    // Dashboard
    pub(crate) summary: Totals,
    pub(crate) series: Vec<MonthlyBucket>,
    pub(crate) breakdown: Vec<CategoryTotal>,
    pub(crate) chart_year: Option<i32>,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) filtered_totals: Totals,
    pub(crate) filter_month: Option<u32>,
    pub(crate) filter_year: Option<i32>,
    pub(crate) months_list: Vec<u32>,
    pub(crate) years_list: Vec<i32>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Budgets
    pub(crate) budget_lines: Vec<BudgetLine>,
    pub(crate) budget_index: usize,
    pub(crate) view_year: i32,
    pub(crate) view_month: u32,

    // Categories, for name -> id lookups in commands
    pub(crate) categories: Vec<Category>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            today,

            summary: Totals::default(),
            series: Vec::new(),
            breakdown: Vec::new(),
            chart_year: None,

            transactions: Vec::new(),
            filtered_totals: Totals::default(),
            filter_month: None,
            filter_year: None,
            months_list: Vec::new(),
            years_list: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            budget_lines: Vec::new(),
            budget_index: 0,
            view_year: today.year(),
            view_month: today.month(),

            categories: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        self.summary = db.global_summary()?;
        self.series = db.monthly_series(self.chart_year)?;
        self.breakdown = db
            .category_breakdown(self.today.year(), self.today.month())?;
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let (txns, totals) = db.list_transactions(self.filter_month, self.filter_year)?;
        self.transactions = txns;
        self.filtered_totals = totals;
        let (months, years) = db.available_months_years(self.today)?;
        self.months_list = months;
        self.years_list = years;
        if self.transaction_index >= self.transactions.len() && !self.transactions.is_empty() {
            self.transaction_index = self.transactions.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_budgets(&mut self, db: &Database) -> Result<()> {
        self.budget_lines = db.evaluate_budgets(self.view_year, self.view_month)?;
        if self.budget_index >= self.budget_lines.len() && !self.budget_lines.is_empty() {
            self.budget_index = self.budget_lines.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories()?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?;
        self.refresh_transactions(db)?;
        self.refresh_budgets(db)?;
        self.refresh_categories(db)?;
        Ok(())
    }

    /// "YYYY-MM" label of the month the Budgets screen is viewing.
    pub(crate) fn view_period(&self) -> String {
        format!("{:04}-{:02}", self.view_year, self.view_month)
    }

    /// Shift the budget view month by one in either direction.
    pub(crate) fn shift_view_month(&mut self, delta: i32) {
        let base = NaiveDate::from_ymd_opt(self.view_year, self.view_month, 1);
        let shifted = base.and_then(|d| {
            if delta > 0 {
                d.checked_add_months(chrono::Months::new(1))
            } else {
                d.checked_sub_months(chrono::Months::new(1))
            }
        });
        if let Some(d) = shifted {
            self.view_year = d.year();
            self.view_month = d.month();
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
