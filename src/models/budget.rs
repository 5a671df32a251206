use rust_decimal::Decimal;

use super::category::Category;

/// One expense category's spend for a month, joined against its ceiling.
#[derive(Debug, Clone)]
pub struct BudgetLine {
    pub category: Category,
    pub spent: Decimal,
    /// `min(100, spent / budget * 100)`, or `None` when no usable budget is
    /// configured (absent or zero). Capped at 100 even when overspent, for
    /// progress-bar display; overspend magnitude lives in `remaining`.
    pub percent_used: Option<Decimal>,
    /// `budget - spent`, negative when overspent. `None` exactly when the
    /// budget is absent (a zero budget still yields a remaining figure).
    pub remaining: Option<Decimal>,
}

impl BudgetLine {
    pub fn evaluate(category: Category, spent: Decimal) -> Self {
        let percent_used = match category.monthly_budget {
            Some(budget) if !budget.is_zero() => {
                Some((spent / budget * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED))
            }
            _ => None,
        };
        let remaining = category.monthly_budget.map(|budget| budget - spent);

        Self {
            category,
            spent,
            percent_used,
            remaining,
        }
    }

    pub fn budget(&self) -> Option<Decimal> {
        self.category.monthly_budget
    }
}
