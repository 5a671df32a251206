use rust_decimal::Decimal;

use super::transaction::TxKind;

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    /// Unique, case-sensitive, stored trimmed.
    pub name: String,
    pub kind: TxKind,
    /// Standing monthly ceiling; `None` means no budget configured,
    /// which is distinct from a budget of zero.
    pub monthly_budget: Option<Decimal>,
}

impl Category {
    pub fn new(name: String, kind: TxKind) -> Self {
        Self {
            id: None,
            name,
            kind,
            monthly_budget: None,
        }
    }

    /// Find a category by exact name in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
