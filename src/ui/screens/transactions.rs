use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Table
            Constraint::Length(4), // Totals + filter options
        ])
        .split(area);

    render_table(f, chunks[0], app);
    render_totals(f, chunks[1], app);
}

fn render_table(f: &mut Frame, area: Rect, app: &App) {
    if app.transactions.is_empty() {
        let filtered = app.filter_month.is_some() || app.filter_year.is_some();
        let msg = if filtered {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No transactions match the current filter",
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Use :month or :year with no argument to clear it",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No transactions yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add EXPENSE Food 50000",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Transactions (0) ", theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Type", "Category", "Amount", "Note"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let is_cursor = i == app.transaction_index;

            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };

            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("  {}", txn.tx_date)),
                Cell::from(txn.kind.as_str()),
                Cell::from(truncate(&txn.category, 18)),
                Cell::from(Span::styled(format_signed(txn), amount_style)),
                Cell::from(truncate(&txn.note, 40)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Transactions ({}) ", app.transactions.len()),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}

fn render_totals(f: &mut Frame, area: Rect, app: &App) {
    let totals = &app.filtered_totals;
    let balance_color = if totals.balance >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    };

    let totals_line = Line::from(vec![
        Span::styled(" Income ", theme::dim_style()),
        Span::styled(format_amount(totals.income), theme::income_style()),
        Span::styled("   Expenses ", theme::dim_style()),
        Span::styled(format_amount(totals.expense), theme::expense_style()),
        Span::styled("   Balance ", theme::dim_style()),
        Span::styled(
            format_amount(totals.balance),
            Style::default()
                .fg(balance_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let months: Vec<String> = app.months_list.iter().map(|m| m.to_string()).collect();
    let years: Vec<String> = app.years_list.iter().map(|y| y.to_string()).collect();
    let selectors_line = Line::from(Span::styled(
        format!(
            " :month [{}]   :year [{}]",
            months.join(" "),
            years.join(" ")
        ),
        theme::dim_style(),
    ));

    let panel = Paragraph::new(vec![totals_line, selectors_line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Selection Totals ", theme::title_style())),
    );
    f.render_widget(panel, area);
}
