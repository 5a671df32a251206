use chrono::Datelike;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Breakdown chart + monthly series
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_breakdown_chart(f, lower[0], app);
    render_monthly_series(f, lower[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_card(f, cards[0], "Income", app.summary.income, theme::GREEN);
    render_card(f, cards[1], "Expenses", app.summary.expense, theme::RED);
    render_card(
        f,
        cards[2],
        "Balance",
        app.summary.balance,
        if app.summary.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, color: ratatui::style::Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("all time", theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_breakdown_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Spending by Category ({:04}-{:02}) ",
        app.today.year(),
        app.today.month()
    );

    if app.breakdown.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title, theme::title_style()));
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses this month. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .breakdown
        .iter()
        .take(12)
        .map(|ct| {
            let val = ct.total.to_u64().unwrap_or(0);
            let label = truncate(&ct.category, 10);
            Bar::default()
                .value(val)
                .label(Line::from(label))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(title, theme::title_style())),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_monthly_series(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.chart_year {
        Some(y) => format!(" Monthly Totals ({y}) "),
        None => " Monthly Totals ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));

    if app.series.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No activity recorded yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Month", "Income", "Expenses"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let visible = area.height.saturating_sub(3) as usize;
    // Newest months at the top of the panel
    let rows: Vec<Row> = app
        .series
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, bucket)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(bucket.period.clone()),
                Cell::from(Span::styled(
                    format_amount(bucket.income),
                    theme::income_style(),
                )),
                Cell::from(Span::styled(
                    format_amount(bucket.expense),
                    theme::expense_style(),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(12),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
