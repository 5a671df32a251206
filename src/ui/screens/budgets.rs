use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budget_lines.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let items: Vec<ListItem> = app
        .budget_lines
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, line)| {
            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let display_name = truncate(&line.category.name, 17);

            let Some(budget) = line.budget() else {
                return ListItem::new(Line::from(vec![
                    Span::styled(format!("{display_name:<18}"), style),
                    Span::styled(
                        format!("{} spent ", format_amount(line.spent)),
                        theme::normal_style(),
                    ),
                    Span::styled("(no budget set)", theme::dim_style()),
                ]));
            };

            let ratio = line
                .percent_used
                .and_then(|p| (p / Decimal::ONE_HUNDRED).to_f64())
                .unwrap_or(0.0);

            let color = if ratio > 0.9 {
                theme::RED
            } else if ratio > 0.7 {
                theme::YELLOW
            } else {
                theme::GREEN
            };

            let bar = create_progress_bar(ratio, 20);

            let remaining = line
                .remaining
                .map(|r| format!(" {} left", format_amount(r)))
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(format!("{display_name:<18}"), style),
                Span::styled(
                    format!("{}/{} ", format_amount(line.spent), format_amount(budget)),
                    Style::default().fg(color),
                ),
                Span::styled(bar, Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}%", ratio * 100.0),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(remaining, theme::dim_style()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Budgets for {} ", app.view_period()),
                theme::title_style(),
            )),
    );
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No expense categories yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Categories appear here after their first expense; set a ceiling with :budget",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Budgets for {} ", app.view_period()),
                theme::title_style(),
            )),
    );
    f.render_widget(msg, area);
}

fn create_progress_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
