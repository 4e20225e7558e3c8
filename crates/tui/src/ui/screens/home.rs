use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::EntryKind;

use crate::{
    app::{AppState, EntryField, HomeMode},
    ui::{
        components::card::{Card, StatCard},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let form_height = if state.mode == HomeMode::AddEntry { 7 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),            // Stats row
            Constraint::Min(5),               // Ledger lists
            Constraint::Length(form_height),  // Entry form
        ])
        .split(area);

    render_stats(frame, layout[0], state, &theme);
    render_ledgers(frame, layout[1], state, &theme);
    if state.mode == HomeMode::AddEntry {
        render_form(frame, layout[2], state, &theme);
    }
}

fn render_stats(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    // Contract balance is a snapshot: stale until the next explicit fetch.
    let balance = state
        .balance
        .map(|balance| format!("{balance} ETH"))
        .unwrap_or_else(|| "-".to_string());
    StatCard::new("Contract Balance", balance, theme)
        .subtitle(
            state
                .last_refresh
                .map(|at| format!("refreshed {}", at.format("%H:%M:%S")))
                .unwrap_or_else(|| "never refreshed".to_string()),
        )
        .render(frame, cols[0]);

    StatCard::new(
        "Incomes",
        format!("+{}", state.ledger.total(EntryKind::Income)),
        theme,
    )
    .value_style(Style::default().fg(theme.positive))
    .render(frame, cols[1]);

    StatCard::new(
        "Expenses",
        format!("-{}", state.ledger.total(EntryKind::Expense)),
        theme,
    )
    .value_style(Style::default().fg(theme.negative))
    .render(frame, cols[2]);
}

fn render_ledgers(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    render_ledger_list(frame, cols[0], state, EntryKind::Income, "Incomes", theme);
    render_ledger_list(frame, cols[1], state, EntryKind::Expense, "Expenses", theme);
}

fn render_ledger_list(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    kind: EntryKind,
    title: &str,
    theme: &Theme,
) {
    let focused = state.list_kind == kind;
    let card = Card::new(title, theme).focused(focused);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let entries = state.ledger.entries(kind);
    if entries.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "nessuna voce",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let lines: Vec<Line<'_>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let selected = focused && index == state.selected;
            let marker = if selected { "› " } else { "  " };
            let style = if selected {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(Span::styled(
                format!("{marker}{}  {}", entry.amount, entry.description),
                style,
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("new entry", theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Kind selector
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Description
        ])
        .margin(1)
        .split(inner);

    render_kind_selector(frame, rows[0], state, theme);

    let form = &state.form;
    render_input(
        frame,
        rows[2],
        "importo",
        &form.amount,
        form.focus == EntryField::Amount,
        theme,
    );
    render_input(
        frame,
        rows[3],
        "descrizione",
        &form.description,
        form.focus == EntryField::Description,
        theme,
    );
}

fn render_kind_selector(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let selected = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let unselected = Style::default().fg(theme.dim);

    let (income_style, expense_style) = match state.form.kind {
        EntryKind::Income => (selected, unselected),
        EntryKind::Expense => (unselected, selected),
    };

    let line = Line::from(vec![
        Span::styled("● Income", income_style),
        Span::raw("   "),
        Span::styled("● Expense", expense_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders a labeled input with a cursor bar on the focused field.
fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.dim)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(theme.dim)),
        Span::styled(format!("{value}{cursor}"), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
