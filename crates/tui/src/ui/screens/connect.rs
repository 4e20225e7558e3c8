use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{app::AppState, ui::components::card::Card, ui::theme::Theme};

/// Calculates a centered rect for the connect box.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let card_area = centered_box(52, 7, area);
    frame.render_widget(Clear, card_area);

    let card = Card::new("sportello", &theme).focused(true);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    let lines = vec![
        Line::from(vec![
            Span::styled("Wallet: ", Style::default().fg(theme.dim)),
            Span::raw(state.wallet_url.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Stato:  ", Style::default().fg(theme.dim)),
            Span::raw(state.session.phase().label()),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            "Premi Invio per collegare il wallet",
            Style::default().fg(theme.accent),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    // Blocking conditions (missing wallet, refused authorization) show up
    // below the box.
    if let Some(message) = &state.connect.message {
        let message_area = Rect {
            x: area.x,
            y: card_area.y + card_area.height + 1,
            width: area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            message_area,
        );
    }
}
