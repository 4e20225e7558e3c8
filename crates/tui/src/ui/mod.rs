pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ethers_core::types::Address;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, HomeMode, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Connect => screens::connect::render(frame, area, state),
        Screen::Home => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    screens::home::render(frame, layout[1], state);
    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let account = state
        .session
        .account()
        .map(short_address)
        .unwrap_or_else(|| "-".to_string());
    let refresh = state
        .last_refresh
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled("Account", Style::default().fg(theme.dim)),
        Span::raw(format!(": {account}  ")),
        Span::styled("Session", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.session.phase().label())),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled("Wallet", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}", state.wallet_url)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints: &[(&str, &str)] = if state.mode == HomeMode::AddEntry {
        &[
            ("Tab", "next field"),
            ("←/→", "kind"),
            ("Enter", "save"),
            ("Esc", "cancel"),
        ]
    } else {
        &[
            ("d", "deposit"),
            ("w", "withdraw"),
            ("r", "refresh"),
            ("a", "add entry"),
            ("x", "remove"),
            ("Tab", "switch list"),
            ("q", "quit"),
        ]
    };

    let mut parts: Vec<Span<'_>> = Vec::new();
    for (index, (key, action)) in hints.iter().enumerate() {
        if index > 0 {
            parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        parts.push(Span::styled(*key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn short_address(address: Address) -> String {
    let hex = format!("{address:?}");
    format!("{}…{}", &hex[..6], &hex[hex.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_keeps_head_and_tail() {
        let address: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            .parse()
            .unwrap();
        assert_eq!(short_address(address), "0x5fbd…0aa3");
    }
}
