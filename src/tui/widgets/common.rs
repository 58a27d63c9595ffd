//! Layout and chrome shared by the screens.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::theme::Theme;

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Title bar, flexible content, help bar
pub fn render_screen_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .split(area);

    [chunks[0], chunks[1], chunks[2]]
}

pub fn render_title(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let widget = Paragraph::new(Span::styled(title.to_string(), theme.accent()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.dim()),
        );
    frame.render_widget(widget, area);
}

/// Help bar listing `(key, action)` pairs
pub fn render_help(frame: &mut Frame, area: Rect, items: &[(&str, &str)], theme: &Theme) {
    let spans: Vec<Span> = items
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!("[{}]", key), Style::default().fg(theme.highlight)),
                Span::raw(format!(" {}  ", desc)),
            ]
        })
        .collect();

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme.dim()));
    frame.render_widget(widget, area);
}

/// Full-screen spinner shown while the session is being restored
pub fn render_loading(frame: &mut Frame, area: Rect, tick: usize) {
    let spinner = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
    let middle = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area)[1];
    let widget = Paragraph::new(Span::styled(
        format!("{} Loading", spinner),
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(widget, middle);
}

/// Rectangle of the given percentage size centred within `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Horizontally centred column of at most `max_width` cells
pub fn centered_column(max_width: u16, r: Rect) -> Rect {
    let width = max_width.min(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        width,
        ..r
    }
}
