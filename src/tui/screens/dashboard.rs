use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::info;

use crate::field::FieldIcon;
use crate::session::{SessionProvider, User};
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::widgets::common;

/// Landing screen of the signed-in stack
#[derive(Debug, Default)]
pub struct DashboardState {
    pub user: Option<User>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<S: SessionProvider> Screen<S> for DashboardState {
    fn render(&self, frame: &mut Frame, context: &AppContext<S>) {
        let theme = &context.theme;
        let [title, content, help] = common::render_screen_layout(frame.area());
        common::render_title(frame, title, "Dashboard", theme);

        let column = common::centered_column(50, content);
        let card = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .split(column)[1];

        let lines = match &self.user {
            Some(user) => vec![
                Line::from(Span::styled(format!("Welcome, {}", user.name), theme.accent())),
                Line::from(Span::styled(user.email.clone(), theme.dim())),
            ],
            None => vec![Line::from("Not signed in")],
        };
        let widget = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(theme.dim()));
        frame.render_widget(widget, card);

        let sign_out = format!("{} Sign out", FieldIcon::new("log-out").glyph());
        common::render_help(frame, help, &[("s", sign_out.as_str()), ("q", "Quit")], theme);
    }

    async fn handle_key(&mut self, context: &mut AppContext<S>, key: KeyEvent) -> Result<ScreenTransition> {
        match key.code {
            KeyCode::Char('s') => {
                context.session.sign_out().await?;
                info!("signed out");
                self.user = None;
                Ok(ScreenTransition::Stay)
            }
            KeyCode::Char('q') | KeyCode::Esc => Ok(ScreenTransition::Quit),
            _ => Ok(ScreenTransition::Stay),
        }
    }

    async fn on_enter(&mut self, context: &mut AppContext<S>) -> Result<()> {
        self.user = context.session.session().await.user;
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::Dashboard
    }
}
