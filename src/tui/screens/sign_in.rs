use anyhow::{Context, Result};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::field::{FieldController, FieldIcon};
use crate::form::{EmailFormatValidator, FormScope, NonEmptyValidator, ValidationSchema};
use crate::session::{SessionProvider, SignInData};
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::state::FocusCycle;
use crate::tui::widgets::text_input::{email_filter, no_whitespace_filter};
use crate::tui::widgets::{common, Button, FieldGroup, GroupAction};

const FORM_WIDTH: u16 = 50;

pub struct SignInState {
    pub form: FieldGroup,
    schema: ValidationSchema,
}

impl SignInState {
    pub fn new() -> Result<Self> {
        let form = FieldGroup::new(
            FormScope::new(),
            vec![
                FieldController::new("email", "mail")
                    .with_placeholder("E-mail")
                    .with_filter(email_filter),
                FieldController::new("password", "lock")
                    .with_placeholder("Password")
                    .with_filter(no_whitespace_filter)
                    .masked(),
            ],
            Button::new("Sign in"),
        )
        .context("failed to mount sign-in form")?;

        let schema = ValidationSchema::new()
            .field(
                "email",
                vec![
                    Box::new(NonEmptyValidator::new("E-mail is required")),
                    Box::new(EmailFormatValidator),
                ],
            )
            .field("password", vec![Box::new(NonEmptyValidator::new("Password is required"))]);

        Ok(Self { form, schema })
    }

    async fn submit<S: SessionProvider>(&mut self, context: &mut AppContext<S>) -> Result<ScreenTransition> {
        let Ok(data) = self.form.submit(&self.schema).await else {
            return Ok(ScreenTransition::Stay);
        };
        let credentials: SignInData = serde_json::from_value(Value::Object(data))
            .context("sign-in form produced unexpected data")?;

        match context.session.sign_in(credentials).await {
            Ok(user) => {
                info!("signed in as {}", user.email);
                self.form.reset()?;
            }
            Err(err) => {
                warn!("sign-in failed: {}", err);
                context.messages.set_error(err.to_string());
            }
        }
        // The navigation switch picks up the new session on its own
        Ok(ScreenTransition::Stay)
    }
}

#[async_trait]
impl<S: SessionProvider> Screen<S> for SignInState {
    fn render(&self, frame: &mut Frame, context: &AppContext<S>) {
        let theme = &context.theme;
        let [title, content, help] = common::render_screen_layout(frame.area());
        common::render_title(frame, title, "Sign in", theme);

        let column = common::centered_column(FORM_WIDTH, content);
        let parts = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(column);
        self.form.render(frame, parts[1], theme);

        let link = Line::from(vec![
            Span::styled(FieldIcon::new("log-in").glyph(), theme.accent()),
            Span::raw(" No account yet? "),
            Span::styled("Create account (Ctrl+N)", theme.accent()),
        ]);
        frame.render_widget(Paragraph::new(link), parts[2]);

        common::render_help(
            frame,
            help,
            &[("Tab", "Next"), ("Enter", "Sign in"), ("Ctrl+N", "Sign up"), ("Esc", "Quit")],
            theme,
        );
    }

    async fn handle_key(&mut self, context: &mut AppContext<S>, key: KeyEvent) -> Result<ScreenTransition> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('n') {
            return Ok(ScreenTransition::GoTo(ScreenId::SignUp));
        }
        if key.code == KeyCode::Esc {
            return Ok(ScreenTransition::Quit);
        }
        match self.form.handle_key(key)? {
            GroupAction::Submit => self.submit(context).await,
            GroupAction::Handled | GroupAction::Ignored => Ok(ScreenTransition::Stay),
        }
    }

    async fn on_enter(&mut self, _context: &mut AppContext<S>) -> Result<()> {
        self.form.focus_first();
        Ok(())
    }

    async fn on_exit(&mut self, _context: &mut AppContext<S>) -> Result<()> {
        self.form.blur_all();
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::SignIn
    }
}
