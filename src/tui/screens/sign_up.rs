use anyhow::{Context, Result};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use serde_json::Value;
use tracing::info;

use crate::field::{FieldController, FieldIcon};
use crate::form::{
    EmailFormatValidator, FormScope, MinLengthValidator, NonEmptyValidator, ValidationSchema,
};
use crate::session::{SessionProvider, SignUpData};
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::state::FocusCycle;
use crate::tui::widgets::text_input::{email_filter, no_whitespace_filter};
use crate::tui::widgets::{common, Button, FieldGroup, GroupAction};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 6;

const FORM_WIDTH: u16 = 50;

pub struct SignUpState {
    pub form: FieldGroup,
    schema: ValidationSchema,
}

impl SignUpState {
    pub fn new() -> Result<Self> {
        let form = FieldGroup::new(
            FormScope::new(),
            vec![
                FieldController::new("name", "user").with_placeholder("Name"),
                FieldController::new("email", "mail")
                    .with_placeholder("E-mail")
                    .with_filter(email_filter),
                FieldController::new("password", "lock")
                    .with_placeholder("Password")
                    .with_filter(no_whitespace_filter)
                    .masked(),
            ],
            Button::new("Sign up"),
        )
        .context("failed to mount sign-up form")?;

        let schema = ValidationSchema::new()
            .field("name", vec![Box::new(NonEmptyValidator::new("Name is required"))])
            .field(
                "email",
                vec![
                    Box::new(NonEmptyValidator::new("E-mail is required")),
                    Box::new(EmailFormatValidator),
                ],
            )
            .field("password", vec![Box::new(MinLengthValidator::new(MIN_PASSWORD_LEN))]);

        Ok(Self { form, schema })
    }

    async fn submit<S: SessionProvider>(&mut self, context: &mut AppContext<S>) -> Result<ScreenTransition> {
        let data = match self.form.submit(&self.schema).await {
            Ok(data) => data,
            Err(errors) => {
                info!(failures = errors.len(), "sign-up form has errors");
                return Ok(ScreenTransition::Stay);
            }
        };
        let payload: SignUpData = serde_json::from_value(Value::Object(data))
            .context("sign-up form produced unexpected data")?;

        match context.session.sign_up(payload).await {
            Ok(user) => {
                context
                    .messages
                    .set_success(format!("Account created for {}. You can sign in now.", user.email));
                self.form.reset()?;
                Ok(ScreenTransition::Back)
            }
            Err(err) => {
                context.messages.set_error(err.to_string());
                Ok(ScreenTransition::Stay)
            }
        }
    }
}

#[async_trait]
impl<S: SessionProvider> Screen<S> for SignUpState {
    fn render(&self, frame: &mut Frame, context: &AppContext<S>) {
        let theme = &context.theme;
        let [title, content, help] = common::render_screen_layout(frame.area());
        common::render_title(frame, title, "Create your account", theme);

        let column = common::centered_column(FORM_WIDTH, content);
        let parts = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(column);
        self.form.render(frame, parts[1], theme);

        let back = Line::from(vec![
            Span::styled(FieldIcon::new("arrow-left").glyph(), theme.accent()),
            Span::raw(" Back to sign in"),
        ]);
        frame.render_widget(Paragraph::new(back), parts[2]);

        common::render_help(
            frame,
            help,
            &[("Tab", "Next"), ("Enter", "Sign up"), ("Esc", "Back")],
            theme,
        );
    }

    async fn handle_key(&mut self, context: &mut AppContext<S>, key: KeyEvent) -> Result<ScreenTransition> {
        if key.code == KeyCode::Esc {
            return Ok(ScreenTransition::Back);
        }
        match self.form.handle_key(key)? {
            GroupAction::Submit => self.submit(context).await,
            GroupAction::Handled | GroupAction::Ignored => Ok(ScreenTransition::Stay),
        }
    }

    async fn on_enter(&mut self, _context: &mut AppContext<S>) -> Result<()> {
        self.form.reset()?;
        self.form.focus_first();
        Ok(())
    }

    async fn on_exit(&mut self, _context: &mut AppContext<S>) -> Result<()> {
        self.form.blur_all();
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::SignUp
    }
}
