use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{DefaultTerminal, Frame};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::routes::{resolve_stack, RouteStack};
use super::screen_trait::{Screen, ScreenId, ScreenTransition};
use super::screens;
use super::state::MessageDisplay;
use super::state_machine::ScreenStateMachine;
use super::theme::Theme;
use super::widgets::common;
use crate::config::AppConfig;
use crate::session::SessionProvider;

/// Context that screens need access to (everything except screen states)
pub struct AppContext<S: SessionProvider> {
    pub session: Arc<S>,
    pub should_quit: bool,
    pub messages: MessageDisplay,
    pub state_machine: ScreenStateMachine,
    pub theme: Theme,

    /// Stack the current screen belongs to
    pub stack: RouteStack,

    /// Frames drawn so far, drives the loading spinner
    pub tick: usize,
}

/// Container for all screen states
pub struct ScreenStates {
    pub sign_in: screens::SignInState,
    pub sign_up: screens::SignUpState,
    pub dashboard: screens::DashboardState,
}

pub struct App<S: SessionProvider> {
    pub context: AppContext<S>,
    pub states: ScreenStates,
    tick_rate: Duration,
}

impl<S: SessionProvider> App<S> {
    pub fn new(session: Arc<S>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            context: AppContext {
                session,
                should_quit: false,
                messages: MessageDisplay::new(),
                state_machine: ScreenStateMachine::default(),
                theme: config.theme,
                stack: RouteStack::Loading,
                tick: 0,
            },
            states: ScreenStates {
                sign_in: screens::SignInState::new()?,
                sign_up: screens::SignUpState::new()?,
                dashboard: screens::DashboardState::new(),
            },
            tick_rate: config.tick_rate,
        })
    }

    /// Resolve the initial stack and enter its root screen
    pub async fn start(&mut self) -> Result<()> {
        self.sync_stack().await
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.start().await?;

        while !self.context.should_quit {
            self.sync_stack().await?;
            terminal.draw(|frame| self.render(frame))?;
            self.context.tick = self.context.tick.wrapping_add(1);

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Switch stacks when the session changed. Entering a stack drops the
    /// history of the previous one.
    pub async fn sync_stack(&mut self) -> Result<()> {
        let state = self.context.session.session().await;
        let stack = resolve_stack(&state);
        if stack == self.context.stack {
            return Ok(());
        }

        info!(from = ?self.context.stack, to = ?stack, "switching navigation stack");
        if self.context.stack.root().is_some() {
            self.exit_current().await?;
        }
        self.context.stack = stack;
        if let Some(root) = stack.root() {
            self.context.state_machine.reset(root);
            self.enter_current().await?;
        }
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let context = &self.context;
        if context.stack == RouteStack::Loading {
            common::render_loading(frame, frame.area(), context.tick);
            return;
        }

        match context.state_machine.current() {
            ScreenId::SignIn => self.states.sign_in.render(frame, context),
            ScreenId::SignUp => self.states.sign_up.render(frame, context),
            ScreenId::Dashboard => self.states.dashboard.render(frame, context),
        }
        context.messages.render(frame, frame.area());
    }

    async fn enter_current(&mut self) -> Result<()> {
        let context = &mut self.context;
        let states = &mut self.states;
        match context.state_machine.current() {
            ScreenId::SignIn => states.sign_in.on_enter(context).await,
            ScreenId::SignUp => states.sign_up.on_enter(context).await,
            ScreenId::Dashboard => states.dashboard.on_enter(context).await,
        }
    }

    async fn exit_current(&mut self) -> Result<()> {
        let context = &mut self.context;
        let states = &mut self.states;
        match context.state_machine.current() {
            ScreenId::SignIn => states.sign_in.on_exit(context).await,
            ScreenId::SignUp => states.sign_up.on_exit(context).await,
            ScreenId::Dashboard => states.dashboard.on_exit(context).await,
        }
    }

    async fn handle_key_for_current_screen(&mut self, key: KeyEvent) -> Result<ScreenTransition> {
        let context = &mut self.context;
        let states = &mut self.states;
        match context.state_machine.current() {
            ScreenId::SignIn => states.sign_in.handle_key(context, key).await,
            ScreenId::SignUp => states.sign_up.handle_key(context, key).await,
            ScreenId::Dashboard => states.dashboard.handle_key(context, key).await,
        }
    }

    /// Feed one key press through the app: popups first, then the current
    /// screen, then any stack switch the session now calls for
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.context.should_quit = true;
            return Ok(());
        }

        // Any key dismisses an open popup
        if self.context.messages.has_message() {
            self.context.messages.clear();
            return Ok(());
        }

        if self.context.stack == RouteStack::Loading {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.context.should_quit = true;
            }
            return Ok(());
        }

        let transition = self.handle_key_for_current_screen(key).await?;
        debug!(?transition, "key handled");

        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::GoTo(screen_id) => {
                if self.context.stack.contains(screen_id) {
                    self.exit_current().await?;
                    self.context.state_machine.go_to(screen_id);
                    self.enter_current().await?;
                }
            }
            ScreenTransition::Back => {
                if self.context.state_machine.can_go_back() {
                    self.exit_current().await?;
                    self.context.state_machine.go_back();
                    self.enter_current().await?;
                }
            }
            ScreenTransition::Quit => {
                self.context.should_quit = true;
            }
        }

        self.sync_stack().await
    }

    pub fn current_screen(&self) -> Option<ScreenId> {
        self.context
            .stack
            .root()
            .map(|_| self.context.state_machine.current())
    }
}
