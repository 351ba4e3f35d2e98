//! Headless host: owns the shell and its in-memory collaborators, and turns
//! stdin commands into events and overlay calls.

use std::{sync::Arc, time::Instant};

use shared::error::{ApiError, ClientFault, ErrorCode, ErrorPayload, ResponseFailure};
use shell_core::{
    overlay::ESCAPE_KEY_CODE, Clock, EventHub, HeadlessSurface, Location, OverlayState,
    OverlayTarget, RenderOptions, RenderTarget, Shell, ShellError, ShellEvent, ShellParts,
    ShellSignal, Toolchains, UiInput, WidgetPanels,
};
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::{commands::Command, config::Settings, views, workspace::Workspace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Print(String),
    Quit,
}

pub struct App {
    shell: Shell,
    workspace: Arc<Workspace>,
    surface: HeadlessSurface,
}

impl App {
    pub fn new(settings: &Settings, fragment: &str, clock: Arc<dyn Clock>) -> Self {
        let hub = EventHub::new();
        let workspace = Arc::new(Workspace::new(hub.sender(), fragment));
        let surface = HeadlessSurface::new();
        let shell = Shell::new(
            ShellParts {
                overlay_config: settings.overlay_config(),
                router_options: settings.router_options(),
                registry: views::placeholder_registry(),
                surface: Box::new(surface.clone()),
                clock,
                location: workspace.clone(),
                toolchains: workspace.clone(),
                widgets: workspace.clone(),
                project: workspace.clone(),
            },
            hub,
        );
        Self {
            shell,
            workspace,
            surface,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellSignal> {
        self.shell.subscribe()
    }

    /// Captures the startup URL, then brings the UI up.
    pub fn start(&mut self) -> Result<(), ShellError> {
        let transition = self.shell.start();
        debug!(?transition, "startup route observed");
        let route = self.shell.ui_ready()?;
        debug!(toolchain = ?route.toolchain_id, "ui ready");
        Ok(())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.shell.next_deadline()
    }

    /// Runs due timers and drains whatever they queued.
    pub fn tick(&mut self) -> Result<bool, ShellError> {
        let ran = self.shell.poll();
        for op in self.surface.take_ops() {
            trace!(?op, "surface");
        }
        self.shell.dispatch()?;
        Ok(ran)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, ShellError> {
        let outcome = match command {
            Command::Navigate(fragment) => {
                self.workspace.user_navigate(&fragment);
                Outcome::Continue
            }
            Command::Switch(id) => {
                self.workspace.switch_to(id);
                Outcome::Continue
            }
            Command::Expand(name) => {
                self.workspace.expand_widget(&name);
                Outcome::Continue
            }
            Command::Minimize(name) => {
                self.workspace.minimize_widget(&name);
                Outcome::Continue
            }
            Command::Show(key) => {
                self.shell.overlay_mut().show(OverlayTarget::Named(key));
                Outcome::Continue
            }
            Command::Hide => {
                self.shell.overlay_mut().hide();
                Outcome::Continue
            }
            Command::Keep => {
                self.shell
                    .overlay_mut()
                    .render(RenderTarget::Keep, RenderOptions::default());
                Outcome::Continue
            }
            Command::Screen(kind, message) => {
                self.shell.overlay_mut().render_screen(kind, &message);
                Outcome::Continue
            }
            Command::ServerError { status, message } => {
                self.shell
                    .events()
                    .send(ShellEvent::Error(ErrorPayload::Response(response_failure(
                        status, message,
                    ))));
                Outcome::Continue
            }
            Command::Fault(message) => {
                self.shell
                    .events()
                    .send(ShellEvent::Error(ErrorPayload::fault(ClientFault::new(
                        "Error", message,
                    ))));
                Outcome::Continue
            }
            Command::Escape => self.input(UiInput::KeyUp {
                key_code: ESCAPE_KEY_CODE,
            }),
            Command::ClickBackground => self.input(UiInput::Click { on_root: true }),
            Command::ClickClose => self.input(UiInput::CloseButtonClick),
            Command::Link(folder) => Outcome::Print(self.shell.router().toolchain_link(&folder)),
            Command::State => Outcome::Print(self.status()),
            Command::Quit => return Ok(Outcome::Quit),
        };
        self.shell.dispatch()?;
        Ok(outcome)
    }

    fn input(&mut self, input: UiInput) -> Outcome {
        if !self.shell.handle_input(input) {
            debug!(?input, "input ignored");
        }
        Outcome::Continue
    }

    pub fn status(&self) -> String {
        let toolchain = self
            .workspace
            .current_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        let widgets = self
            .workspace
            .current_widget_names()
            .into_iter()
            .collect::<Vec<_>>()
            .join(",");
        let overlay = match self.shell.overlay().state() {
            OverlayState::Hidden => "hidden".to_string(),
            OverlayState::Visible(target) => target.label(),
        };
        format!(
            "fragment=#{} toolchain={} widgets=[{}] overlay={} displayed={}",
            self.workspace.fragment(),
            toolchain,
            widgets,
            overlay,
            self.surface.is_displayed(),
        )
    }
}

fn response_failure(status: u16, message: String) -> ResponseFailure {
    if message.is_empty() {
        return ResponseFailure::new(status, None);
    }
    let code = match status {
        400 | 422 => ErrorCode::Validation,
        401 => ErrorCode::Unauthorized,
        403 => ErrorCode::Forbidden,
        404 => ErrorCode::NotFound,
        429 => ErrorCode::RateLimited,
        _ => ErrorCode::Internal,
    };
    ResponseFailure::with_api_error(status, &ApiError::new(code, message))
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
