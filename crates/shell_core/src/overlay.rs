//! The single full-screen modal view slot.
//!
//! Every visibility change goes through [`OverlayManager::render`], which is
//! debounced: only the last call of a burst runs, once the host calls
//! [`OverlayManager::poll`] after the quiet period. Hiding fades out and
//! finishes on a second timer; that timer is never cancelled and instead
//! re-checks the manager state when it fires.

use std::{
    collections::BTreeSet,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use shared::{domain::OverlayKey, error::ErrorPayload};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::{
    clock::Clock,
    collaborators::ProjectPresence,
    debounce::Debouncer,
    error::ShellError,
    events::ShellSignal,
    registry::{OverlayRegistry, OverlayView, ViewConstructor, ViewContext},
    screens::{screen_markup, ScreenKind, SupportLinks},
    surface::{DismissListener, OverlaySurface, CLOSE_AFFORDANCE_ID},
};

pub const ESCAPE_KEY_CODE: u32 = 27;
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error; maybe the logs contain some clues";
const STARTING_SCREEN: OverlayKey = OverlayKey::StartingScreen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    pub debounce: Duration,
    pub fade: Duration,
    /// Delay before a faded-out overlay is actually taken down.
    pub fade_settle: Duration,
    pub support_links: SupportLinks,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            fade: Duration::from_millis(400),
            fade_settle: Duration::from_millis(500),
            support_links: SupportLinks::default(),
        }
    }
}

#[derive(Clone)]
pub enum OverlayTarget {
    Named(OverlayKey),
    RawContent(String),
    ViewInstance(ViewConstructor),
}

impl OverlayTarget {
    pub fn label(&self) -> String {
        match self {
            OverlayTarget::Named(key) => key.name().to_string(),
            OverlayTarget::RawContent(_) => "raw-content".to_string(),
            OverlayTarget::ViewInstance(constructor) => constructor.name().to_string(),
        }
    }
}

impl PartialEq for OverlayTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OverlayTarget::Named(a), OverlayTarget::Named(b)) => a == b,
            (OverlayTarget::RawContent(a), OverlayTarget::RawContent(b)) => a == b,
            (OverlayTarget::ViewInstance(a), OverlayTarget::ViewInstance(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl fmt::Debug for OverlayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayTarget::Named(key) => f.debug_tuple("Named").field(key).finish(),
            OverlayTarget::RawContent(markup) => {
                f.debug_tuple("RawContent").field(&markup.len()).finish()
            }
            OverlayTarget::ViewInstance(constructor) => f
                .debug_tuple("ViewInstance")
                .field(&constructor.name())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    /// Re-render whatever is mounted.
    Keep,
    Hide,
    Show(OverlayTarget),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub no_fade: bool,
}

impl RenderOptions {
    pub fn no_fade() -> Self {
        Self { no_fade: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub target: RenderTarget,
    pub options: RenderOptions,
}

impl RenderRequest {
    pub fn hide() -> Self {
        Self {
            target: RenderTarget::Hide,
            options: RenderOptions::default(),
        }
    }

    pub fn show(target: OverlayTarget) -> Self {
        Self {
            target: RenderTarget::Show(target),
            options: RenderOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    Hidden,
    Visible(OverlayTarget),
}

/// Raw input delivered to the overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiInput {
    CloseButtonClick,
    /// `on_root` is true only when the click target is the overlay element itself.
    Click { on_root: bool },
    KeyUp { key_code: u32 },
}

#[derive(Debug, Clone, Copy)]
struct FadeOut {
    at: Instant,
    generation: u64,
}

pub struct OverlayManager {
    config: OverlayConfig,
    registry: OverlayRegistry,
    surface: Box<dyn OverlaySurface>,
    project: Arc<dyn ProjectPresence>,
    clock: Arc<dyn Clock>,
    signals: broadcast::Sender<ShellSignal>,
    state: OverlayState,
    view: Option<Box<dyn OverlayView>>,
    listeners: BTreeSet<DismissListener>,
    pending: Debouncer<RenderRequest>,
    fade_out: Option<FadeOut>,
    generation: u64,
}

impl OverlayManager {
    pub fn new(
        config: OverlayConfig,
        registry: OverlayRegistry,
        surface: Box<dyn OverlaySurface>,
        project: Arc<dyn ProjectPresence>,
        clock: Arc<dyn Clock>,
        signals: broadcast::Sender<ShellSignal>,
    ) -> Self {
        let pending = Debouncer::new(config.debounce);
        Self {
            config,
            registry,
            surface,
            project,
            clock,
            signals,
            state: OverlayState::Hidden,
            view: None,
            listeners: BTreeSet::new(),
            pending,
            fade_out: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, OverlayState::Visible(_))
    }

    pub fn current_target(&self) -> Option<&OverlayTarget> {
        match &self.state {
            OverlayState::Visible(target) => Some(target),
            OverlayState::Hidden => None,
        }
    }

    pub fn has_mounted_view(&self) -> bool {
        self.view.is_some()
    }

    pub fn attached_listeners(&self) -> &BTreeSet<DismissListener> {
        &self.listeners
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    /// Queues a render; a later call inside the debounce window replaces it.
    pub fn render(&mut self, target: RenderTarget, options: RenderOptions) {
        let now = self.clock.now();
        let superseded = self.pending.call(RenderRequest { target, options }, now);
        if superseded {
            debug!("overlay render superseded by a newer request");
        }
    }

    pub fn request(&mut self, request: RenderRequest) {
        self.render(request.target, request.options);
    }

    pub fn show(&mut self, target: OverlayTarget) {
        self.render(RenderTarget::Show(target), RenderOptions::default());
    }

    pub fn hide(&mut self) {
        self.render(RenderTarget::Hide, RenderOptions::default());
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let fade = self.fade_out.map(|fade| fade.at);
        match (self.pending.deadline(), fade) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Runs whatever timers are due. Returns true if anything ran.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        let mut ran = false;

        if let Some(fade) = self.fade_out.filter(|fade| fade.at <= now) {
            self.fade_out = None;
            self.finish_fade_out(fade);
            ran = true;
        }

        if let Some(request) = self.pending.take_due(now) {
            self.execute(request);
            ran = true;
        }

        ran
    }

    /// What every dismissal path does: hide when there is something to go
    /// back to, otherwise show the starting screen.
    pub fn close_overlay(&mut self) {
        if self.project.has_project() {
            self.hide();
        } else {
            self.show(OverlayTarget::Named(STARTING_SCREEN));
        }
    }

    /// Routes input to the attached dismissal listeners. Returns true when a
    /// listener fired.
    pub fn handle_input(&mut self, input: UiInput) -> bool {
        let listener = match input {
            UiInput::CloseButtonClick => DismissListener::CloseButton,
            UiInput::Click { on_root: true } => DismissListener::BackgroundClick,
            UiInput::KeyUp {
                key_code: ESCAPE_KEY_CODE,
            } => DismissListener::EscapeKey,
            UiInput::Click { on_root: false } | UiInput::KeyUp { .. } => return false,
        };
        if !self.listeners.contains(&listener) {
            return false;
        }
        debug!(?listener, "overlay dismissed");
        self.close_overlay();
        true
    }

    pub fn handle_project_changed(&mut self) {
        if !self.project.has_project() {
            self.show(OverlayTarget::Named(STARTING_SCREEN));
        }
    }

    /// Shows the fatal error screen for `payload`. Genuine faults come back
    /// as `Err` once the screen has been requested.
    pub fn handle_error(&mut self, payload: ErrorPayload) -> Result<(), ShellError> {
        let payload = payload.normalized();
        let message = match &payload {
            ErrorPayload::Response(failure) => failure.server_message().map(str::to_owned),
            ErrorPayload::Fault(fault) => Some(fault.to_string()),
            ErrorPayload::Batch(_) | ErrorPayload::Opaque(_) => None,
        };
        let message = message.unwrap_or_else(|| {
            warn!(payload = ?payload, "unknown error payload");
            UNKNOWN_ERROR_MESSAGE.to_string()
        });

        self.render_screen(ScreenKind::ReallyBadError, &message);

        match payload {
            ErrorPayload::Fault(fault) => {
                debug!(error = %fault, "re-raising fault after requesting the error overlay");
                Err(ShellError::Fault(fault))
            }
            _ => Ok(()),
        }
    }

    pub fn render_screen(&mut self, kind: ScreenKind, message: &str) {
        let markup = screen_markup(kind, message, &self.config.support_links);
        self.show(OverlayTarget::RawContent(markup));
    }

    pub fn render_loading_screen(&mut self, message: &str) {
        self.render_screen(ScreenKind::Loading, message);
    }

    pub fn render_error_screen(&mut self, message: &str) {
        self.render_screen(ScreenKind::Error, message);
    }

    pub fn render_user_error_screen(&mut self, message: &str) {
        self.render_screen(ScreenKind::UserError, message);
    }

    pub fn render_really_bad_error_screen(&mut self, message: &str) {
        self.render_screen(ScreenKind::ReallyBadError, message);
    }

    pub fn render_success_screen(&mut self, message: &str) {
        self.render_screen(ScreenKind::Success, message);
    }

    fn execute(&mut self, request: RenderRequest) {
        let RenderRequest { target, options } = request;
        match target {
            RenderTarget::Keep => self.rerender(),
            RenderTarget::Hide if !self.project.has_project() => {
                debug!("no project loaded; showing the starting screen instead of hiding");
                self.transition_to(OverlayTarget::Named(STARTING_SCREEN), options);
            }
            RenderTarget::Hide => match self.state {
                OverlayState::Hidden => self.rerender(),
                OverlayState::Visible(_) => self.begin_hide(options),
            },
            RenderTarget::Show(target) => self.transition_to(target, options),
        }
    }

    fn rerender(&mut self) {
        if let Some(view) = self.view.as_mut() {
            let markup = view.render();
            self.surface.set_markup(&markup);
        }
    }

    fn transition_to(&mut self, target: OverlayTarget, options: RenderOptions) {
        if self.current_target() == Some(&target) {
            self.rerender();
            return;
        }
        // Swapping one overlay for another does not fade.
        let no_fade = options.no_fade || self.is_visible();

        self.surface.clear();
        self.view = None;
        self.generation += 1;

        match &target {
            OverlayTarget::ViewInstance(constructor) => self.mount(constructor.clone()),
            OverlayTarget::Named(key) => match self.registry.get(*key).cloned() {
                Some(constructor) => self.mount(constructor),
                None => {
                    error!(overlay = %key, "overlay view is not registered");
                    let markup = screen_markup(
                        ScreenKind::Error,
                        &format!("The {key} view is not available."),
                        &self.config.support_links,
                    );
                    self.surface.set_markup(&markup);
                }
            },
            OverlayTarget::RawContent(markup) => self.surface.set_markup(markup),
        }

        if self.surface.contains_element(CLOSE_AFFORDANCE_ID) {
            self.attach_close_listeners();
        } else {
            // Nothing may dismiss this one; the user has to act inside it.
            self.detach_close_listeners();
        }

        self.surface.set_displayed(true);
        if no_fade {
            self.surface.set_opacity(1.0);
        } else {
            self.surface.fade(0.0, 1.0, self.config.fade);
        }

        debug!(overlay = %target.label(), no_fade, "overlay shown");
        let label = target.label();
        self.state = OverlayState::Visible(target);
        self.notify(true, Some(label));
    }

    fn mount(&mut self, constructor: ViewConstructor) {
        let mut view = constructor.instantiate(&ViewContext::headless());
        let markup = view.render();
        self.surface.set_markup(&markup);
        self.view = Some(view);
    }

    fn begin_hide(&mut self, options: RenderOptions) {
        self.detach_close_listeners();
        self.state = OverlayState::Hidden;
        self.generation += 1;

        if options.no_fade {
            self.take_down();
        } else {
            self.surface.fade(1.0, 0.0, self.config.fade);
            self.fade_out = Some(FadeOut {
                at: self.clock.now() + self.config.fade_settle,
                generation: self.generation,
            });
        }

        debug!(no_fade = options.no_fade, "overlay hidden");
        self.notify(false, None);
    }

    fn finish_fade_out(&mut self, fade: FadeOut) {
        if self.is_visible() || fade.generation != self.generation {
            debug!("ignoring stale fade-out completion");
            return;
        }
        self.take_down();
    }

    fn take_down(&mut self) {
        self.surface.set_displayed(false);
        self.surface.clear();
        self.view = None;
    }

    fn attach_close_listeners(&mut self) {
        for listener in DismissListener::ALL {
            if self.listeners.insert(listener) {
                self.surface.attach(listener);
            }
        }
    }

    fn detach_close_listeners(&mut self) {
        for listener in std::mem::take(&mut self.listeners) {
            self.surface.detach(listener);
        }
    }

    fn notify(&self, visible: bool, label: Option<String>) {
        // No subscribers is fine.
        let _ = self
            .signals
            .send(ShellSignal::OverlayChanged { visible, label });
    }
}

#[cfg(test)]
#[path = "tests/overlay_tests.rs"]
mod tests;
