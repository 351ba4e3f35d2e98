//! Wires the overlay manager and router to the event hub.
//!
//! Neither component calls the other: the router asks for overlay changes by
//! posting [`ShellEvent::OverlayRequested`], and collaborators report state
//! changes the same way. [`Shell::dispatch`] drains the hub on the UI thread.

use std::{sync::Arc, time::Instant};

use shared::domain::OverlayKey;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::{
    clock::Clock,
    collaborators::{Location, ProjectPresence, Toolchains, WidgetPanels},
    error::ShellError,
    events::{EventHub, EventSender, ShellEvent, ShellSignal},
    overlay::{OverlayConfig, OverlayManager, OverlayTarget, UiInput},
    registry::OverlayRegistry,
    route::RouteState,
    router::{RouteTransition, Router, RouterOptions},
    surface::OverlaySurface,
};

const SIGNAL_CAPACITY: usize = 64;

pub struct ShellParts {
    pub overlay_config: OverlayConfig,
    pub router_options: RouterOptions,
    pub registry: OverlayRegistry,
    pub surface: Box<dyn OverlaySurface>,
    pub clock: Arc<dyn Clock>,
    pub location: Arc<dyn Location>,
    pub toolchains: Arc<dyn Toolchains>,
    pub widgets: Arc<dyn WidgetPanels>,
    pub project: Arc<dyn ProjectPresence>,
}

pub struct Shell {
    hub: EventHub,
    signals: broadcast::Sender<ShellSignal>,
    location: Arc<dyn Location>,
    overlay: OverlayManager,
    router: Router,
}

impl Shell {
    /// Collaborators that raise events need a sender from `hub` before the
    /// shell is built, so the hub is created by the caller.
    pub fn new(parts: ShellParts, hub: EventHub) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        let overlay = OverlayManager::new(
            parts.overlay_config,
            parts.registry,
            parts.surface,
            parts.project,
            parts.clock,
            signals.clone(),
        );
        let router = Router::new(
            parts.router_options,
            parts.location.clone(),
            parts.toolchains,
            parts.widgets,
            hub.sender(),
        );
        Self {
            hub,
            signals,
            location: parts.location,
            overlay,
            router,
        }
    }

    pub fn events(&self) -> EventSender {
        self.hub.sender()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellSignal> {
        self.signals.subscribe()
    }

    pub fn overlay(&self) -> &OverlayManager {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayManager {
        &mut self.overlay
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Reads the address bar for the first time. The route is only captured.
    pub fn start(&mut self) -> RouteTransition {
        let fragment = self.location.fragment();
        self.router.handle_fragment(&fragment)
    }

    /// Called once the page is built: shows the starting screen unless the
    /// captured URL already names a toolchain, then starts syncing the URL.
    pub fn ui_ready(&mut self) -> Result<RouteState, ShellError> {
        self.overlay
            .show(OverlayTarget::Named(OverlayKey::StartingScreen));
        let route = self.router.apply_initial_route()?;
        self.dispatch()?;
        Ok(route)
    }

    /// Drains the hub. A re-raised fault stops the drain; events still queued
    /// are handled on the next call.
    pub fn dispatch(&mut self) -> Result<usize, ShellError> {
        let mut handled = 0;
        while let Some(event) = self.hub.try_next() {
            handled += 1;
            self.handle_event(event)?;
        }
        Ok(handled)
    }

    pub fn handle_input(&mut self, input: UiInput) -> bool {
        self.overlay.handle_input(input)
    }

    pub fn poll(&mut self) -> bool {
        self.overlay.poll()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.overlay.next_deadline()
    }

    fn handle_event(&mut self, event: ShellEvent) -> Result<(), ShellError> {
        trace!(event = event.name(), "dispatching");
        match event {
            ShellEvent::HashChanged(fragment) => {
                self.router.handle_fragment(&fragment);
            }
            ShellEvent::ProjectChanged => self.overlay.handle_project_changed(),
            ShellEvent::Error(payload) => self.overlay.handle_error(payload)?,
            ShellEvent::ToolchainChanged
            | ShellEvent::WidgetExpanded(_)
            | ShellEvent::WidgetMinimized(_) => {
                if let Some(fragment) = self.router.update_url() {
                    debug!(%fragment, "url updated from state");
                }
            }
            ShellEvent::OverlayRequested(request) => self.overlay.request(request),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
