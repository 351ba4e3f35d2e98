//! Typed event hub shared by the shell's components and its collaborators.

use crossbeam_channel::{unbounded, Receiver, Sender};
use shared::error::ErrorPayload;
use tracing::warn;

use crate::overlay::RenderRequest;

/// Events the shell consumes.
#[derive(Debug)]
pub enum ShellEvent {
    /// The address-bar fragment changed (user navigation or a triggered navigate).
    HashChanged(String),
    ProjectChanged,
    Error(ErrorPayload),
    ToolchainChanged,
    WidgetExpanded(String),
    WidgetMinimized(String),
    OverlayRequested(RenderRequest),
}

impl ShellEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ShellEvent::HashChanged(_) => "hash_changed",
            ShellEvent::ProjectChanged => "project_changed",
            ShellEvent::Error(_) => "error",
            ShellEvent::ToolchainChanged => "toolchain_changed",
            ShellEvent::WidgetExpanded(_) => "widget_expanded",
            ShellEvent::WidgetMinimized(_) => "widget_minimized",
            ShellEvent::OverlayRequested(_) => "overlay_requested",
        }
    }
}

/// Signals the shell produces for external listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSignal {
    OverlayChanged { visible: bool, label: Option<String> },
}

pub struct EventHub {
    tx: Sender<ShellEvent>,
    rx: Receiver<ShellEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    pub fn try_next(&self) -> Option<ShellEvent> {
        self.rx.try_recv().ok()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct EventSender {
    tx: Sender<ShellEvent>,
}

impl EventSender {
    pub fn send(&self, event: ShellEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            warn!(event = name, "event hub is gone; dropping event");
        }
    }
}
