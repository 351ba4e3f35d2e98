//! In-memory toolchain model, widget panels and address bar for the headless host.

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Mutex, MutexGuard},
};

use shared::domain::ToolchainId;
use shell_core::{
    EventSender, Location, ProjectPresence, ShellEvent, Toolchains, WidgetPanels,
};
use tracing::debug;

#[derive(Debug, Default)]
struct WorkspaceState {
    toolchain: Option<ToolchainId>,
    widgets: BTreeSet<String>,
    layouts: HashMap<ToolchainId, BTreeSet<String>>,
    fragment: String,
}

pub struct Workspace {
    state: Mutex<WorkspaceState>,
    events: EventSender,
}

impl Workspace {
    pub fn new(events: EventSender, fragment: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(WorkspaceState {
                fragment: fragment.into(),
                ..WorkspaceState::default()
            }),
            events,
        }
    }

    fn state(&self) -> MutexGuard<'_, WorkspaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// User edits the address bar: the browser updates the location and
    /// fires a hash change.
    pub fn user_navigate(&self, fragment: &str) {
        self.state().fragment = fragment.to_string();
        self.events
            .send(ShellEvent::HashChanged(fragment.to_string()));
    }

    pub fn minimize_widget(&self, name: &str) {
        let removed = {
            let mut state = self.state();
            let removed = state.widgets.remove(name);
            if removed {
                save_layout(&mut state);
            }
            removed
        };
        if removed {
            self.events
                .send(ShellEvent::WidgetMinimized(name.to_string()));
        }
    }
}

fn save_layout(state: &mut WorkspaceState) {
    if let Some(toolchain) = state.toolchain.clone() {
        let widgets = state.widgets.clone();
        state.layouts.insert(toolchain, widgets);
    }
}

impl Toolchains for Workspace {
    fn current_id(&self) -> Option<ToolchainId> {
        self.state().toolchain.clone()
    }

    fn switch_to(&self, id: Option<ToolchainId>) {
        {
            let mut state = self.state();
            let restored = id
                .as_ref()
                .and_then(|id| state.layouts.get(id).cloned())
                .unwrap_or_default();
            debug!(toolchain = ?id, widgets = ?restored, "switching toolchain");
            state.widgets = restored;
            state.toolchain = id;
        }
        self.events.send(ShellEvent::ToolchainChanged);
        self.events.send(ShellEvent::ProjectChanged);
    }
}

impl WidgetPanels for Workspace {
    fn current_widget_names(&self) -> BTreeSet<String> {
        self.state().widgets.clone()
    }

    fn set_widgets(&self, widgets: BTreeSet<String>) {
        let mut state = self.state();
        state.widgets = widgets;
        save_layout(&mut state);
    }

    fn expand_widget(&self, name: &str) {
        let inserted = {
            let mut state = self.state();
            let inserted = state.widgets.insert(name.to_string());
            if inserted {
                save_layout(&mut state);
            }
            inserted
        };
        if inserted {
            self.events
                .send(ShellEvent::WidgetExpanded(name.to_string()));
        }
    }
}

impl ProjectPresence for Workspace {
    fn has_project(&self) -> bool {
        self.state().toolchain.is_some()
    }
}

impl Location for Workspace {
    fn fragment(&self) -> String {
        self.state().fragment.clone()
    }

    fn set_fragment(&self, fragment: &str, replace: bool) {
        debug!(fragment, replace, "address bar updated");
        self.state().fragment = fragment.to_string();
    }
}
