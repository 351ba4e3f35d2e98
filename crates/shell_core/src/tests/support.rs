use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use shared::domain::ToolchainId;

use crate::{
    collaborators::{Location, ProjectPresence, Toolchains, WidgetPanels},
    events::{EventSender, ShellEvent},
};

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn id(value: &str) -> ToolchainId {
    ToolchainId::new(value).expect("toolchain id")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SwitchTo(Option<ToolchainId>),
    SetWidgets(BTreeSet<String>),
    SetFragment { fragment: String, replace: bool },
}

#[derive(Default)]
pub struct Inner {
    pub toolchain: Option<ToolchainId>,
    pub widgets: BTreeSet<String>,
    pub saved_layouts: HashMap<ToolchainId, BTreeSet<String>>,
    pub fragment: String,
    pub calls: Vec<Call>,
}

/// In-memory stand-in for the toolchain model, widget panels and address bar.
#[derive(Default)]
pub struct FakeWorkspace {
    inner: Mutex<Inner>,
    events: Mutex<Option<EventSender>>,
}

impl FakeWorkspace {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(toolchain: Option<&str>, widgets: &[&str]) -> Arc<Self> {
        let workspace = Self::default();
        workspace.set_state(toolchain, widgets);
        Arc::new(workspace)
    }

    pub fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("workspace lock")
    }

    /// Raise collaborator events on `events` from now on.
    pub fn connect(&self, events: EventSender) {
        *self.events.lock().expect("events lock") = Some(events);
    }

    pub fn set_state(&self, toolchain: Option<&str>, widgets: &[&str]) {
        let mut inner = self.inner();
        inner.toolchain = toolchain.map(id);
        inner.widgets = set(widgets);
    }

    pub fn remember_layout(&self, toolchain: &str, widgets: &[&str]) {
        self.inner().saved_layouts.insert(id(toolchain), set(widgets));
    }

    pub fn set_location(&self, fragment: &str) {
        self.inner().fragment = fragment.to_string();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner().calls.clear();
    }

    fn emit(&self, event: ShellEvent) {
        if let Some(events) = self.events.lock().expect("events lock").as_ref() {
            events.send(event);
        }
    }
}

impl Toolchains for FakeWorkspace {
    fn current_id(&self) -> Option<ToolchainId> {
        self.inner().toolchain.clone()
    }

    fn switch_to(&self, toolchain: Option<ToolchainId>) {
        {
            let mut inner = self.inner();
            inner.calls.push(Call::SwitchTo(toolchain.clone()));
            inner.widgets = toolchain
                .as_ref()
                .and_then(|toolchain| inner.saved_layouts.get(toolchain).cloned())
                .unwrap_or_default();
            inner.toolchain = toolchain;
        }
        self.emit(ShellEvent::ToolchainChanged);
        self.emit(ShellEvent::ProjectChanged);
    }
}

impl WidgetPanels for FakeWorkspace {
    fn current_widget_names(&self) -> BTreeSet<String> {
        self.inner().widgets.clone()
    }

    fn set_widgets(&self, widgets: BTreeSet<String>) {
        let mut inner = self.inner();
        inner.calls.push(Call::SetWidgets(widgets.clone()));
        if let Some(toolchain) = inner.toolchain.clone() {
            inner.saved_layouts.insert(toolchain, widgets.clone());
        }
        inner.widgets = widgets;
    }

    fn expand_widget(&self, name: &str) {
        self.inner().widgets.insert(name.to_string());
        self.emit(ShellEvent::WidgetExpanded(name.to_string()));
    }
}

impl ProjectPresence for FakeWorkspace {
    fn has_project(&self) -> bool {
        self.inner().toolchain.is_some()
    }
}

impl Location for FakeWorkspace {
    fn fragment(&self) -> String {
        self.inner().fragment.clone()
    }

    fn set_fragment(&self, fragment: &str, replace: bool) {
        let mut inner = self.inner();
        inner.fragment = fragment.to_string();
        inner.calls.push(Call::SetFragment {
            fragment: fragment.to_string(),
            replace,
        });
    }
}
