//! Boundary traits for the objects the shell queries and drives but does not own.

use std::collections::BTreeSet;

use shared::domain::ToolchainId;

/// The currently loaded toolchain. Switching restores the toolchain's own
/// last-saved widget layout.
pub trait Toolchains {
    fn current_id(&self) -> Option<ToolchainId>;
    fn switch_to(&self, id: Option<ToolchainId>);
}

pub trait WidgetPanels {
    fn current_widget_names(&self) -> BTreeSet<String>;
    fn set_widgets(&self, widgets: BTreeSet<String>);
    fn expand_widget(&self, name: &str);
}

pub trait ProjectPresence {
    fn has_project(&self) -> bool;
}

/// The address bar. Writing a fragment never raises navigation by itself.
pub trait Location {
    fn fragment(&self) -> String;
    fn set_fragment(&self, fragment: &str, replace: bool);
}
