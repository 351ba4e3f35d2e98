//! Keeps the address-bar fragment and the toolchain/widget state in step.

use std::sync::Arc;

use shared::domain::FolderId;
use tracing::{debug, info};

use crate::{
    collaborators::{Location, Toolchains, WidgetPanels},
    error::RouterError,
    events::{EventSender, ShellEvent},
    overlay::RenderRequest,
    route::{construct_fragment, normalize_fragment, parse_fragment, ParsedFragment, RouteState},
    set_ops::sets_differ,
};

pub const DEFAULT_DATA_MANAGER_URL: &str = "girder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Also apply the widgets named in the very first URL once the UI is ready.
    /// Off by default: the toolchain's own saved layout wins.
    pub restore_initial_widgets: bool,
    pub data_manager_url: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            restore_initial_widgets: false,
            data_manager_url: DEFAULT_DATA_MANAGER_URL.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    pub replace: bool,
    pub trigger: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTransition {
    /// Recorded for later; the UI is not ready yet.
    CapturedInitial,
    SwitchToolchainAndWidgets,
    SwitchToolchain,
    SetWidgets,
    Unchanged,
}

#[derive(Debug)]
enum Phase {
    AwaitingFirstRoute,
    Captured(RouteState),
    Ready,
}

pub struct Router {
    options: RouterOptions,
    phase: Phase,
    location: Arc<dyn Location>,
    toolchains: Arc<dyn Toolchains>,
    widgets: Arc<dyn WidgetPanels>,
    events: EventSender,
}

impl Router {
    pub fn new(
        options: RouterOptions,
        location: Arc<dyn Location>,
        toolchains: Arc<dyn Toolchains>,
        widgets: Arc<dyn WidgetPanels>,
        events: EventSender,
    ) -> Self {
        Self {
            options,
            phase: Phase::AwaitingFirstRoute,
            location,
            toolchains,
            widgets,
            events,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    pub fn initial_route(&self) -> Option<&RouteState> {
        match &self.phase {
            Phase::Captured(route) => Some(route),
            Phase::AwaitingFirstRoute | Phase::Ready => None,
        }
    }

    pub fn handle_fragment(&mut self, fragment: &str) -> RouteTransition {
        match parse_fragment(fragment) {
            ParsedFragment::Route(route) => self.handle_route(route),
            ParsedFragment::Empty | ParsedFragment::NotFound => {
                // Only the literal empty fragment is left in the address bar.
                let reset = self.navigate(
                    "",
                    NavigateOptions {
                        replace: true,
                        trigger: false,
                    },
                );
                if reset {
                    debug!(fragment, "non-canonical fragment; reset to the empty route");
                }
                self.handle_route(RouteState::empty())
            }
        }
    }

    pub fn handle_route(&mut self, route: RouteState) -> RouteTransition {
        if !self.is_ready() {
            debug!(route = ?route, "captured initial route");
            self.phase = Phase::Captured(route);
            return RouteTransition::CapturedInitial;
        }

        let current_id = self.toolchains.current_id();
        let current_widgets = self.widgets.current_widget_names();
        let changed_toolchain = route.toolchain_id != current_id;
        let changed_widgets = sets_differ(&route.widgets, &current_widgets);

        let transition = match (changed_toolchain, changed_widgets) {
            (true, true) => {
                // An explicit URL overrides the layout the toolchain remembers.
                self.toolchains.switch_to(route.toolchain_id.clone());
                self.widgets.set_widgets(route.widgets);
                RouteTransition::SwitchToolchainAndWidgets
            }
            (true, false) => {
                self.toolchains.switch_to(route.toolchain_id.clone());
                RouteTransition::SwitchToolchain
            }
            (false, true) => {
                self.widgets.set_widgets(route.widgets);
                RouteTransition::SetWidgets
            }
            (false, false) => RouteTransition::Unchanged,
        };

        debug!(?transition, toolchain = ?route.toolchain_id, "route handled");
        transition
    }

    /// Applies the route captured before the UI existed. Must run exactly once.
    pub fn apply_initial_route(&mut self) -> Result<RouteState, RouterError> {
        let route = match std::mem::replace(&mut self.phase, Phase::Ready) {
            Phase::Captured(route) => route,
            Phase::AwaitingFirstRoute => {
                self.phase = Phase::AwaitingFirstRoute;
                return Err(RouterError::InitialRouteMissing);
            }
            Phase::Ready => return Err(RouterError::InitialRouteAlreadyApplied),
        };

        info!(toolchain = ?route.toolchain_id, "applying initial route");
        self.toolchains.switch_to(route.toolchain_id.clone());
        if self.options.restore_initial_widgets {
            self.widgets.set_widgets(route.widgets.clone());
        }

        if route.toolchain_id.is_some() {
            // The URL already says which toolchain; skip the starting screen.
            self.events
                .send(ShellEvent::OverlayRequested(RenderRequest::hide()));
        }

        Ok(route)
    }

    /// Writes the current toolchain and widgets into the address bar.
    /// Returns the fragment when one was built.
    pub fn update_url(&mut self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        let toolchain_id = self.toolchains.current_id()?;
        let widgets = self.widgets.current_widget_names();
        let fragment = construct_fragment(&toolchain_id, &widgets);
        self.navigate(
            &fragment,
            NavigateOptions {
                replace: false,
                trigger: true,
            },
        );
        Some(fragment)
    }

    /// Returns false when the address bar already shows `fragment`.
    pub fn navigate(&self, fragment: &str, options: NavigateOptions) -> bool {
        let fragment = normalize_fragment(fragment);
        let current = self.location.fragment();
        if current.strip_prefix('#').unwrap_or(&current) == fragment {
            return false;
        }
        self.location.set_fragment(fragment, options.replace);
        if options.trigger {
            self.events
                .send(ShellEvent::HashChanged(fragment.to_string()));
        }
        true
    }

    /// Link that opens a toolchain's folder in the data manager.
    pub fn toolchain_link(&self, folder_id: &FolderId) -> String {
        format!("{}#folder/{}", self.options.data_manager_url, folder_id)
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
