pub mod clock;
pub mod collaborators;
pub mod debounce;
pub mod error;
pub mod events;
pub mod overlay;
pub mod registry;
pub mod route;
pub mod router;
pub mod screens;
pub mod set_ops;
pub mod shell;
pub mod surface;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborators::{Location, ProjectPresence, Toolchains, WidgetPanels};
pub use error::{RouterError, ShellError};
pub use events::{EventHub, EventSender, ShellEvent, ShellSignal};
pub use overlay::{
    OverlayConfig, OverlayManager, OverlayState, OverlayTarget, RenderOptions, RenderRequest,
    RenderTarget, UiInput,
};
pub use registry::{OverlayRegistry, OverlayView, ViewConstructor, ViewContext};
pub use route::{construct_fragment, parse_fragment, ParsedFragment, RouteState};
pub use router::{NavigateOptions, RouteTransition, Router, RouterOptions};
pub use screens::{ScreenKind, SupportLinks};
pub use shell::{Shell, ShellParts};
pub use surface::{DismissListener, HeadlessSurface, OverlaySurface};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
