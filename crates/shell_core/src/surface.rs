//! The overlay's root element.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

/// Element id that marks content as dismissable.
pub const CLOSE_AFFORDANCE_ID: &str = "closeOverlay";

/// The three ways an overlay can be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DismissListener {
    CloseButton,
    BackgroundClick,
    EscapeKey,
}

impl DismissListener {
    pub const ALL: [DismissListener; 3] = [
        DismissListener::CloseButton,
        DismissListener::BackgroundClick,
        DismissListener::EscapeKey,
    ];
}

pub trait OverlaySurface {
    fn set_displayed(&mut self, displayed: bool);
    fn set_opacity(&mut self, opacity: f32);
    /// Starts an opacity transition; completion is not reported back.
    fn fade(&mut self, from: f32, to: f32, duration: Duration);
    fn clear(&mut self);
    fn set_markup(&mut self, markup: &str);
    fn markup(&self) -> String;
    fn attach(&mut self, listener: DismissListener);
    fn detach(&mut self, listener: DismissListener);

    fn contains_element(&self, id: &str) -> bool {
        let markup = self.markup();
        markup.contains(&format!("id=\"{id}\"")) || markup.contains(&format!("id='{id}'"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Displayed(bool),
    Opacity(f32),
    Fade { from: f32, to: f32, duration: Duration },
    Cleared,
    Markup(String),
    Attached(DismissListener),
    Detached(DismissListener),
}

#[derive(Debug, Default)]
pub struct SurfaceState {
    pub displayed: bool,
    pub opacity: f32,
    pub markup: String,
    pub listeners: BTreeSet<DismissListener>,
    pub ops: Vec<SurfaceOp>,
}

/// Surface without a DOM behind it. Clones observe the same element.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_displayed(&self) -> bool {
        self.state().displayed
    }

    pub fn listeners(&self) -> BTreeSet<DismissListener> {
        self.state().listeners.clone()
    }

    pub fn take_ops(&self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.state().ops)
    }
}

impl OverlaySurface for HeadlessSurface {
    fn set_displayed(&mut self, displayed: bool) {
        let mut state = self.state();
        state.displayed = displayed;
        state.ops.push(SurfaceOp::Displayed(displayed));
    }

    fn set_opacity(&mut self, opacity: f32) {
        let mut state = self.state();
        state.opacity = opacity;
        state.ops.push(SurfaceOp::Opacity(opacity));
    }

    fn fade(&mut self, from: f32, to: f32, duration: Duration) {
        let mut state = self.state();
        // No animation frames here; land on the end value.
        state.opacity = to;
        state.ops.push(SurfaceOp::Fade { from, to, duration });
    }

    fn clear(&mut self) {
        let mut state = self.state();
        state.markup.clear();
        state.ops.push(SurfaceOp::Cleared);
    }

    fn set_markup(&mut self, markup: &str) {
        let mut state = self.state();
        state.markup = markup.to_string();
        state.ops.push(SurfaceOp::Markup(markup.to_string()));
    }

    fn markup(&self) -> String {
        self.state().markup.clone()
    }

    fn attach(&mut self, listener: DismissListener) {
        let mut state = self.state();
        state.listeners.insert(listener);
        state.ops.push(SurfaceOp::Attached(listener));
    }

    fn detach(&mut self, listener: DismissListener) {
        let mut state = self.state();
        state.listeners.remove(&listener);
        state.ops.push(SurfaceOp::Detached(listener));
    }
}
