use std::{collections::BTreeMap, fmt, sync::Arc};

use shared::domain::OverlayKey;

/// A mountable overlay view.
pub trait OverlayView {
    /// Renders (or re-renders) the view and returns its markup.
    fn render(&mut self) -> String;
}

/// Construction context for overlay views. The shell always builds views
/// headless, with no parent view to link into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewContext {
    pub parent_view: Option<String>,
}

impl ViewContext {
    pub fn headless() -> Self {
        Self { parent_view: None }
    }
}

type BuildView = dyn Fn(&ViewContext) -> Box<dyn OverlayView> + Send + Sync;

/// Reusable, instantiable view type.
#[derive(Clone)]
pub struct ViewConstructor {
    name: String,
    build: Arc<BuildView>,
}

impl ViewConstructor {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&ViewContext) -> Box<dyn OverlayView> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            build: Arc::new(build),
        }
    }

    /// Constructor for a view whose output never changes.
    pub fn from_markup(name: impl Into<String>, markup: impl Into<String>) -> Self {
        let markup: String = markup.into();
        Self::new(name, move |_| Box::new(StaticView::new(markup.clone())))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self, context: &ViewContext) -> Box<dyn OverlayView> {
        (self.build)(context)
    }

    pub fn same_as(&self, other: &ViewConstructor) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }
}

impl fmt::Debug for ViewConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConstructor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub struct StaticView {
    markup: String,
}

impl StaticView {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

impl OverlayView for StaticView {
    fn render(&mut self) -> String {
        self.markup.clone()
    }
}

/// Fixed mapping from well-known overlay names to their constructors.
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    views: Arc<BTreeMap<OverlayKey, ViewConstructor>>,
}

impl OverlayRegistry {
    pub fn builder() -> OverlayRegistryBuilder {
        OverlayRegistryBuilder::default()
    }

    pub fn get(&self, key: OverlayKey) -> Option<&ViewConstructor> {
        self.views.get(&key)
    }

    pub fn contains(&self, key: OverlayKey) -> bool {
        self.views.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = OverlayKey> + '_ {
        self.views.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct OverlayRegistryBuilder {
    views: BTreeMap<OverlayKey, ViewConstructor>,
}

impl OverlayRegistryBuilder {
    pub fn register(mut self, key: OverlayKey, constructor: ViewConstructor) -> Self {
        self.views.insert(key, constructor);
        self
    }

    pub fn build(self) -> OverlayRegistry {
        OverlayRegistry {
            views: Arc::new(self.views),
        }
    }
}
