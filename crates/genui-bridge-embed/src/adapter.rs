//! Mount / update / unmount of a foreign component tree.

use tracing::debug;

use genui_bridge_core::ActionSink;

use crate::callbacks::{GenUiCallbacks, HostHooks};
use crate::model::{EmbedPolicy, RenderMode};
use crate::props::{GenUiProps, PropsPatch};

/// A live root of the foreign rendering framework.
pub trait ForeignRoot {
    /// Render (or re-render) the component with the given props.
    fn render(&mut self, props: &GenUiProps, mode: RenderMode, callbacks: &GenUiCallbacks);

    /// Tear the foreign tree down.
    fn unmount(self);
}

/// Creates foreign roots inside host-owned containers.
pub trait ForeignRenderer {
    type Container;
    type Root: ForeignRoot;

    fn create_root(&mut self, container: &Self::Container) -> Self::Root;
}

/// Holds one foreign root plus the props it is rendered with.
pub struct EmbeddingAdapter<R: ForeignRenderer> {
    renderer: R,
    container: Option<R::Container>,
    root: Option<R::Root>,
    props: GenUiProps,
    sink: ActionSink,
    hooks: HostHooks,
    policy: EmbedPolicy,
}

impl<R: ForeignRenderer> EmbeddingAdapter<R> {
    pub fn new(renderer: R, props: GenUiProps, sink: ActionSink) -> Self {
        Self {
            renderer,
            container: None,
            root: None,
            props,
            sink,
            hooks: HostHooks::default(),
            policy: EmbedPolicy::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: HostHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_policy(mut self, policy: EmbedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn props(&self) -> &GenUiProps {
        &self.props
    }

    pub fn is_mounted(&self) -> bool {
        self.root.is_some()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.policy.render_mode(self.props.model.as_ref())
    }

    /// Render into `container`, creating a root only if none exists yet.
    pub fn mount(&mut self, container: R::Container) {
        let container = self.container.insert(container);
        if self.root.is_none() {
            debug!("Creating foreign root");
            self.root = Some(self.renderer.create_root(container));
        }
        self.render();
    }

    /// Merge `patch` into the props and re-render if mounted.
    pub fn update_properties(&mut self, patch: PropsPatch) {
        self.props.apply(patch);
        if self.root.is_some() && self.container.is_some() {
            self.render();
        }
    }

    /// Release the foreign root. A later `mount` creates a fresh one.
    pub fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            debug!("Unmounting foreign root");
            root.unmount();
        }
    }

    fn render(&mut self) {
        let mode = self.render_mode();
        let callbacks =
            GenUiCallbacks::new(self.sink.clone(), self.props.message.clone(), self.hooks.clone());
        if let Some(root) = self.root.as_mut() {
            root.render(&self.props, mode, &callbacks);
        }
    }
}

impl<R: ForeignRenderer> Drop for EmbeddingAdapter<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
