//! Generative UI embedding — mount a foreign component tree in a host view.
//!
//! The host owns a container, the [`EmbeddingAdapter`] owns the foreign
//! root inside it, and the foreign component talks back to the host only
//! through the typed [`GenUiCallbacks`] it is rendered with.

pub mod adapter;
pub mod callbacks;
pub mod model;
pub mod props;

pub use adapter::{EmbeddingAdapter, ForeignRenderer, ForeignRoot};
pub use callbacks::{GenUiCallbacks, HostHooks};
pub use model::{EmbedPolicy, RenderMode, should_embed};
pub use props::{ActionParams, GenUiProps, PropsPatch};
