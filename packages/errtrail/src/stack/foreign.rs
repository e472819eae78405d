//! Stack traces carried by foreign error types
//!
//! The chain walk only sees `&dyn Error`. Foreign types that record their own
//! stack are recognised through registered [`StackAdapter`]s, so support for
//! another error library is added by registering an adapter rather than by
//! touching the walk.

use super::Frame;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::error::Error as StdError;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

/// Capability of an error value that knows where it was created.
///
/// Implement it for your own foreign error type, or for a third-party type in
/// an adapter crate, then call [`register_tracer`].
pub trait StackTracer {
    /// Resolved frames, innermost first
    fn stack_trace(&self) -> Vec<Frame>;
}

/// Recognises foreign errors and extracts their frames.
pub trait StackAdapter: Send + Sync {
    /// `Some` when this adapter understands `error`, `None` to let the next one try.
    fn frames(&self, error: &(dyn StdError + 'static)) -> Option<Vec<Frame>>;
}

/// Adapter for any concrete error type implementing [`StackTracer`]
pub struct TracerAdapter<E> {
    _marker: PhantomData<fn() -> E>,
}

impl<E> TracerAdapter<E> {
    /// Adapter matching values of type `E`
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<E> Default for TracerAdapter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> StackAdapter for TracerAdapter<E>
where
    E: StdError + StackTracer + 'static,
{
    fn frames(&self, error: &(dyn StdError + 'static)) -> Option<Vec<Frame>> {
        error.downcast_ref::<E>().map(StackTracer::stack_trace)
    }
}

type Registry = Vec<(TypeId, Arc<dyn StackAdapter>)>;

static ADAPTERS: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Vec::new()));

/// Register an adapter for the rest of the process lifetime.
///
/// At most one adapter per adapter type is kept; registering the same type
/// again is a no-op and returns `false`.
pub fn register_adapter<A>(adapter: A) -> bool
where
    A: StackAdapter + 'static,
{
    let type_id = TypeId::of::<A>();
    let mut adapters = ADAPTERS.write().unwrap_or_else(PoisonError::into_inner);
    if adapters.iter().any(|(registered, _)| *registered == type_id) {
        return false;
    }
    adapters.push((type_id, Arc::new(adapter)));
    tracing::debug!(registered = adapters.len(), "stack adapter registered");
    true
}

/// Register a [`TracerAdapter`] for `E`. Returns `false` if `E` already has one.
pub fn register_tracer<E>() -> bool
where
    E: StdError + StackTracer + 'static,
{
    register_adapter(TracerAdapter::<E>::new())
}

/// Frames for a foreign link: the first adapter that recognises it wins,
/// unknown types yield no frames.
pub(crate) fn foreign_frames(error: &(dyn StdError + 'static)) -> Vec<Frame> {
    let adapters: Vec<Arc<dyn StackAdapter>> = ADAPTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|(_, adapter)| Arc::clone(adapter))
        .collect();
    adapters
        .iter()
        .find_map(|adapter| adapter.frames(error))
        .unwrap_or_default()
}
