use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::broadcaster::Context;

trait Disposable: Send + Sync {
    fn name(&self) -> &str;
    fn dispose(&self);
}

impl<T> Disposable for Context<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        Context::name(self)
    }

    fn dispose(&self) {
        Context::dispose(self)
    }
}

/// A registry that owns a set of contexts.
///
/// Registered contexts are kept alive as long as the registry exists, and can be disposed
/// together. Dropping the registry releases the contexts without disposing them.
#[derive(Default)]
pub struct ContextRegistry {
    contexts: Mutex<Vec<Arc<dyn Disposable>>>,
}

impl ContextRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Registers a context with the registry.
    pub fn register<T>(&self, context: &Context<T>)
    where
        T: Clone + Debug + Send + Sync + 'static,
    {
        debug!("Registering context. context: {}", context.name());
        self.contexts
            .lock()
            .push(Arc::new(context.clone()));
    }

    pub fn len(&self) -> usize {
        self.contexts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.lock().is_empty()
    }

    /// Names of the registered contexts, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.contexts
            .lock()
            .iter()
            .map(|context| context.name().to_string())
            .collect()
    }

    /// Disposes every registered context, then releases them.
    pub fn dispose_all(&self) {
        let contexts = std::mem::take(&mut *self.contexts.lock());
        debug!("Disposing contexts. count: {}", contexts.len());
        for context in contexts {
            context.dispose();
        }
    }
}
