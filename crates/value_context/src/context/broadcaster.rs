use std::any::Any;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace, warn};

use super::config::ContextConfig;
use super::error::{CallbackError, ContextError, SubscriberFailure};
use super::subscription::{Subscription, SubscriptionId};

type Callback<T> = Arc<dyn Fn(&T) -> anyhow::Result<()> + Send + Sync>;

struct State<T> {
    current: T,
    // insertion order is notification order
    subscribers: IndexMap<SubscriptionId, Callback<T>>,
    /// Bumped by every `provide`; a round whose generation is no longer current is superseded.
    generation: u64,
    disposed: bool,
}

pub(crate) struct ContextInner<T> {
    config: ContextConfig,
    default: T,
    /// Held for the whole of every mutating operation, including callback delivery.
    /// Re-entrant so callbacks may call back into the same context on the same thread.
    serial: ReentrantMutex<()>,
    /// Never held while a callback runs.
    state: Mutex<State<T>>,
    next_id: AtomicU64,
}

impl<T> ContextInner<T> {
    pub(crate) fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.state
            .lock()
            .subscribers
            .contains_key(&id)
    }

    fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        let _serial = self.serial.lock();
        let removed = self.state.lock().subscribers.shift_remove(&id);
        match removed {
            Some(_callback) => trace!("Unsubscribed. context: {}, subscription: {}", self.config.name, id),
            None => trace!("Already unsubscribed. context: {}, subscription: {}", self.config.name, id),
        }
    }

    fn deliver(&self, callback: &Callback<T>, value: &T) -> anyhow::Result<()> {
        if !self.config.isolate_panics {
            return callback(value);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| callback(value))) {
            Ok(result) => result,
            Err(payload) => Err(anyhow::anyhow!(
                "Subscriber panicked. message: {}",
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// A value broadcaster with provider/consumer semantics.
///
/// Cloning a `Context` yields another handle to the same broadcaster.
///
/// `provide` never compares the new value with the current one: every call notifies every
/// subscriber, even when the value is equal to the previous one. Callers that want to avoid
/// redundant notifications must avoid calling `provide`, e.g. by stabilising composite values with
/// a [`Memo`](super::Memo) and comparing before providing.
pub struct Context<T> {
    inner: Arc<ContextInner<T>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Context<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    /// Creates a context whose current value starts out as `default`.
    pub fn new(default: T) -> Self {
        Self::with_config(default, ContextConfig::default())
    }

    /// Same as [`Context::new`], with an explicit configuration.
    pub fn with_config(default: T, config: ContextConfig) -> Self {
        debug!("Creating context. context: {}, default: {:?}", config.name, default);

        let state = State {
            current: default.clone(),
            subscribers: IndexMap::new(),
            generation: 0,
            disposed: false,
        };

        Self {
            inner: Arc::new(ContextInner {
                config,
                default,
                serial: ReentrantMutex::new(()),
                state: Mutex::new(state),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// The configured name, used in log records and errors.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// The most recently provided value, or the default if nothing was provided.
    pub fn current(&self) -> T {
        self.inner.state.lock().current.clone()
    }

    /// The value the context was created with; never changes.
    pub fn default_value(&self) -> T {
        self.inner.default.clone()
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }

    /// True once [`Context::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().disposed
    }

    /// Replaces the current value and notifies every subscriber, in subscription order.
    ///
    /// The value is stored even if some subscribers fail; their failures are returned together
    /// once every subscriber has been notified.
    ///
    /// A subscriber removed while the round is in progress is not notified. A subscriber added
    /// while the round is in progress receives the current value on registration instead.
    ///
    /// If a callback provides again, the nested round delivers the newer value to every remaining
    /// subscriber and this round stops, so no subscriber ever sees values out of order.
    pub fn provide(&self, value: T) -> Result<(), ContextError<T>> {
        let _serial = self.inner.serial.lock();

        let (generation, subscribers): (u64, Vec<(SubscriptionId, Callback<T>)>) = {
            let mut state = self.inner.state.lock();
            if state.disposed {
                return Err(self.disposed_error());
            }

            trace!(
                "Providing value. context: {}, value: {:?}, subscribers: {}",
                self.inner.config.name,
                value,
                state.subscribers.len()
            );

            state.current = value.clone();
            state.generation += 1;
            let subscribers = state
                .subscribers
                .iter()
                .map(|(id, callback)| (*id, callback.clone()))
                .collect();
            (state.generation, subscribers)
        };

        let mut errors = vec![];
        for (id, callback) in subscribers {
            if self.inner.generation() != generation {
                trace!(
                    "Round superseded by a nested provide. context: {}, value: {:?}",
                    self.inner.config.name, value
                );
                break;
            }

            if !self.inner.is_subscribed(id) {
                trace!("Skipping removed subscriber. context: {}, subscription: {}", self.inner.config.name, id);
                continue;
            }

            if let Err(reason) = self.inner.deliver(&callback, &value) {
                warn!(
                    "Subscriber failed. context: {}, subscription: {}, reason: {}",
                    self.inner.config.name, id, reason
                );
                errors.push(SubscriberFailure {
                    subscription: id,
                    reason,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContextError::Callback(CallbackError {
                context: self.inner.config.name.clone(),
                value,
                errors,
            }))
        }
    }

    /// Provides the default value again, as if the provider had been removed.
    pub fn restore_default(&self) -> Result<(), ContextError<T>> {
        self.provide(self.inner.default.clone())
    }

    /// Registers `callback` and immediately invokes it with the current value.
    ///
    /// If that first invocation fails the registration is rolled back and the failure is returned.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription<T>, ContextError<T>>
    where
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let _serial = self.inner.serial.lock();

        let id = SubscriptionId::new(
            self.inner
                .next_id
                .fetch_add(1, Ordering::Relaxed),
        );
        let callback: Callback<T> = Arc::new(callback);

        // registered before the initial delivery, so that a re-entrant `provide` issued by the
        // callback itself also reaches it
        let current = {
            let mut state = self.inner.state.lock();
            if state.disposed {
                return Err(self.disposed_error());
            }
            state
                .subscribers
                .insert(id, callback.clone());
            state.current.clone()
        };

        trace!(
            "Subscribed. context: {}, subscription: {}, current: {:?}",
            self.inner.config.name, id, current
        );

        if let Err(reason) = self.inner.deliver(&callback, &current) {
            warn!(
                "Subscriber failed initial delivery, registration rolled back. context: {}, subscription: {}, reason: {}",
                self.inner.config.name, id, reason
            );
            self.inner
                .state
                .lock()
                .subscribers
                .shift_remove(&id);

            return Err(ContextError::Callback(CallbackError {
                context: self.inner.config.name.clone(),
                value: current,
                errors: vec![SubscriberFailure {
                    subscription: id,
                    reason,
                }],
            }));
        }

        Ok(Subscription::new(Arc::downgrade(&self.inner), id))
    }

    /// Releases every subscriber. Subsequent `provide` and `subscribe` calls fail with
    /// [`ContextError::Disposed`]. Idempotent.
    pub fn dispose(&self) {
        let _serial = self.inner.serial.lock();

        let released = {
            let mut state = self.inner.state.lock();
            if state.disposed {
                return;
            }
            state.disposed = true;
            std::mem::take(&mut state.subscribers)
        };

        debug!(
            "Disposed context. context: {}, released_subscribers: {}",
            self.inner.config.name,
            released.len()
        );
        // callbacks are dropped outside the state lock
        drop(released);
    }

    fn disposed_error(&self) -> ContextError<T> {
        ContextError::Disposed {
            context: self.inner.config.name.clone(),
        }
    }
}

pub trait ContextExt<T: Debug + 'static> {
    /// Subscribes a callback that cannot fail.
    fn on_value<F>(&self, f: F) -> Result<Subscription<T>, ContextError<T>>
    where
        F: Fn(&T) + Send + Sync + 'static;
}

impl<T> ContextExt<T> for Context<T>
where
    T: Clone + Debug + Send + Sync + 'static,
{
    fn on_value<F>(&self, f: F) -> Result<Subscription<T>, ContextError<T>>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe(move |value| {
            f(value);
            Ok(())
        })
    }
}
