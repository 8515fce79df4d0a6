use std::fmt::{Debug, Display, Formatter};
use std::sync::Weak;

use super::broadcaster::ContextInner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to one registered callback.
///
/// Dropping the handle does NOT unsubscribe; call [`Subscription::unsubscribe`]. The handle only
/// holds a weak reference, so it never keeps the context alive.
pub struct Subscription<T> {
    context: Weak<ContextInner<T>>,
    id: SubscriptionId,
}

impl<T> Subscription<T> {
    pub(crate) fn new(context: Weak<ContextInner<T>>, id: SubscriptionId) -> Self {
        Self {
            context,
            id,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Idempotent; a no-op once the context is disposed or dropped.
    pub fn unsubscribe(&self) {
        if let Some(context) = self.context.upgrade() {
            context.unsubscribe(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.context
            .upgrade()
            .is_some_and(|context| context.is_subscribed(self.id))
    }
}

impl<T> Debug for Subscription<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish()
    }
}
