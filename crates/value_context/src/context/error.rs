use std::fmt::Debug;

use thiserror::Error;

use super::subscription::SubscriptionId;

#[derive(Error, Debug)]
pub enum ContextError<T: Debug + 'static> {
    #[error("Context is disposed. context: {context}")]
    Disposed { context: String },

    #[error(transparent)]
    Callback(#[from] CallbackError<T>),
}

/// Every subscriber failure of one notification round, together with the value being broadcast.
#[derive(Error, Debug)]
#[error("Subscriber callbacks failed. context: {context}, failures: {}", .errors.len())]
pub struct CallbackError<T: Debug + 'static> {
    pub context: String,
    pub value: T,
    pub errors: Vec<SubscriberFailure>,
}

#[derive(Error, Debug)]
#[error("Subscriber failed. subscription: {subscription}, reason: {reason}")]
pub struct SubscriberFailure {
    pub subscription: SubscriptionId,
    pub reason: anyhow::Error,
}

impl<T: Debug + 'static> CallbackError<T> {
    pub fn failed_subscriptions(&self) -> Vec<SubscriptionId> {
        self.errors
            .iter()
            .map(|failure| failure.subscription)
            .collect()
    }
}
