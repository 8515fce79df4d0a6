//! A thread-safe context value broadcaster.
//!
//! A [`Context`] pairs a default value with a current value and an ordered set of subscribers.
//! Providing a value notifies every subscriber synchronously, in subscription order. Subscribing
//! delivers the current value immediately, so no subscriber ever misses the value that was
//! current when it registered.
//!
//! # Key Features
//!
//! - Provider/consumer semantics without a UI framework
//! - No implicit equality checks, every `provide` notifies
//! - Failing or panicking subscribers are isolated and reported together
//! - Explicitly owned contexts and registries, no global state
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use value_context::{Context, ContextExt};
//!
//! let language = Context::new("english".to_string());
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_for_header = seen.clone();
//! let header = language
//!     .on_value(move |value: &String| seen_for_header.lock().push(value.clone()))
//!     .unwrap();
//!
//! language.provide("french".to_string()).unwrap();
//!
//! assert_eq!(*seen.lock(), vec!["english".to_string(), "french".to_string()]);
//!
//! header.unsubscribe();
//! language.provide("german".to_string()).unwrap();
//! assert_eq!(seen.lock().len(), 2);
//! ```

pub mod context;

pub use context::{
    CallbackError, Context, ContextConfig, ContextError, ContextExt, ContextRegistry, Memo, SubscriberFailure,
    Subscription, SubscriptionId,
};
