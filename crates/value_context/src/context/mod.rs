//! Core context components.
//!
//! - `Context<T>`: the broadcaster, holding the default value, current value and subscribers
//! - `Subscription<T>`: handle returned by `subscribe`, used to unsubscribe
//! - `ContextRegistry`: keeps contexts alive and disposes them together
//! - `Memo<D, V>`: caller-side stabilisation of composite values
//!
//! # Example
//!
//! ```rust
//! use value_context::{Context, ContextConfig, ContextError, ContextRegistry};
//!
//! let registry = ContextRegistry::new();
//!
//! let theme = Context::with_config("light", ContextConfig::named("theme"));
//! registry.register(&theme);
//!
//! let subscription = theme.subscribe(|theme| {
//!     println!("theme: {theme}");
//!     Ok(())
//! }).unwrap();
//!
//! theme.provide("dark").unwrap();
//!
//! registry.dispose_all();
//!
//! assert!(matches!(theme.provide("light"), Err(ContextError::Disposed { .. })));
//! assert!(!subscription.is_active());
//! ```

mod broadcaster;
mod config;
mod error;
mod memo;
mod registry;
mod subscription;

pub use broadcaster::{Context, ContextExt};
pub use config::ContextConfig;
pub use error::{CallbackError, ContextError, SubscriberFailure};
pub use memo::Memo;
pub use registry::ContextRegistry;
pub use subscription::{Subscription, SubscriptionId};
