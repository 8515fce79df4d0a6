use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Used in log records and error messages.
    pub name: String,

    /// When true, a panicking subscriber is reported as a failure and the remaining subscribers are
    /// still notified. When false, the panic unwinds out of `provide`/`subscribe`.
    pub isolate_panics: bool,
}

impl ContextConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            name: "context".to_string(),
            isolate_panics: true,
        }
    }
}
