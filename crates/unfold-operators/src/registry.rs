//! Operator registry: binding key → factory.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::traits::{OpError, Operator};

pub type OperatorFactory = Box<dyn Fn(&Value) -> Result<Box<dyn Operator>, OpError> + Send + Sync>;

/// Instantiates operators from `(key, config)` bindings. Keys for logical
/// steps are their kind names (`"filter"`, `"project"`, ...).
#[derive(Default)]
pub struct Registry {
    factories: BTreeMap<String, OperatorFactory>,
    fallback: Option<OperatorFactory>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the factory for `key`.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Operator>, OpError> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Box::new(factory));
    }

    pub fn with<F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<Box<dyn Operator>, OpError> + Send + Sync + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Factory used for keys with no registration. The factory receives the
    /// config with the unknown key under `"key"`.
    pub fn with_fallback<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<Box<dyn Operator>, OpError> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(factory));
        self
    }

    pub fn instantiate(&self, key: &str, config: &Value) -> Result<Box<dyn Operator>, OpError> {
        if let Some(factory) = self.factories.get(key) {
            return factory(config);
        }
        match &self.fallback {
            Some(factory) => factory(&serde_json::json!({ "key": key, "config": config })),
            None => Err(OpError::Config(format!("no operator registered for key `{key}`"))),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::Passthrough;

    #[test]
    fn unknown_key_without_fallback_fails() {
        let reg = Registry::new();
        let err = reg.instantiate("expand_out", &Value::Null).err().unwrap();
        assert!(err.to_string().contains("expand_out"));
    }

    #[test]
    fn fallback_sees_the_requested_key() {
        let reg = Registry::new().with_fallback(|cfg| {
            let key = cfg["key"].as_str().unwrap_or_default().to_string();
            Ok(Box::new(Passthrough::named(key)) as Box<dyn Operator>)
        });
        let op = reg.instantiate("dedup_hash", &Value::Null).unwrap();
        assert_eq!(op.name(), "dedup_hash");
    }
}
