//! Built-in operators.

use serde_json::Value;

use crate::traits::{Batch, OpError, Operator};

/// Forwards its input unchanged.
#[derive(Debug, Clone)]
pub struct Passthrough {
    name: String,
}

impl Passthrough {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Operator for Passthrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, input: Batch) -> Result<Batch, OpError> {
        Ok(input)
    }
}

/// Appends its name to each traverser's `"path"` array, creating it if
/// needed. Lets a run show which operators a traverser went through.
#[derive(Debug, Clone)]
pub struct PathTag {
    name: String,
}

impl PathTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Operator for PathTag {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, input: Batch) -> Result<Batch, OpError> {
        input
            .into_iter()
            .map(|mut t| {
                let obj = t
                    .as_object_mut()
                    .ok_or_else(|| OpError::Exec(format!("{}: traverser is not an object", self.name)))?;
                let path = obj
                    .entry("path")
                    .or_insert_with(|| Value::Array(Vec::new()));
                path.as_array_mut()
                    .ok_or_else(|| OpError::Exec(format!("{}: `path` is not an array", self.name)))?
                    .push(Value::String(self.name.clone()));
                Ok(t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_tag_appends_in_order() {
        let batch = vec![json!({"id": 1}), json!({"id": 2, "path": ["source"]})];
        let out = PathTag::named("expand_out").eval(batch).unwrap();
        assert_eq!(out[0]["path"], json!(["expand_out"]));
        assert_eq!(out[1]["path"], json!(["source", "expand_out"]));
    }

    #[test]
    fn path_tag_rejects_scalars() {
        let err = PathTag::named("x").eval(vec![json!(3)]).unwrap_err();
        assert!(matches!(err, OpError::Exec(_)));
    }
}
