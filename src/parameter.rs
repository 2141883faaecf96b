// parameter.rs
// Editor-facing parameter schemas: named scalars with defaults and bounds.
// Only the configuration layer touches these; the update loop works on typed values.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Declarative description of one tunable scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParameterSpec {
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self { name, default, min, max }
    }

    /// Reject values outside `[min, max]` or non-finite values.
    pub fn check(&self, value: f32) -> Result<f32> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(Error::config(format!(
                "parameter '{}' = {} outside [{}, {}]",
                self.name, value, self.min, self.max
            )));
        }
        Ok(value)
    }
}

/// A set of named values, typically coming from the level editor or a TOML file.
pub type ParameterSet = BTreeMap<String, f32>;

/// Resolve every parameter of `schema` from `values`, falling back to defaults.
///
/// Names in `values` that the schema does not know are rejected so that typos in a
/// level file surface instead of silently using the default.
pub fn resolve(schema: &[ParameterSpec], values: &ParameterSet) -> Result<Vec<f32>> {
    for name in values.keys() {
        if !schema.iter().any(|spec| spec.name == name) {
            return Err(Error::config(format!("unknown parameter '{}'", name)));
        }
    }
    schema
        .iter()
        .map(|spec| match values.get(spec.name) {
            Some(&v) => spec.check(v),
            None => Ok(spec.default),
        })
        .collect()
}

/// Default values of a schema as a [`ParameterSet`].
pub fn defaults(schema: &[ParameterSpec]) -> ParameterSet {
    schema.iter().map(|spec| (spec.name.to_string(), spec.default)).collect()
}
