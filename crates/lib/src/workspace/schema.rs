//! JSON schema validation.
//!
//! The validator is a seam: the engine only needs
//! `validate(data, schema) -> normalized data | SchemaError`. The default
//! implementation uses the `jsonschema` crate and fills in `default`
//! values declared under `properties` before validating, so the value it
//! returns is the one callers should keep.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
  /// JSON pointer to the offending value (empty for the root).
  pub instance_path: String,
  pub message: String,
}

impl fmt::Display for SchemaViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.instance_path.is_empty() {
      write!(f, "{}", self.message)
    } else {
      write!(f, "{} at {}", self.message, self.instance_path)
    }
  }
}

/// Errors produced by schema validation.
#[derive(Debug, Error)]
pub enum SchemaError {
  /// The schema document itself could not be compiled.
  #[error("invalid schema: {0}")]
  InvalidSchema(String),

  /// The data does not satisfy the schema.
  #[error("schema validation failed: {}", format_violations(.violations))]
  Validation { violations: Vec<SchemaViolation> },

  /// Validated data could not be converted into the expected shape.
  #[error("schema validation failed: {0}")]
  Deserialize(#[from] serde_json::Error),
}

fn format_violations(violations: &[SchemaViolation]) -> String {
  violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Validates a JSON document against a JSON schema.
pub trait SchemaValidator: Send + Sync {
  /// Validate `data` against `schema`, returning the normalized data.
  fn validate(&self, data: &Value, schema: &Value) -> Result<Value, SchemaError>;
}

/// [`SchemaValidator`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl SchemaValidator for JsonSchemaValidator {
  fn validate(&self, data: &Value, schema: &Value) -> Result<Value, SchemaError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;

    let mut normalized = data.clone();
    apply_defaults(&mut normalized, schema);

    let violations: Vec<SchemaViolation> = validator
      .iter_errors(&normalized)
      .map(|e| SchemaViolation {
        instance_path: e.instance_path.to_string(),
        message: e.to_string(),
      })
      .collect();

    if violations.is_empty() {
      Ok(normalized)
    } else {
      Err(SchemaError::Validation { violations })
    }
  }
}

/// Fill missing object properties from their schema `default`, descending
/// into nested objects that are present.
fn apply_defaults(data: &mut Value, schema: &Value) {
  let (Some(object), Some(properties)) = (
    data.as_object_mut(),
    schema.get("properties").and_then(Value::as_object),
  ) else {
    return;
  };

  for (key, property) in properties {
    match object.get_mut(key) {
      Some(value) => apply_defaults(value, property),
      None => {
        if let Some(default) = property.get("default") {
          object.insert(key.clone(), default.clone());
        }
      }
    }
  }
}
