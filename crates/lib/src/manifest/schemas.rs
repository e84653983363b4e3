//! Schemas bundled with the engine.

use serde_json::Value;

use crate::workspace::SchemaError;

const TARGETS_SCHEMA: &str = include_str!("../../schemas/targets-schema.json");
const BUILDERS_SCHEMA: &str = include_str!("../../schemas/builders-schema.json");

/// Schema every project target map is validated against.
pub fn targets_schema() -> Result<Value, SchemaError> {
  Ok(serde_json::from_str(TARGETS_SCHEMA)?)
}

/// Schema every builders manifest is validated against.
pub fn builders_schema() -> Result<Value, SchemaError> {
  Ok(serde_json::from_str(BUILDERS_SCHEMA)?)
}
