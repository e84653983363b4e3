//! Builders compiled into the engine.
//!
//! Packages reference them by module name from their builders manifest,
//! e.g. `"class": "./exec"`.

mod exec;
mod noop;

use std::sync::Arc;

use super::StaticModules;

pub use exec::{ExecBuilder, ExecOptions};
pub use noop::NoopBuilder;

/// Module table holding every built-in builder.
pub fn builtin_modules() -> StaticModules {
  let mut modules = StaticModules::new();
  modules
    .register("exec", Arc::new(ExecBuilder::factory))
    .register("noop", Arc::new(NoopBuilder::factory));
  modules
}
