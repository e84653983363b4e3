use serde_json::{Map, Value, json};

use wright_lib::builder::StaticModules;
use wright_lib::{ArchitectError, TargetSpecifier};

use super::common::{TestEnv, app_project};

fn bag(value: Value) -> Map<String, Value> {
  match value {
    Value::Object(map) => map,
    other => panic!("expected object, got {other}"),
  }
}

#[tokio::test]
async fn base_options_only() {
  let env = TestEnv::new();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let config = architect
    .get_builder_configuration(&TargetSpecifier::new("app", "build"))
    .unwrap();

  assert_eq!(config.options, bag(json!({ "outputPath": "dist" })));
  assert_eq!(config.root, "apps/app");
  assert_eq!(config.source_root.as_deref(), Some("apps/app/src"));
  assert_eq!(config.builder, "mypkg:cmd");
}

#[tokio::test]
async fn production_configuration_and_overrides() {
  let env = TestEnv::new();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let production = TargetSpecifier::new("app", "build").with_configuration("production");
  let config = architect.get_builder_configuration(&production).unwrap();
  assert_eq!(config.options, bag(json!({ "outputPath": "dist", "optimize": true })));

  let overridden = production.with_overrides(bag(json!({ "outputPath": "dist2" })));
  let config = architect.get_builder_configuration(&overridden).unwrap();
  assert_eq!(config.options, bag(json!({ "outputPath": "dist2", "optimize": true })));
}

#[tokio::test]
async fn configuration_missing_from_target_without_configurations() {
  let env = TestEnv::new();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let err = architect
    .get_builder_configuration(&TargetSpecifier::new("app", "lint").with_configuration("production"))
    .unwrap_err();

  assert!(matches!(err, ArchitectError::ConfigurationNotFound { .. }));
  assert_eq!(
    err.to_string(),
    "Configuration 'production' could not be found in project 'app'."
  );
}

#[tokio::test]
async fn listing_and_lookup_errors() {
  let env = TestEnv::new();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  assert_eq!(architect.list_project_targets("app").unwrap(), vec!["build", "lint"]);
  assert!(matches!(
    architect.list_project_targets("web"),
    Err(ArchitectError::ProjectNotFound(_))
  ));
  assert!(matches!(
    architect.get_builder_configuration(&TargetSpecifier::new("app", "serve")),
    Err(ArchitectError::TargetNotFound { .. })
  ));
}

#[tokio::test]
async fn lookups_before_load_fail() {
  let env = TestEnv::new();
  let workspace = std::sync::Arc::new(env.workspace(app_project("mypkg:cmd")).await);
  let architect = wright_lib::Architect::with_config(
    workspace,
    std::sync::Arc::new(StaticModules::new()),
    wright_lib::builder::ResolveConfig::local(),
  );

  assert!(matches!(
    architect.list_project_targets("app"),
    Err(ArchitectError::NotLoaded)
  ));
  assert!(matches!(
    architect.get_builder_configuration(&TargetSpecifier::new("app", "build")),
    Err(ArchitectError::NotLoaded)
  ));
}
