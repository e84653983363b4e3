use std::sync::Arc;

use wright_lib::ArchitectError;
use wright_lib::builder::StaticModules;

use super::common::{TestEnv, app_project};

#[tokio::test]
async fn describe_resolves_through_both_manifests() {
  let env = TestEnv::new();
  env.install_mypkg();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let description = architect.get_builder_description("mypkg:cmd").await.unwrap();

  assert_eq!(description.name, "mypkg:cmd");
  assert_eq!(description.description, "runs cmd");
  assert_eq!(description.schema["required"][0], "outputPath");
}

#[tokio::test]
async fn describe_twice_discovers_once() {
  let env = TestEnv::new();
  env.install_mypkg();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let before = env.host.reads();
  let first = architect.get_builder_description("mypkg:cmd").await.unwrap();
  let after_first = env.host.reads();
  let second = architect.get_builder_description("mypkg:cmd").await.unwrap();

  assert_eq!(after_first - before, 3);
  assert_eq!(env.host.reads(), after_first);
  assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn sibling_builders_are_cached_independently() {
  let env = TestEnv::new();
  env.install_mypkg();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let cmd = architect.get_builder_description("mypkg:cmd").await.unwrap();
  let record = architect.get_builder_description("mypkg:record").await.unwrap();

  assert_eq!(cmd.description, "runs cmd");
  assert_eq!(record.description, "records options");
}

#[tokio::test]
async fn unknown_package_and_unknown_builder() {
  let env = TestEnv::new();
  env.install_mypkg();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let err = architect.get_builder_description("unknownpkg:foo").await.unwrap_err();
  assert!(matches!(err, ArchitectError::BuilderCannotBeResolved { .. }));

  let err = architect
    .get_builder_description("mypkg:unknownBuilder")
    .await
    .unwrap_err();
  assert!(matches!(err, ArchitectError::BuilderCannotBeResolved { .. }));
  assert!(err.to_string().starts_with("Builder 'mypkg:unknownBuilder' cannot be resolved"));
}

#[tokio::test]
async fn path_packages_resolve_from_workspace_root() {
  let env = TestEnv::new();
  env.write_file("tools/package.json", r#"{ "builders": "builders.json" }"#);
  env.write_file(
    "tools/builders.json",
    r#"{ "builders": { "gen": { "class": "./src/gen", "schema": "./schemas/gen.json", "description": "generate" } } }"#,
  );
  env.write_file("tools/schemas/gen.json", r#"{ "type": "object" }"#);
  let architect = env.architect(app_project("./tools:gen"), StaticModules::new()).await;

  let description = architect.get_builder_description("./tools:gen").await.unwrap();
  assert_eq!(description.description, "generate");
}

#[tokio::test]
async fn missing_schema_file_cannot_be_resolved() {
  let env = TestEnv::new();
  env.install_mypkg();
  std::fs::remove_file(env.root().join("node_modules/mypkg/lib/cmd-schema.json")).unwrap();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let err = architect.get_builder_description("mypkg:cmd").await.unwrap_err();
  match err {
    ArchitectError::BuilderCannotBeResolved { builder, reason } => {
      assert_eq!(builder, "mypkg:cmd");
      assert!(reason.contains("cmd-schema.json"), "{reason}");
    }
    other => panic!("expected BuilderCannotBeResolved, got {other:?}"),
  }
}
