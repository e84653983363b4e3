use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use serde_json::json;
use tracing::Span;

use wright_lib::builder::builtin::builtin_modules;
use wright_lib::builder::{BuildEvent, BuildOutput, Builder, BuilderContext, PartialContext, StaticModules};
use wright_lib::{ArchitectError, BuilderConfiguration, TargetSpecifier};

use super::common::{Recorder, TestEnv, app_project, collect};

async fn recorded_run(
  env: &TestEnv,
  recorder: &Recorder,
  specifier: TargetSpecifier,
) -> Result<Vec<BuildEvent>, ArchitectError> {
  let mut modules = StaticModules::new();
  recorder.register(&mut modules, "record");
  let architect = env.architect(app_project("mypkg:record"), modules).await;

  let output = architect.run_target(&specifier, PartialContext::default()).await?;
  Ok(collect(output).await)
}

#[tokio::test]
async fn run_commits_validated_options() {
  let env = TestEnv::new();
  env.install_mypkg();
  let recorder = Recorder::default();

  let events = recorded_run(&env, &recorder, TargetSpecifier::new("app", "build")).await.unwrap();

  assert_eq!(events, vec![BuildEvent::success()]);
  assert_eq!(
    recorder.last_options(),
    json!({ "outputPath": "dist", "optimize": false, "verbose": false })
  );
}

#[tokio::test]
async fn invalid_options_never_instantiate() {
  let env = TestEnv::new();
  env.install_mypkg();
  let recorder = Recorder::default();

  let specifier = TargetSpecifier::new("app", "build").with_overrides(
    json!({ "outputPath": 42 })
      .as_object()
      .cloned()
      .unwrap(),
  );
  let err = recorded_run(&env, &recorder, specifier).await.unwrap_err();

  assert!(matches!(err, ArchitectError::Schema(_)));
  assert_eq!(recorder.constructed(), 0);
}

#[tokio::test]
async fn each_run_gets_a_new_instance() {
  let env = TestEnv::new();
  env.install_mypkg();
  let recorder = Recorder::default();
  let mut modules = StaticModules::new();
  recorder.register(&mut modules, "record");
  let architect = env.architect(app_project("mypkg:record"), modules).await;

  for _ in 0..3 {
    let output = architect
      .run_target(&TargetSpecifier::new("app", "lint"), PartialContext::default())
      .await
      .unwrap();
    collect(output).await;
  }

  assert_eq!(recorder.constructed(), 3);
}

#[tokio::test]
async fn unresolvable_builder_fails_run() {
  let env = TestEnv::new();
  let architect = env.architect(app_project("missing:thing"), StaticModules::new()).await;

  let err = architect
    .run_target(&TargetSpecifier::new("app", "build"), PartialContext::default())
    .await
    .err()
    .unwrap();

  assert!(matches!(err, ArchitectError::BuilderCannotBeResolved { .. }));
}

#[tokio::test]
async fn builder_module_missing_fails_run() {
  let env = TestEnv::new();
  env.install_mypkg();
  let architect = env.architect(app_project("mypkg:cmd"), StaticModules::new()).await;

  let err = architect
    .run_target(&TargetSpecifier::new("app", "build"), PartialContext::default())
    .await
    .err()
    .unwrap();

  assert!(matches!(err, ArchitectError::Load(_)));
}

#[tokio::test]
async fn partial_context_fields_reach_the_builder() {
  let env = TestEnv::new();
  env.install_mypkg();

  let seen = Arc::new(std::sync::Mutex::new(None));
  let capture = seen.clone();
  let mut modules = StaticModules::new();
  modules.register(
    "record",
    Arc::new(move |context: BuilderContext| -> Box<dyn Builder> {
      *capture.lock().unwrap() = Some(context.extra.clone());
      Box::new(Succeed)
    }),
  );
  let architect = env.architect(app_project("mypkg:record"), modules).await;

  let partial = PartialContext::default()
    .with_logger(Span::none())
    .with_extra("target", json!("app:build"));
  let output = architect
    .run_target(&TargetSpecifier::new("app", "build"), partial)
    .await
    .unwrap();
  collect(output).await;

  let extra = seen.lock().unwrap().clone().unwrap();
  assert_eq!(extra["target"], json!("app:build"));
}

struct Succeed;

impl Builder for Succeed {
  fn run(&self, _config: BuilderConfiguration) -> BuildOutput {
    stream::iter([BuildEvent::success()]).boxed()
  }
}

/// Runs another target through the architect in its context.
struct Nested {
  context: BuilderContext,
}

impl Builder for Nested {
  fn run(&self, _config: BuilderConfiguration) -> BuildOutput {
    let architect = self.context.architect.clone();
    stream::once(async move {
      let Some(architect) = architect.upgrade() else {
        return stream::iter(vec![BuildEvent::failure("architect dropped")]).boxed();
      };
      match architect
        .run_target(&TargetSpecifier::new("app", "lint"), PartialContext::default())
        .await
      {
        Ok(output) => output,
        Err(e) => stream::iter(vec![BuildEvent::failure(e.to_string())]).boxed(),
      }
    })
    .flatten()
    .boxed()
  }
}

#[tokio::test]
async fn builders_can_run_other_targets() {
  let env = TestEnv::new();
  env.install_mypkg();
  env.write_file(
    "node_modules/outer/package.json",
    r#"{ "builders": "builders.json" }"#,
  );
  env.write_file(
    "node_modules/outer/builders.json",
    r#"{ "builders": { "nested": { "class": "./nested", "schema": "./schema.json", "description": "nested" } } }"#,
  );
  env.write_file("node_modules/outer/schema.json", r#"{ "type": "object" }"#);

  let recorder = Recorder::default();
  let mut modules = StaticModules::new();
  recorder.register(&mut modules, "record");
  modules.register(
    "nested",
    Arc::new(|context: BuilderContext| -> Box<dyn Builder> { Box::new(Nested { context }) }),
  );

  let mut projects = app_project("mypkg:record");
  projects["app"]["targets"]["outer"] = json!({ "builder": "outer:nested", "options": {} });
  let architect = env.architect(projects, modules).await;

  let output = architect
    .run_target(&TargetSpecifier::new("app", "outer"), PartialContext::default())
    .await
    .unwrap();

  assert_eq!(collect(output).await, vec![BuildEvent::success()]);
  assert_eq!(recorder.constructed(), 1);
  assert_eq!(recorder.last_options()["outputPath"], json!("lint"));
}

#[tokio::test]
async fn concurrent_runs_of_different_targets() {
  let env = TestEnv::new();
  env.install_mypkg();
  let recorder = Recorder::default();
  let mut modules = StaticModules::new();
  recorder.register(&mut modules, "record");
  let architect = env.architect(app_project("mypkg:record"), modules).await;

  let build = TargetSpecifier::new("app", "build").with_configuration("production");
  let lint = TargetSpecifier::new("app", "lint");
  let (a, b) = tokio::join!(
    architect.run_target(&build, PartialContext::default()),
    architect.run_target(&lint, PartialContext::default()),
  );

  assert_eq!(collect(a.unwrap()).await, vec![BuildEvent::success()]);
  assert_eq!(collect(b.unwrap()).await, vec![BuildEvent::success()]);
  assert_eq!(recorder.constructed(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn builtin_exec_builder_end_to_end() {
  let env = TestEnv::new();
  env.write_file("node_modules/shell/package.json", r#"{ "builders": "builders.json" }"#);
  env.write_file(
    "node_modules/shell/builders.json",
    r#"{ "builders": { "exec": { "class": "./exec", "schema": "./exec.json", "description": "run a command" } } }"#,
  );
  env.write_file(
    "node_modules/shell/exec.json",
    r#"{ "type": "object", "properties": { "command": { "type": "string" } }, "required": ["command"] }"#,
  );
  std::fs::create_dir_all(env.root().join("apps/app")).unwrap();

  let projects = json!({
    "app": {
      "root": "apps/app",
      "projectType": "application",
      "targets": {
        "touch": { "builder": "shell:exec", "options": { "command": "touch built" } },
        "fail": { "builder": "shell:exec", "options": { "command": "exit 1" } }
      }
    }
  });
  let architect = env.architect(projects, builtin_modules()).await;

  let output = architect
    .run_target(&TargetSpecifier::new("app", "touch"), PartialContext::default())
    .await
    .unwrap();
  assert_eq!(collect(output).await, vec![BuildEvent::success()]);
  assert!(env.root().join("apps/app/built").exists());

  let output = architect
    .run_target(&TargetSpecifier::new("app", "fail"), PartialContext::default())
    .await
    .unwrap();
  let events = collect(output).await;
  assert_eq!(events.len(), 1);
  assert!(!events[0].success);
}
