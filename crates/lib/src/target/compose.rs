use tracing::debug;

use super::{BuilderConfiguration, OptionBag, TargetRegistry, TargetSpecifier};
use crate::architect::ArchitectError;
use crate::workspace::Workspace;

/// Compose the builder configuration for `specifier`.
///
/// Options are merged shallowly, each layer overwriting the keys of the one
/// before it:
/// 1. the target's base `options`
/// 2. the named configuration, if `specifier.configuration` is set
/// 3. `specifier.overrides`
///
/// Project metadata comes from the workspace and is never taken from
/// options. The result is not validated; that needs the builder's schema.
pub fn compose(
  workspace: &Workspace,
  registry: &TargetRegistry,
  specifier: &TargetSpecifier,
) -> Result<BuilderConfiguration, ArchitectError> {
  let TargetSpecifier {
    project: project_name,
    target: target_name,
    configuration,
    overrides,
  } = specifier;

  let project = workspace
    .get_project(project_name)
    .ok_or_else(|| ArchitectError::ProjectNotFound(project_name.clone()))?;
  let target = registry.get_target(project_name, target_name)?;

  let mut options = target.options.clone();

  if let Some(configuration_name) = configuration {
    let overlay = target
      .configurations
      .as_ref()
      .and_then(|configurations| configurations.get(configuration_name))
      .ok_or_else(|| ArchitectError::ConfigurationNotFound {
        project: project_name.clone(),
        configuration: configuration_name.clone(),
      })?;
    merge(&mut options, overlay);
  }

  if let Some(overrides) = overrides {
    merge(&mut options, overrides);
  }

  debug!(target = %specifier, builder = %target.builder, "composed builder configuration");

  Ok(BuilderConfiguration {
    root: project.root.clone(),
    source_root: project.source_root.clone(),
    project_type: project.project_type,
    builder: target.builder.clone(),
    options,
  })
}

fn merge(base: &mut OptionBag, overlay: &OptionBag) {
  for (key, value) in overlay {
    base.insert(key.clone(), value.clone());
  }
}
