use std::collections::HashMap;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{TargetDefinition, TargetMap};
use crate::architect::ArchitectError;
use crate::manifest::schemas::targets_schema;
use crate::workspace::{SchemaError, Workspace};

/// Validated target maps, keyed by project name.
///
/// Populated once by [`TargetRegistry::load`] and never modified afterwards.
#[derive(Debug, Default)]
pub struct TargetRegistry {
  maps: OnceCell<HashMap<String, TargetMap>>,
}

impl TargetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Validate and cache the target map of every project in `workspace`.
  ///
  /// Only the first successful call does any work. Concurrent callers wait
  /// for that call instead of repeating it.
  pub async fn load(&self, workspace: &Workspace) -> Result<(), ArchitectError> {
    self
      .maps
      .get_or_try_init(|| async {
        let schema = targets_schema()?;
        let mut maps = HashMap::new();

        for project in workspace.list_project_names() {
          let raw = workspace
            .get_project_targets(&project)
            .ok_or_else(|| ArchitectError::ProjectNotFound(project.clone()))?;

          let validated = workspace.validate_against_schema(raw, &schema)?;
          let targets: TargetMap = serde_json::from_value(validated).map_err(SchemaError::from)?;

          debug!(project = %project, targets = targets.len(), "validated target map");
          maps.insert(project, targets);
        }

        info!(projects = maps.len(), "target maps loaded");
        Ok::<_, ArchitectError>(maps)
      })
      .await?;

    Ok(())
  }

  /// Whether [`TargetRegistry::load`] has completed.
  pub fn is_loaded(&self) -> bool {
    self.maps.initialized()
  }

  fn project_targets(&self, project: &str) -> Result<&TargetMap, ArchitectError> {
    let maps = self.maps.get().ok_or(ArchitectError::NotLoaded)?;
    maps
      .get(project)
      .ok_or_else(|| ArchitectError::ProjectNotFound(project.to_string()))
  }

  /// Names of the targets declared by `project`.
  pub fn list_targets(&self, project: &str) -> Result<Vec<String>, ArchitectError> {
    Ok(self.project_targets(project)?.keys().cloned().collect())
  }

  /// The `target` declared by `project`.
  pub fn get_target(&self, project: &str, target: &str) -> Result<&TargetDefinition, ArchitectError> {
    self
      .project_targets(project)?
      .get(target)
      .ok_or_else(|| ArchitectError::TargetNotFound {
        project: project.to_string(),
        target: target.to_string(),
      })
  }
}
