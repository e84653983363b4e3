use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::workspace::ProjectType;

/// A flat set of builder options.
pub type OptionBag = Map<String, Value>;

/// A target as declared in a project's target map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
  /// Builder identifier, `<package>:<builder>`.
  pub builder: String,
  #[serde(default)]
  pub options: OptionBag,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub configurations: Option<BTreeMap<String, OptionBag>>,
}

/// Target name -> definition, for one project.
pub type TargetMap = BTreeMap<String, TargetDefinition>;

/// Identifies one desired invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSpecifier {
  pub project: String,
  pub target: String,
  pub configuration: Option<String>,
  /// Caller-supplied options, applied last.
  pub overrides: Option<OptionBag>,
}

impl TargetSpecifier {
  pub fn new(project: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      target: target.into(),
      configuration: None,
      overrides: None,
    }
  }

  pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
    self.configuration = Some(configuration.into());
    self
  }

  pub fn with_overrides(mut self, overrides: OptionBag) -> Self {
    self.overrides = Some(overrides);
    self
  }

  /// Parse `project:target[:configuration]`.
  ///
  /// Returns `None` if the project or target is missing or empty, or if
  /// there are more than three segments.
  pub fn parse(s: &str) -> Option<Self> {
    let mut parts = s.split(':');
    let project = parts.next().filter(|p| !p.is_empty())?;
    let target = parts.next().filter(|t| !t.is_empty())?;
    let configuration = parts.next();
    if parts.next().is_some() {
      return None;
    }

    let mut specifier = Self::new(project, target);
    if let Some(configuration) = configuration.filter(|c| !c.is_empty()) {
      specifier = specifier.with_configuration(configuration);
    }
    Some(specifier)
  }
}

impl fmt::Display for TargetSpecifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.project, self.target)?;
    if let Some(configuration) = &self.configuration {
      write!(f, ":{}", configuration)?;
    }
    Ok(())
  }
}

/// The composed input of a single builder invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfiguration {
  pub root: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_root: Option<String>,
  pub project_type: ProjectType,
  pub builder: String,
  pub options: OptionBag,
}
