use std::path::PathBuf;

use crate::consts::{APP_NAME, PACKAGE_PATH_ENV};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> Option<PathBuf> {
  let data_home = std::env::var_os("XDG_DATA_HOME")
    .map(PathBuf::from)
    .or_else(|| home_dir().map(|home| home.join(".local").join("share")))?;
  Some(data_home.join(APP_NAME))
}

/// Returns the directory holding packages installed for every workspace
pub fn global_packages_dir() -> Option<PathBuf> {
  data_dir().map(|dir| dir.join("packages"))
}

/// Environment-wide package search roots, in lookup order.
///
/// Entries from `WRIGHT_PACKAGE_PATH` come first, followed by the
/// global packages directory.
pub fn package_search_paths() -> Vec<PathBuf> {
  let mut paths: Vec<PathBuf> = std::env::var_os(PACKAGE_PATH_ENV)
    .map(|value| std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
    .unwrap_or_default();

  if let Some(global) = global_packages_dir() {
    paths.push(global);
  }

  paths
}
