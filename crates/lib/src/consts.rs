/// Application name used for platform directories.
pub const APP_NAME: &str = "wright";

/// Workspace file name, searched for from the current directory upwards.
pub const WORKSPACE_FILENAME: &str = "wright.json";

/// Current workspace file format version.
pub const WORKSPACE_VERSION: u32 = 1;

/// Package manifest file name inside a package directory.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Default name of the local package directory.
pub const MODULES_DIR: &str = "node_modules";

/// Overrides the workspace file location.
pub const WORKSPACE_ENV: &str = "WRIGHT_WORKSPACE";

/// Extra environment-wide package search roots.
pub const PACKAGE_PATH_ENV: &str = "WRIGHT_PACKAGE_PATH";
