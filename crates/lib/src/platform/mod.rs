//! Platform-specific directories and search paths.

pub mod paths;
