//! File access used by every manifest read.

use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Asynchronous read-only view of the filesystem.
#[async_trait]
pub trait Host: Send + Sync {
  /// Read the full contents of `path`.
  async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`Host`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHost;

#[async_trait]
impl Host for FsHost {
  async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    tokio::fs::read(path).await
  }
}
