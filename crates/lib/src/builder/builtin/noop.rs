use futures::StreamExt;
use futures::stream;
use tracing::info;

use crate::builder::{BuildEvent, BuildOutput, Builder, BuilderContext};
use crate::target::BuilderConfiguration;

/// Reports a single success without doing anything.
#[derive(Debug)]
pub struct NoopBuilder {
  context: BuilderContext,
}

impl NoopBuilder {
  pub fn factory(context: BuilderContext) -> Box<dyn Builder> {
    Box::new(Self { context })
  }
}

impl Builder for NoopBuilder {
  fn run(&self, config: BuilderConfiguration) -> BuildOutput {
    self.context.logger.in_scope(|| {
      info!(builder = %config.builder, root = %config.root, "noop builder");
    });
    stream::iter([BuildEvent::success()]).boxed()
  }
}
