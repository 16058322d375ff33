use thiserror::Error;

use crate::config::ConfigError;

/// Anything that stops the sky from opening. Once the loop runs nothing is fatal
/// except the GPU running out of memory.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
