//! Error type shared by the driver contracts and the tracing wrappers.

use thiserror::Error;

/// Opaque error produced by an underlying driver.
pub type BoxDynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced through the traced driver surface.
///
/// The wrappers never translate, swallow, or retry an underlying failure: a
/// [`Error::Driver`] value crosses this crate untouched. The only error this
/// crate raises on its own is [`Error::Unsupported`], emitted before the
/// underlying call is attempted when a named parameter reaches a driver that
/// only understands positional arguments.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying driver does not support named statement parameters.
    #[error("named parameters are not supported by the underlying driver")]
    Unsupported,

    /// An error reported by the underlying driver, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] BoxDynError),
}

impl Error {
    /// Wrap an underlying driver error.
    pub fn driver(err: impl Into<BoxDynError>) -> Self {
        Error::Driver(err.into())
    }
}
