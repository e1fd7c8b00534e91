use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between receiving an input and drawing it.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong kind of argument, e.g. a string where an array was expected.
    #[error("{0}")]
    Type(String),

    /// The array has a dimensionality that cannot be displayed.
    #[error("{0}")]
    Shape(String),

    /// A numeric operation has no valid result for this input.
    #[error("{0}")]
    Domain(String),

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("unknown colormap '{0}'")]
    Colormap(String),

    /// The display subsystem failed to open or run a window.
    #[error("display failed: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
