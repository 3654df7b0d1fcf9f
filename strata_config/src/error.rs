//! Error taxonomy for configuration resolution.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::path::KeyPath;

/// Convenience alias for results carrying a [`StrataError`].
pub type StrataResult<T> = Result<T, StrataError>;

/// Errors that can occur while resolving configuration.
///
/// Every variant is fatal to the resolution it arose in: errors are only
/// recovered at the [`bootstrap`](crate::ConfigManager::bootstrap) or
/// [`resolve`](crate::resolve) boundary and there is no partial or degraded
/// configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// The global configuration was read before `bootstrap` published it.
    #[error("configuration read before bootstrap")]
    BootstrapRequired,

    /// `bootstrap` was called while a configuration was already published.
    #[error("configuration already bootstrapped")]
    AlreadyBootstrapped,

    /// A flat key implies a container kind conflicting with an earlier key.
    #[error("key '{key}' conflicts with the structure at '{path}'")]
    AmbiguousStructure {
        /// Raw key whose walk hit the conflict.
        key: String,
        /// Position holding the incompatible container or scalar.
        path: KeyPath,
    },

    /// Two flat keys assign the same leaf.
    #[error("key '{key}' assigns '{path}' twice")]
    DuplicateKey {
        /// Raw key whose assignment collided.
        key: String,
        /// Leaf position assigned more than once.
        path: KeyPath,
    },

    /// A command-line configuration argument lacks the `key=value` shape.
    #[error("malformed configuration argument '{argument}': expected key=value")]
    MalformedArgument {
        /// The offending argument, prefix included.
        argument: String,
    },

    /// A JSON source failed to parse.
    #[error("failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A file-backed source failed to read its file.
    #[error("failed to read configuration file '{path}': {source}")]
    File {
        /// Path that could not be read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A non-optional field had no value (absent or explicit null).
    #[error("missing required configuration value at '{path}'")]
    MissingRequiredField {
        /// Full path of the missing value.
        path: KeyPath,
    },

    /// A value's kind did not match the declared target type.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Full path of the mismatched value.
        path: KeyPath,
        /// What the target type required.
        expected: &'static str,
        /// What the tree held, or the unparseable text.
        found: String,
    },

    /// A string failed boolean coercion.
    #[error("invalid boolean literal at '{path}': '{value}'")]
    InvalidBooleanLiteral {
        /// Full path of the offending value.
        path: KeyPath,
        /// The text that is neither truthy nor falsy.
        value: String,
    },

    /// A decode failure minted by serde rather than the coercion layer.
    #[error("decode error at '{path}': {message}")]
    Decode {
        /// Nearest enclosing path known when the error surfaced.
        path: KeyPath,
        /// Message produced by the target type's `Deserialize` impl.
        message: String,
    },
}

impl StrataError {
    /// Attach `path` to an error that surfaced without one.
    ///
    /// Only [`StrataError::Decode`] values minted through
    /// [`serde::de::Error::custom`] lack a location; everything else keeps
    /// the more precise path it already carries.
    #[must_use]
    pub fn at(self, path: &KeyPath) -> Self {
        match self {
            Self::Decode { path: known, message } if known.is_root() => Self::Decode {
                path: path.clone(),
                message,
            },
            other => other,
        }
    }
}

impl serde::de::Error for StrataError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Decode {
            path: KeyPath::new(),
            message: msg.to_string(),
        }
    }
}
