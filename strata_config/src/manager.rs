//! Resolution pipeline and the bootstrap-once configuration cell.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;

use crate::decode;
use crate::error::{StrataError, StrataResult};
use crate::merge::merge_dict;
use crate::source::ConfigSource;
use crate::value::Dict;

/// Resolve sources into a typed configuration value.
///
/// Sources are consulted in list order and folded with the deep merge,
/// later sources taking precedence; the fold is then decoded into `T`. The
/// first source failure aborts resolution: it is routed to the diagnostic
/// sink with the source's name and position, then propagated, and the
/// partial fold is discarded.
///
/// # Errors
///
/// Returns the failing source's error, or a decode-level error when the
/// merged tree does not fit `T`.
pub fn resolve<T: DeserializeOwned>(sources: &[&dyn ConfigSource]) -> StrataResult<T> {
    let mut merged = Dict::new();
    for (position, source) in sources.iter().enumerate() {
        let tree = source.get_config().map_err(|error| {
            tracing::error!(
                source = source.name(),
                position,
                %error,
                "configuration source failed",
            );
            error
        })?;
        merge_dict(&mut merged, tree);
    }
    decode::from_dict(merged)
}

/// Bootstrap-once holder of the resolved configuration.
///
/// The cell is designed for `static` placement: [`new`](Self::new) is
/// `const`, and publication goes through a [`OnceLock`] so concurrent
/// bootstrap attempts race safely — exactly one wins, every loser reports
/// [`AlreadyBootstrapped`](StrataError::AlreadyBootstrapped) and the
/// published value is never disturbed. There is no reset; the transition
/// to the bootstrapped state is terminal.
///
/// # Examples
///
/// ```
/// use serde::Deserialize;
/// use strata_config::{ConfigManager, DictSource, EnvSource};
///
/// #[derive(Debug, Deserialize)]
/// struct AppConfig {
///     name: Option<String>,
/// }
///
/// static CONFIG: ConfigManager<AppConfig> = ConfigManager::new();
///
/// let env = EnvSource::with_data([("NAME", "demo")]);
/// CONFIG.bootstrap(&[&env])?;
/// assert_eq!(CONFIG.global()?.name.as_deref(), Some("demo"));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug)]
pub struct ConfigManager<T> {
    cell: OnceLock<T>,
}

impl<T: DeserializeOwned> ConfigManager<T> {
    /// An unbootstrapped cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Resolve `sources` and publish the result.
    ///
    /// # Errors
    ///
    /// Fails with [`StrataError::AlreadyBootstrapped`] when a value is
    /// already published (the existing value is left untouched), or with
    /// whatever [`resolve`] reports. A failed resolution leaves the cell
    /// unbootstrapped, so a corrected caller may try again.
    pub fn bootstrap(&self, sources: &[&dyn ConfigSource]) -> StrataResult<()> {
        if self.is_bootstrapped() {
            return Err(StrataError::AlreadyBootstrapped);
        }
        let resolved = resolve(sources)?;
        self.cell
            .set(resolved)
            .map_err(|_| StrataError::AlreadyBootstrapped)?;
        tracing::debug!("configuration published");
        Ok(())
    }

    /// The published configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`StrataError::BootstrapRequired`] before publication.
    pub fn global(&self) -> StrataResult<&T> {
        self.cell.get().ok_or(StrataError::BootstrapRequired)
    }

    /// The published configuration, or `None` before publication.
    #[must_use]
    pub fn try_get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Whether a configuration has been published.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: DeserializeOwned> Default for ConfigManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
