//! Environment variable source.

use uncased::UncasedStr;

use crate::error::StrataResult;
use crate::flat::FlatKeyParser;
use crate::source::ConfigSource;
use crate::value::Dict;

/// Separator between path segments in environment keys.
const ENV_SEPARATOR: char = '_';

/// Source reading flat `SECTION_SUB_FIELD` keys from the environment.
///
/// An optional prefix restricts the source to variables starting with
/// `PREFIX_` (matched case-insensitively); the prefix is stripped before
/// parsing and non-matching variables are dropped.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigSource, EnvSource, Value};
///
/// let source = EnvSource::with_data([("APP_SERVER_HOST", "localhost")])
///     .with_prefix("APP");
/// let tree = source.get_config()?;
/// let host = tree.get("server").and_then(|server| server.get("host"));
/// assert_eq!(host, Some(&Value::from("localhost")));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EnvSource {
    entries: Option<Vec<(String, String)>>,
    prefix: Option<String>,
}

impl EnvSource {
    /// Read the process environment, snapshotted inside
    /// [`get_config`](ConfigSource::get_config). Non-UTF-8 pairs are
    /// skipped.
    #[must_use]
    pub const fn from_env() -> Self {
        Self {
            entries: None,
            prefix: None,
        }
    }

    /// Use the given pairs instead of the process environment.
    pub fn with_data<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Some(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
            prefix: None,
        }
    }

    /// Keep only variables carrying `prefix` and strip it before parsing.
    ///
    /// Trailing underscores on the prefix are ignored, so `APP` and `APP_`
    /// select the same variables.
    #[must_use]
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        let raw: String = prefix.into();
        self.prefix = Some(raw.trim_end_matches(ENV_SEPARATOR).to_owned());
        self
    }

    /// Strip the leading `prefix_` from `key` when it matches.
    fn strip(key: &str, prefix: &str) -> Option<String> {
        let split = prefix.len().checked_add(1)?;
        let head = key.get(..split)?;
        let wanted = format!("{prefix}{ENV_SEPARATOR}");
        (UncasedStr::new(head) == UncasedStr::new(&wanted))
            .then(|| key.get(split..))?
            .map(str::to_owned)
    }
}

impl ConfigSource for EnvSource {
    fn get_config(&self) -> StrataResult<Dict> {
        let snapshot = self.entries.clone().unwrap_or_else(|| {
            std::env::vars_os()
                .filter_map(|(key, value)| {
                    Some((key.into_string().ok()?, value.into_string().ok()?))
                })
                .collect()
        });
        let entries = snapshot.into_iter().filter_map(|(key, value)| {
            let parsed = match &self.prefix {
                Some(prefix) => Self::strip(&key, prefix)?,
                None => key,
            };
            Some((parsed, value))
        });
        FlatKeyParser::new(ENV_SEPARATOR).parse(entries)
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}
