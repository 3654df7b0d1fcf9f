//! Command-line argument source.

use crate::error::{StrataError, StrataResult};
use crate::flat::FlatKeyParser;
use crate::source::ConfigSource;
use crate::value::Dict;

/// Default token marking an argument as configuration.
const DEFAULT_PREFIX: &str = "--config:";

/// Separator between path segments in command-line keys.
const CLI_SEPARATOR: char = '.';

/// Source reading `--config:section.field=value` arguments.
///
/// Arguments carrying the prefix token are stripped of it and split at the
/// first `=` into a flat key and a value; the value may itself contain
/// further `=` characters. Arguments without the token are ignored, but an
/// argument that carries it without an `=` is a fatal
/// [`MalformedArgument`](StrataError::MalformedArgument) — bad syntax is
/// never silently skipped.
///
/// # Examples
///
/// ```
/// use strata_config::{CommandLineSource, ConfigSource, Value};
///
/// let source = CommandLineSource::with_args(["--config:server.host=localhost"]);
/// let tree = source.get_config()?;
/// let host = tree.get("server").and_then(|server| server.get("host"));
/// assert_eq!(host, Some(&Value::from("localhost")));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineSource {
    args: Vec<String>,
    prefix: String,
}

impl CommandLineSource {
    /// Snapshot the process arguments, skipping the program name.
    #[must_use]
    pub fn from_args() -> Self {
        Self::with_args(std::env::args().skip(1))
    }

    /// Use the given arguments instead of the process arguments.
    pub fn with_args<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            prefix: DEFAULT_PREFIX.to_owned(),
        }
    }

    /// Replace the default `--config:` token.
    #[must_use]
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Split one matching argument into its key and value.
    fn entry(&self, argument: &str) -> Option<StrataResult<(String, String)>> {
        let rest = argument.strip_prefix(&self.prefix)?;
        Some(
            rest.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .ok_or_else(|| StrataError::MalformedArgument {
                    argument: argument.to_owned(),
                }),
        )
    }
}

impl ConfigSource for CommandLineSource {
    fn get_config(&self) -> StrataResult<Dict> {
        let entries = self
            .args
            .iter()
            .filter_map(|argument| self.entry(argument))
            .collect::<StrataResult<Vec<_>>>()?;
        FlatKeyParser::new(CLI_SEPARATOR).parse(entries)
    }

    fn name(&self) -> &'static str {
        "command line"
    }
}

/// Split `args` into configuration arguments and everything else.
///
/// The first vector holds arguments starting with `prefix`, verbatim; the
/// second holds the remainder in their original order, ready for the
/// application's own argument parser.
///
/// # Examples
///
/// ```
/// use strata_config::partition_args;
///
/// let (config, rest) = partition_args(
///     ["--verbose".to_owned(), "--config:port=80".to_owned()],
///     "--config:",
/// );
/// assert_eq!(config, ["--config:port=80"]);
/// assert_eq!(rest, ["--verbose"]);
/// ```
#[must_use]
pub fn partition_args<I>(args: I, prefix: &str) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .partition(|argument| argument.starts_with(prefix))
}
