//! In-memory dictionary source.

use crate::error::StrataResult;
use crate::source::ConfigSource;
use crate::value::Dict;

/// Source wrapping a pre-built tree, typically in-code defaults.
///
/// Layer it first so every other source overrides it.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigSource, Dict, DictSource, Value};
///
/// let mut defaults = Dict::new();
/// defaults.insert("retries".to_owned(), Value::Integer(3));
/// let tree = DictSource::new(defaults).get_config()?;
/// assert_eq!(tree.get("retries"), Some(&Value::Integer(3)));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DictSource {
    entries: Dict,
}

impl DictSource {
    /// Wrap an existing tree.
    #[must_use]
    pub const fn new(entries: Dict) -> Self {
        Self { entries }
    }
}

impl ConfigSource for DictSource {
    fn get_config(&self) -> StrataResult<Dict> {
        Ok(self.entries.clone())
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}
