//! JSON buffer and file sources.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{StrataError, StrataResult};
use crate::source::ConfigSource;
use crate::value::Dict;

/// Where the JSON bytes come from.
#[derive(Debug, Clone)]
enum Payload {
    Buffer(Vec<u8>),
    File(Utf8PathBuf),
}

/// Source parsing a JSON document with an object root.
///
/// JSON `null` maps to the tree's explicit null; a non-object root is a
/// parse error. File-backed sources read lazily inside
/// [`get_config`](ConfigSource::get_config) so I/O failures surface as
/// source errors during resolution rather than at construction.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigSource, JsonSource, Value};
///
/// let source = JsonSource::new(br#"{"server": {"port": 80}}"#.to_vec());
/// let tree = source.get_config()?;
/// let port = tree.get("server").and_then(|server| server.get("port"));
/// assert_eq!(port, Some(&Value::Integer(80)));
/// # Ok::<_, strata_config::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonSource {
    payload: Payload,
}

impl JsonSource {
    /// Parse the given byte buffer.
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self {
            payload: Payload::Buffer(bytes.into()),
        }
    }

    /// Read and parse the file at `path` during `get_config`.
    pub fn from_file<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            payload: Payload::File(path.as_ref().to_owned()),
        }
    }
}

impl ConfigSource for JsonSource {
    fn get_config(&self) -> StrataResult<Dict> {
        let parsed = match &self.payload {
            Payload::Buffer(bytes) => serde_json::from_slice(bytes)?,
            Payload::File(path) => {
                let bytes = std::fs::read(path).map_err(|source| StrataError::File {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_slice(&bytes)?
            }
        };
        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
