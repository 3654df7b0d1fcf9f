//! Layered configuration resolution.
//!
//! `strata_config` turns heterogeneous configuration sources — in-code
//! defaults, JSON documents, environment variables, command-line arguments —
//! into one validated, strongly typed value, published once per process.
//!
//! Resolution runs in three stages:
//!
//! 1. each [`ConfigSource`] produces an untyped [`Value`] tree (flat
//!    `SECTION_SUB_0_FIELD` keys are unflattened by [`FlatKeyParser`]);
//! 2. the trees are folded in source order with [`merge_value`], later
//!    sources overriding earlier ones field by field;
//! 3. the fold is decoded onto a `#[derive(Deserialize)]` struct, coercing
//!    string scalars into the declared types and reporting every failure
//!    with the full dot-joined path of the offending value.
//!
//! [`ConfigManager`] wraps the pipeline in a bootstrap-once cell suitable
//! for a `static`.
//!
//! # Examples
//!
//! ```
//! use serde::Deserialize;
//! use strata_config::{CommandLineSource, EnvSource, JsonSource, resolve};
//!
//! #[derive(Debug, Deserialize)]
//! struct ServerConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     server: ServerConfig,
//! }
//!
//! let defaults = JsonSource::new(br#"{"server": {"host": "0.0.0.0", "port": 80}}"#.to_vec());
//! let env = EnvSource::with_data([("APP_SERVER_PORT", "8080")]).with_prefix("APP");
//! let cli = CommandLineSource::with_args(["--config:server.host=localhost"]);
//!
//! let config: AppConfig = resolve(&[&defaults, &env, &cli])?;
//! assert_eq!(config.server.host, "localhost");
//! assert_eq!(config.server.port, 8080);
//! # Ok::<_, strata_config::StrataError>(())
//! ```

mod decode;
mod error;
mod flat;
mod manager;
mod merge;
mod path;
mod source;
mod value;

pub use decode::{from_dict, from_value};
pub use error::{StrataError, StrataResult};
pub use flat::FlatKeyParser;
pub use manager::{ConfigManager, resolve};
pub use merge::{merge_dict, merge_value};
pub use path::{KeyPath, Segment};
pub use source::{
    CommandLineSource, ConfigSource, DictSource, EnvSource, JsonSource, partition_args,
};
pub use value::{Dict, Lookup, Value};
