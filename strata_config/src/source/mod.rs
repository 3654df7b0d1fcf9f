//! Configuration sources and the contract they share.

use crate::error::StrataResult;
use crate::value::Dict;

mod cli;
mod dict;
mod env;
mod json;


pub use cli::{CommandLineSource, partition_args};
pub use dict::DictSource;
pub use env::EnvSource;
pub use json::JsonSource;

/// A producer of one configuration tree.
///
/// Every source yields an object root; layering order, and therefore
/// precedence, is decided by the caller of [`resolve`](crate::resolve). All
/// expensive work (reading files, walking the environment snapshot) happens
/// inside [`get_config`](Self::get_config) so constructing a source is
/// always cheap and infallible.
pub trait ConfigSource {
    /// Produce this source's tree.
    ///
    /// # Errors
    ///
    /// Returns a source-specific [`StrataError`](crate::StrataError):
    /// structural errors from flat-key parsing, parse or I/O errors from
    /// JSON sources, or syntax errors from command-line arguments.
    fn get_config(&self) -> StrataResult<Dict>;

    /// Short name used when routing failures to the diagnostic sink.
    fn name(&self) -> &'static str;
}
