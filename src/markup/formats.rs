//! Output formats for parsed nodes
//!
//! - `markup`: the nodes rendered back to markup text
//! - `json`, `yaml`: the serde representation of the node tree
//! - `treeviz`: one line per node, for eyeballing structure

pub mod data;
pub mod markup;
pub mod registry;
pub mod treeviz;

pub use data::{JsonFormatter, YamlFormatter};
pub use markup::MarkupFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
