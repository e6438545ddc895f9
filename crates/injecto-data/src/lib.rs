//! Data layer for Injecto.
//!
//! Loads YAML (or JSON) value files, deep-merges them into a single
//! [`DataTree`], resolves dotted paths against it and renders resolved
//! values as literal text for insertion into configuration files.
//!
//! # Example
//!
//! ```
//! use injecto_data::{DataSource, format_value, load_and_merge};
//!
//! let sources = [
//!     DataSource::inline("base", "db:\n  host: localhost\n  port: 5432\n"),
//!     DataSource::inline("prod", "db:\n  port: 9000\n"),
//! ];
//! let data = load_and_merge(&sources).unwrap();
//!
//! let port = data.resolve("db.port").unwrap();
//! assert_eq!(format_value(port).unwrap(), "9000");
//! assert_eq!(format_value(data.resolve("db.host").unwrap()).unwrap(), "\"localhost\"");
//! ```

mod format;
mod merge;
mod source;
mod tree;

pub use format::{FormatError, format_value};
pub use merge::{deep_merge, load_and_merge};
pub use source::{DataError, DataSource};
pub use tree::DataTree;

pub use serde_yaml::{Mapping, Value};
