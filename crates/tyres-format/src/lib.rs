//! Type name formatting and parsing.
//!
//! Two directions share one set of naming conventions:
//! - descriptor -> string: per-level names joined by the nested splitter, with
//!   generic arguments apportioned to the level that declares them
//!   (`Outer<Int32>.Inner<String>`, or `Outer<>.Inner<>` for definitions)
//! - string -> tree: a `NameNode` hierarchy parsed from free text, and the
//!   arity-erased lookup key derived from it (`Outer<>`)
//!
//! The catalog stores definitions under the descriptor direction and the
//! resolver looks them up through the tree direction, so both must agree on
//! every key.

// Formatting strategies
pub mod formatter;
pub use formatter::{FullNameFormatter, NamingStrategy, ShortNameFormatter, TypeNameFormatter};

// Name hierarchy tree and parser
pub mod hierarchy;
pub use hierarchy::{NameNode, parse_hierarchy};

// Nested name composition
pub mod compose;
pub use compose::{LevelArguments, format_type_name, nesting_generic_arguments};

pub mod error;
pub use error::NameParseError;
