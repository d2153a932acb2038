use thiserror::Error;

/// Malformed type name text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameParseError {
    #[error("type name is empty")]
    Empty,

    #[error("unbalanced generic brackets in '{text}'")]
    UnbalancedBrackets { text: String },

    #[error("missing type name in '{text}'")]
    MissingName { text: String },

    /// `Map<,int>`: a generic list is either fully open or fully closed.
    #[error("open and closed generic arguments mixed in '{text}'")]
    MixedPlaceholders { text: String },

    #[error("unexpected '{found}' after generic arguments in '{text}'")]
    TrailingText { text: String, found: String },

    #[error("comma outside a generic argument list in '{text}'")]
    UnexpectedComma { text: String },
}
