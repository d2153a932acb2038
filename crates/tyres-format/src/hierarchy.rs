//! Name hierarchy parsing.
//!
//! Grammar accepted by the parser:
//!
//! ```text
//! name     := ident ( '<' args '>' ( SPLIT name )? )?
//! args     := arg ( ',' arg )*
//! arg      := name | ''            // empty = open placeholder
//! ```
//!
//! `ident` is any text without `<`, `>` or `,` and may contain the nested
//! splitter itself (`Shop.Orders.Order`, `Outer.Inner`). Brackets are matched
//! by depth, so commas only separate arguments at the top level of the
//! enclosing list.
//!
//! Malformed input (unbalanced brackets, missing names, stray text after a
//! closing bracket) is rejected with a [`NameParseError`] rather than being
//! split on a best-effort basis.

use crate::error::NameParseError;
use std::fmt;

/// Parsed type name: `{ name, generics, nested }`.
///
/// `Outer<Inner>.Nested` parses to
/// `{ name: "Outer", generics: [{ name: "Inner" }], nested: { name: "Nested" } }`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameNode {
    /// Trimmed name; empty only for open placeholders inside a generic list.
    pub name: String,
    pub generics: Vec<NameNode>,
    /// Name following the closing bracket, nested inside this type.
    pub nested: Option<Box<NameNode>>,
}

impl NameNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
            nested: None,
        }
    }

    pub fn generic(name: impl Into<String>, generics: Vec<NameNode>) -> Self {
        Self {
            name: name.into(),
            generics,
            nested: None,
        }
    }

    pub fn with_nested(mut self, nested: NameNode) -> Self {
        self.nested = Some(Box::new(nested));
        self
    }

    /// Open placeholder (`Box<>` has one, `Box<,>` has two).
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty() && self.generics.is_empty() && self.nested.is_none()
    }

    /// Generic with only open placeholders as arguments.
    pub fn is_open(&self) -> bool {
        !self.generics.is_empty() && self.generics.iter().all(NameNode::is_placeholder)
    }

    pub fn arity(&self) -> usize {
        self.generics.len()
    }
}

impl fmt::Display for NameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            for (index, generic) in self.generics.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{generic}")?;
            }
            f.write_str(">")?;
        }
        if let Some(nested) = &self.nested {
            write!(f, ".{nested}")?;
        }
        Ok(())
    }
}

/// Parse `text` using `.` as the nested splitter.
pub fn parse_hierarchy(text: &str) -> Result<NameNode, NameParseError> {
    parse_hierarchy_with(text, '.')
}

/// Parse `text` into a [`NameNode`] tree.
pub fn parse_hierarchy_with(text: &str, splitter: char) -> Result<NameNode, NameParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NameParseError::Empty);
    }
    Parser { source: text, splitter }.node(trimmed)
}

struct Parser<'a> {
    source: &'a str,
    splitter: char,
}

impl Parser<'_> {
    fn node(&self, span: &str) -> Result<NameNode, NameParseError> {
        let span = span.trim();
        let Some(open) = span.find('<') else {
            return self.leaf(span);
        };

        let name = span[..open].trim();
        if name.is_empty() || name.contains(['>', ',']) {
            return Err(NameParseError::MissingName {
                text: self.source.to_string(),
            });
        }

        let close = matching_close(span, open).ok_or_else(|| self.unbalanced())?;
        let generics = split_top_level(&span[open + 1..close])
            .into_iter()
            .map(|segment| {
                if segment.trim().is_empty() {
                    Ok(NameNode::placeholder())
                } else {
                    self.node(segment)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let placeholders = generics.iter().filter(|g| g.is_placeholder()).count();
        if placeholders != 0 && placeholders != generics.len() {
            return Err(NameParseError::MixedPlaceholders {
                text: self.source.to_string(),
            });
        }

        let mut node = NameNode::generic(name, generics);
        let rest = span[close + 1..].trim();
        if !rest.is_empty() {
            let Some(nested) = rest.strip_prefix(self.splitter) else {
                return Err(NameParseError::TrailingText {
                    text: self.source.to_string(),
                    found: rest.to_string(),
                });
            };
            if nested.trim().is_empty() {
                return Err(NameParseError::MissingName {
                    text: self.source.to_string(),
                });
            }
            node = node.with_nested(self.node(nested)?);
        }
        Ok(node)
    }

    fn leaf(&self, span: &str) -> Result<NameNode, NameParseError> {
        if span.contains('>') {
            return Err(self.unbalanced());
        }
        if span.contains(',') {
            return Err(NameParseError::UnexpectedComma {
                text: self.source.to_string(),
            });
        }
        if span.is_empty() {
            return Err(NameParseError::MissingName {
                text: self.source.to_string(),
            });
        }
        Ok(NameNode::leaf(span))
    }

    fn unbalanced(&self) -> NameParseError {
        NameParseError::UnbalancedBrackets {
            text: self.source.to_string(),
        }
    }
}

/// Byte index of the `>` closing the `<` at `open`.
fn matching_close(span: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, chr) in span[open..].char_indices() {
        match chr {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a generic argument list on commas at nesting depth zero.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, chr) in list.char_indices() {
        match chr {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&list[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    segments.push(&list[start..]);
    segments
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
