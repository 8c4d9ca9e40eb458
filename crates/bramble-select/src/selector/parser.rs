//! Selector text compilation.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use super::{Combinator, CompoundSelector, Filter, NodeKind, Stage};

/// Invalid selector syntax. Distinct from a selector that matches nothing.
///
/// Positions are byte offsets into the selector text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Nothing but whitespace.
    #[error("empty selector")]
    Empty,

    /// A `>` with no selector after it, or two `>` in a row.
    #[error("combinator at {0} is not followed by a selector")]
    DanglingCombinator(usize),

    /// `.` or `#` without a name.
    #[error("missing class or id name at {0}")]
    EmptyName(usize),

    /// A character outside the supported grammar.
    #[error("unexpected character {ch:?} at {position}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Where it was found.
        position: usize,
    },

    /// A wildcard directly followed by a name, as in `*div`.
    #[error("wildcard at {0} cannot be combined with a tag name")]
    WildcardWithTag(usize),
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// Split selector text into stages, leftmost first.
pub(super) fn parse(input: &str) -> Result<Vec<Stage>, SelectorError> {
    let mut chars = input.char_indices().peekable();
    let mut stages = Vec::new();

    loop {
        let mut child_at = None;
        while let Some(&(position, c)) = chars.peek() {
            if c == '>' {
                if child_at.is_some() {
                    return Err(SelectorError::DanglingCombinator(position));
                }
                child_at = Some(position);
            } else if !c.is_whitespace() {
                break;
            }
            let _ = chars.next();
        }

        if chars.peek().is_none() {
            if let Some(position) = child_at {
                return Err(SelectorError::DanglingCombinator(position));
            }
            break;
        }

        let combinator = if child_at.is_some() {
            Combinator::Child
        } else {
            Combinator::Descendant
        };
        let compound = parse_compound(&mut chars)?;
        stages.push(Stage {
            combinator,
            filter: Filter::Compound(compound),
        });
    }

    if stages.is_empty() {
        Err(SelectorError::Empty)
    } else {
        Ok(stages)
    }
}

fn parse_compound(chars: &mut Chars<'_>) -> Result<CompoundSelector, SelectorError> {
    let kind = parse_kind(chars)?;
    let mut compound = CompoundSelector {
        kind,
        classes: Vec::new(),
        ids: Vec::new(),
    };

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() || c == '>' {
            break;
        }
        let _ = chars.next();
        let target = match c {
            '.' => &mut compound.classes,
            '#' => &mut compound.ids,
            _ => return Err(SelectorError::UnexpectedChar { ch: c, position }),
        };
        let name = read_name(chars);
        if name.is_empty() {
            return Err(SelectorError::EmptyName(position));
        }
        target.push(name.to_ascii_lowercase());
    }
    Ok(compound)
}

/// Leading wildcard or tag name. A compound that starts with `.` or `#`
/// accepts any element.
fn parse_kind(chars: &mut Chars<'_>) -> Result<NodeKind, SelectorError> {
    let Some(&(position, c)) = chars.peek() else {
        return Ok(NodeKind::AnyElement);
    };
    let kind = match c {
        '*' => {
            let _ = chars.next();
            if chars.next_if(|&(_, c)| c == '*').is_some() {
                NodeKind::AnyNode
            } else {
                NodeKind::AnyElement
            }
        }
        '$' => {
            let _ = chars.next();
            NodeKind::Text
        }
        '%' => {
            let _ = chars.next();
            NodeKind::Comment
        }
        '.' | '#' => return Ok(NodeKind::AnyElement),
        c if is_name_char(c) => return Ok(NodeKind::Tag(read_name(chars).to_ascii_lowercase())),
        c => return Err(SelectorError::UnexpectedChar { ch: c, position }),
    };

    match chars.peek() {
        Some(&(_, c)) if is_name_char(c) || matches!(c, '*' | '$' | '%') => {
            Err(SelectorError::WildcardWithTag(position))
        }
        _ => Ok(kind),
    }
}

fn read_name(chars: &mut Chars<'_>) -> String {
    let mut name = String::new();
    while let Some((_, c)) = chars.next_if(|&(_, c)| is_name_char(c)) {
        name.push(c);
    }
    name
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_') || !(c.is_ascii() || c.is_whitespace())
}
