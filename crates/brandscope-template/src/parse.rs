//! Template source → node tree
//!
//! Three passes: split into text and tags, strip standalone block lines, then
//! nest blocks.

use crate::error::TemplateError;
use brandscope_schema::FieldPath;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// What a tag points at
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reference {
    /// Path from the root input record
    Field(FieldPath),
    /// Path from the current `#each` element; empty means the element itself
    This(FieldPath),
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(path) => write!(f, "{path}"),
            Self::This(path) if path.is_empty() => f.write_str("this"),
            Self::This(path) => write!(f, "this.{path}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    If,
    Each,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::If => "if",
            Self::Each => "each",
        }
    }

    fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "if" => Some(Self::If),
            "each" => Some(Self::Each),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tag {
    Value(Reference),
    Open(BlockKind, Reference),
    Close(BlockKind),
}

impl Tag {
    fn is_block(&self) -> bool {
        matches!(self, Self::Open(..) | Self::Close(_))
    }
}

#[derive(Debug)]
enum Piece {
    Text(String),
    Tag(Tag, usize),
}

/// Parsed template element
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Value(Reference),
    If {
        condition: Reference,
        body: Vec<Node>,
    },
    Each {
        list: Reference,
        body: Vec<Node>,
    },
}

pub(crate) fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut pieces = tokenize(source)?;
    strip_standalone(&mut pieces);
    nest(pieces)
}

fn tokenize(source: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut rest = source;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            pieces.push(Piece::Text(rest[..start].to_string()));
        }
        let offset = consumed + start;
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open
            .find(CLOSE)
            .ok_or(TemplateError::UnterminatedTag { offset })?;
        let tag = parse_tag(&after_open[..end], offset)?;
        pieces.push(Piece::Tag(tag, offset));

        let advance = start + OPEN.len() + end + CLOSE.len();
        consumed += advance;
        rest = &rest[advance..];
    }
    if !rest.is_empty() {
        pieces.push(Piece::Text(rest.to_string()));
    }
    Ok(pieces)
}

fn parse_tag(body: &str, offset: usize) -> Result<Tag, TemplateError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::EmptyTag { offset });
    }
    let invalid = || TemplateError::InvalidTag {
        body: trimmed.to_string(),
        offset,
    };

    if let Some(open) = trimmed.strip_prefix('#') {
        let mut words = open.split_whitespace();
        let kind = words.next().and_then(BlockKind::parse).ok_or_else(invalid)?;
        let target = words.next().ok_or_else(invalid)?;
        if words.next().is_some() {
            return Err(invalid());
        }
        return Ok(Tag::Open(kind, parse_reference(target, offset)?));
    }

    if let Some(close) = trimmed.strip_prefix('/') {
        let kind = BlockKind::parse(close.trim()).ok_or_else(invalid)?;
        return Ok(Tag::Close(kind));
    }

    if trimmed.contains(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(Tag::Value(parse_reference(trimmed, offset)?))
}

fn parse_reference(text: &str, offset: usize) -> Result<Reference, TemplateError> {
    let to_path = |s: &str| {
        FieldPath::from_str(s).map_err(|source| TemplateError::InvalidPath { offset, source })
    };

    if text == "this" {
        return Ok(Reference::This(FieldPath::root()));
    }
    if let Some(rest) = text.strip_prefix("this.") {
        return Ok(Reference::This(to_path(rest)?));
    }
    Ok(Reference::Field(to_path(text)?))
}

/// Drop the line a block tag sits on when nothing else shares that line
fn strip_standalone(pieces: &mut [Piece]) {
    let last = pieces.len().saturating_sub(1);
    let standalone: Vec<bool> = (0..pieces.len())
        .map(|i| {
            let Piece::Tag(tag, _) = &pieces[i] else {
                return false;
            };
            if !tag.is_block() {
                return false;
            }
            let before = i == 0
                || matches!(&pieces[i - 1], Piece::Text(text)
                    if line_tail_blank(text) && (text.contains('\n') || i - 1 == 0));
            let after = i == last
                || matches!(&pieces[i + 1], Piece::Text(text)
                    if line_head_blank(text) && (text.contains('\n') || i + 1 == last));
            before && after
        })
        .collect();

    for i in 0..pieces.len() {
        let trim_head = i > 0 && standalone[i - 1];
        let trim_tail = i < last && standalone[i + 1];
        if let Piece::Text(text) = &mut pieces[i] {
            if !trim_head && !trim_tail {
                continue;
            }
            let start = if trim_head {
                text.find('\n').map_or(text.len(), |p| p + 1)
            } else {
                0
            };
            let end = if trim_tail {
                text.rfind('\n').map_or(0, |p| p + 1)
            } else {
                text.len()
            };
            *text = if start <= end {
                text[start..end].to_string()
            } else {
                String::new()
            };
        }
    }
}

fn line_tail_blank(text: &str) -> bool {
    let tail = text.rfind('\n').map_or(text, |p| &text[p + 1..]);
    tail.chars().all(|c| c == ' ' || c == '\t')
}

fn line_head_blank(text: &str) -> bool {
    let head = text.find('\n').map_or(text, |p| &text[..p]);
    head.chars().all(|c| c == ' ' || c == '\t' || c == '\r')
}

struct OpenBlock {
    kind: BlockKind,
    target: Reference,
    offset: usize,
    outer: Vec<Node>,
}

fn nest(pieces: Vec<Piece>) -> Result<Vec<Node>, TemplateError> {
    let mut stack: Vec<OpenBlock> = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Text(text) if text.is_empty() => {}
            Piece::Text(text) => current.push(Node::Text(text)),
            Piece::Tag(Tag::Value(reference), _) => current.push(Node::Value(reference)),
            Piece::Tag(Tag::Open(kind, target), offset) => {
                stack.push(OpenBlock {
                    kind,
                    target,
                    offset,
                    outer: std::mem::take(&mut current),
                });
            }
            Piece::Tag(Tag::Close(kind), offset) => {
                let open = stack.pop().ok_or(TemplateError::UnexpectedClose {
                    kind: kind.keyword(),
                    offset,
                })?;
                if open.kind != kind {
                    return Err(TemplateError::MismatchedClose {
                        expected: open.kind.keyword(),
                        found: kind.keyword(),
                        offset,
                    });
                }
                let body = std::mem::replace(&mut current, open.outer);
                current.push(match kind {
                    BlockKind::If => Node::If {
                        condition: open.target,
                        body,
                    },
                    BlockKind::Each => Node::Each {
                        list: open.target,
                        body,
                    },
                });
            }
        }
    }

    match stack.pop() {
        Some(open) => Err(TemplateError::UnclosedBlock {
            kind: open.kind.keyword(),
            offset: open.offset,
        }),
        None => Ok(current),
    }
}
