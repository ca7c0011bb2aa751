//! Reads rendered trees back into a [`SyntaxTree`]
//!
//! The input is the output of [`SyntaxTree::render`]: one node per line, nested by indentation.
//! A line containing an unescaped `:` is a terminal (`rule: lexeme`), any other line is a
//! non-terminal. Backslash escapes written by the renderer are decoded. Blank lines are ignored.
//! Auxiliary text of non-terminals isn't part of a rendering, so read non-terminals get an empty
//! value.

use std::borrow::Cow;

use thiserror::Error;

use crate::tree::{NodeId, RenderConfig, SyntaxTree, TreeBuilder, TreeError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("line {ln}: indentation is not a multiple of {indent}")]
    Misaligned { ln: usize, indent: usize },
    #[error("line {ln}: nested deeper than one level below its owner")]
    TooDeep { ln: usize },
    #[error("line {ln}: missing rule name")]
    MissingRule { ln: usize },
    #[error("line {ln}: invalid escape sequence")]
    BadEscape { ln: usize },
    #[error("line {ln}: second root node")]
    MultipleRoots { ln: usize },
    #[error("line {ln}: {err}")]
    Tree {
        ln: usize,
        #[source]
        err: TreeError,
    },
}

/// Reads a tree rendered with the default indentation
pub fn from_str(src: &str) -> Result<(SyntaxTree, Option<NodeId>), ReadError> {
    self::from_str_with(src, RenderConfig::default().indent)
}

/// Reads a tree rendered with `indent` spaces per level
pub fn from_str_with(
    src: &str,
    indent: usize,
) -> Result<(SyntaxTree, Option<NodeId>), ReadError> {
    self::read_into(TreeBuilder::new(), src, indent)
}

/// Reads into the builder's tree, e.g. one with a node limit
pub fn read_into(
    mut builder: TreeBuilder,
    src: &str,
    indent: usize,
) -> Result<(SyntaxTree, Option<NodeId>), ReadError> {
    // depth of the last terminal if it was the previous line
    let mut last_terminal: Option<usize> = None;

    for (i, line) in src.lines().enumerate() {
        let ln = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let text = line.trim_start_matches(' ');
        let spaces = line.len() - text.len();
        let depth = match indent {
            0 if spaces == 0 => 0,
            0 => return Err(ReadError::Misaligned { ln, indent }),
            _ if spaces % indent != 0 => return Err(ReadError::Misaligned { ln, indent }),
            _ => spaces / indent,
        };

        if depth == 0 && builder.root().is_some() {
            return Err(ReadError::MultipleRoots { ln });
        }

        if last_terminal.map_or(false, |d| depth == d + 1) {
            return Err(ReadError::Tree {
                ln,
                err: TreeError::InvalidOnTerminal,
            });
        }

        while builder.depth() > depth {
            builder.finish_node();
        }
        if builder.depth() < depth {
            return Err(ReadError::TooDeep { ln });
        }

        let res = match self::split_terminal(text) {
            Some((rule, lexeme)) => {
                last_terminal = Some(depth);
                let rule = self::read_rule(rule, ln)?;
                let lexeme = self::unescape(lexeme.strip_prefix(' ').unwrap_or(lexeme), ln)?;
                builder.token(&rule, &lexeme)
            }
            None => {
                last_terminal = None;
                let rule = self::read_rule(text.trim_end(), ln)?;
                builder.start_node(&rule, "")
            }
        };

        res.map_err(|err| ReadError::Tree { ln, err })?;
    }

    let (tree, root) = builder.finish();
    log::debug!("read {} node(s)", tree.len());
    Ok((tree, root))
}

/// Splits at the first `:` that isn't escaped
fn split_terminal(text: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ':' => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }

    None
}

fn read_rule(rule: &str, ln: usize) -> Result<Cow<'_, str>, ReadError> {
    if rule.is_empty() {
        return Err(ReadError::MissingRule { ln });
    }
    self::unescape(rule, ln)
}

/// Decodes escapes of [`render`](crate::tree::render)
fn unescape(s: &str, ln: usize) -> Result<Cow<'_, str>, ReadError> {
    if !s.contains('\\') {
        return Ok(Cow::Borrowed(s));
    }

    let mut decoded = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }

        decoded.push(match chars.next() {
            Some('\\') => '\\',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some(':') => ':',
            Some('s') => ' ',
            _ => return Err(ReadError::BadEscape { ln }),
        });
    }

    Ok(Cow::Owned(decoded))
}
