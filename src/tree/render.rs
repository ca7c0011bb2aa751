//! Indented, human-readable rendering of a syntax tree
//!
//! ```text
//! Program
//!   Assign
//!     Identifier: x
//!     Number: 1
//! ```
//!
//! Non-terminals print their rule name, terminals print `rule: lexeme`. Children are nested one
//! level deeper, in slot order. Vacant slots are skipped.
//!
//! Characters that would break the line structure are escaped with a backslash: `\\`, `\n`,
//! `\r` and `\t` everywhere, plus `\:` and `\s` (space) in rule names. Plain identifiers and
//! lexemes print as they are.

use std::{borrow::Cow, fmt, io};

use crate::tree::{Node, NodeId, SyntaxTree};

#[cfg(feature = "color")]
pub const QUOTE: colored::Color = colored::Color::BrightBlue;

/// Largest accepted [`RenderConfig::indent`] on the command line
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Highlights rule names and lexemes. Ignored without the `color` feature
    pub color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            color: false,
        }
    }
}

impl SyntaxTree {
    /// Renders the subtree at `root` with the default [`RenderConfig`]
    ///
    /// `None` and released roots render nothing.
    pub fn render(
        &self,
        root: impl Into<Option<NodeId>>,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        self.render_with(root, &RenderConfig::default(), out)
    }

    pub fn render_with(
        &self,
        root: impl Into<Option<NodeId>>,
        cfg: &RenderConfig,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        let mut stack = match root.into() {
            Some(root) => vec![(root, 0usize)],
            None => return Ok(()),
        };

        // pre-order
        while let Some((id, depth)) = stack.pop() {
            let node = match self.node(id) {
                Some(node) => node,
                None => continue,
            };

            write!(out, "{:width$}", "", width = depth.saturating_mul(cfg.indent))?;
            self::write_node(out, node, cfg)?;
            writeln!(out)?;

            if let Some(children) = node.children() {
                stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
            }
        }

        Ok(())
    }

    pub fn render_to_string(&self, root: impl Into<Option<NodeId>>) -> String {
        self.display(root).to_string()
    }

    /// Renders into a byte sink such as stdout or a file
    pub fn write_to(
        &self,
        root: impl Into<Option<NodeId>>,
        cfg: &RenderConfig,
        out: &mut impl io::Write,
    ) -> io::Result<()> {
        write!(out, "{}", self.display(root).config(*cfg))
    }

    /// [`fmt::Display`] adapter over [`Self::render_with`]
    pub fn display(&self, root: impl Into<Option<NodeId>>) -> Rendered<'_> {
        Rendered {
            tree: self,
            root: root.into(),
            cfg: RenderConfig::default(),
        }
    }
}

/// Subtree rendering, created with [`SyntaxTree::display`]
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    tree: &'a SyntaxTree,
    root: Option<NodeId>,
    cfg: RenderConfig,
}

impl Rendered<'_> {
    pub fn config(mut self, cfg: RenderConfig) -> Self {
        self.cfg = cfg;
        self
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.render_with(self.root, &self.cfg, f)
    }
}

#[cfg(feature = "color")]
fn write_node(out: &mut impl fmt::Write, node: &Node, cfg: &RenderConfig) -> fmt::Result {
    use colored::Colorize;

    if !cfg.color {
        return self::write_plain(out, node);
    }

    let rule = self::escape_rule(node.rule());
    if node.is_terminal() {
        let lexeme = self::escape_lexeme(node.value());
        write!(out, "{}: {}", rule, lexeme.as_ref().color(QUOTE))
    } else {
        write!(out, "{}", rule.as_ref().bold())
    }
}

#[cfg(not(feature = "color"))]
fn write_node(out: &mut impl fmt::Write, node: &Node, _cfg: &RenderConfig) -> fmt::Result {
    self::write_plain(out, node)
}

fn write_plain(out: &mut impl fmt::Write, node: &Node) -> fmt::Result {
    let rule = self::escape_rule(node.rule());
    if node.is_terminal() {
        write!(out, "{}: {}", rule, self::escape_lexeme(node.value()))
    } else {
        out.write_str(&rule)
    }
}

pub(crate) fn escape_rule(rule: &str) -> Cow<'_, str> {
    self::escape(rule, true)
}

pub(crate) fn escape_lexeme(lexeme: &str) -> Cow<'_, str> {
    self::escape(lexeme, false)
}

fn escape(s: &str, is_rule: bool) -> Cow<'_, str> {
    let needs_escape =
        |c: char| matches!(c, '\\' | '\n' | '\r' | '\t') || (is_rule && matches!(c, ':' | ' '));

    if !s.contains(needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            ':' if is_rule => escaped.push_str("\\:"),
            ' ' if is_rule => escaped.push_str("\\s"),
            c => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}
