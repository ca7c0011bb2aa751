//! Syntax tree handed from the parser to later compiler stages
//!
//! # Arena and ownership
//!
//! Nodes are allocated in a [`SyntaxTree`] and referred to by tree-local [`NodeId`]s. A node owns
//! the children in its slots: each node records its single parent, attaching a node twice or
//! attaching an ancestor is rejected, so the nodes always form a forest.
//!
//! Destroying a node releases its whole subtree, children before parents. The released slots are
//! emptied and never reused, so stale ids fail loudly on attachment and are no-ops elsewhere.
//!
//! # Lifecycle
//!
//! - The parser creates nodes ([`SyntaxTree::create_node`]) and wires them by slot index
//!   ([`SyntaxTree::set_child`]), or drives a [`TreeBuilder`]
//! - Later stages read the tree and may attach [`SymbolRef`]s
//! - [`SyntaxTree::render`] prints it for debugging, [`read`] parses such renderings back
//! - [`SyntaxTree::destroy`] releases it

pub mod builder;
pub mod name;
pub mod node;
pub mod read;
pub mod render;

use std::{fmt, iter};

use thiserror::Error;
use typed_index_collections::TiVec;

#[doc(inline)]
pub use self::{
    builder::TreeBuilder,
    name::{Name, MAX_NAME_LEN},
    node::{Children, Node, NodeId, NodeKind, SymbolRef, MAX_CHILDREN},
    render::RenderConfig,
};

pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// Which string of a node was too long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    Rule,
    Value,
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rule => "rule name",
            Self::Value => "value",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("out of memory while allocating a syntax node")]
    OutOfMemory,
    #[error("{field} is {len} bytes long, but at most {} bytes fit", MAX_NAME_LEN)]
    NameTooLong { field: NameField, len: usize },
    #[error("rule name is empty")]
    EmptyRule,
    #[error("child index {index} is out of range (capacity {})", MAX_CHILDREN)]
    IndexOutOfRange { index: usize },
    #[error("child slot {index} is already occupied")]
    SlotOccupied { index: usize },
    #[error("terminal node can't have children")]
    InvalidOnTerminal,
    #[error("node {node:?} is released or doesn't belong to this tree")]
    StaleNode { node: NodeId },
    #[error("node {child:?} is already owned by another node")]
    AlreadyAttached { child: NodeId },
    #[error("attaching node {child:?} would create a cycle")]
    WouldCycle { child: NodeId },
}

/// Allocation limits of a [`SyntaxTree`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum number of allocations. Exceeding it fails with [`TreeError::OutOfMemory`]
    pub max_nodes: Option<usize>,
}

/// Arena of syntax nodes
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    /// `None` for released nodes
    nodes: TiVec<NodeId, Option<Node>>,
    live: usize,
    config: TreeConfig,
}

/// Construction
impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Allocates a childless node with copies of `rule` and `value`
    ///
    /// `rule` must not be empty. `value` may be.
    pub fn create_node(&mut self, rule: &str, value: &str, is_terminal: bool) -> Result<NodeId> {
        if rule.is_empty() {
            return Err(TreeError::EmptyRule);
        }
        let rule = Name::new(rule).map_err(|err| TreeError::NameTooLong {
            field: NameField::Rule,
            len: err.len,
        })?;
        let value = Name::new(value).map_err(|err| TreeError::NameTooLong {
            field: NameField::Value,
            len: err.len,
        })?;

        if matches!(self.config.max_nodes, Some(max) if self.nodes.len() >= max) {
            return Err(TreeError::OutOfMemory);
        }
        self.nodes
            .raw
            .try_reserve(1)
            .map_err(|_| TreeError::OutOfMemory)?;

        let id = NodeId::from(self.nodes.len());
        self.nodes.push(Some(Node::new(rule, value, is_terminal)));
        self.live += 1;

        log::trace!("alloc {:?} `{}` (terminal: {})", id, rule, is_terminal);
        Ok(id)
    }

    /// Allocates a leaf for a consumed token
    pub fn terminal(&mut self, rule: &str, lexeme: &str) -> Result<NodeId> {
        self.create_node(rule, lexeme, true)
    }

    /// Allocates a node for a matched grammar production
    pub fn non_terminal(&mut self, rule: &str, value: &str) -> Result<NodeId> {
        self.create_node(rule, value, false)
    }
}

/// Ownership transfer
impl SyntaxTree {
    /// Moves `child` into slot `index` of `parent`
    pub fn set_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let child_node = self.try_node(child)?;
        let child_is_attached = child_node.parent.is_some();

        let children = self
            .try_node(parent)?
            .children()
            .ok_or(TreeError::InvalidOnTerminal)?;

        if index >= MAX_CHILDREN {
            return Err(TreeError::IndexOutOfRange { index });
        }
        if children.get(index).is_some() {
            return Err(TreeError::SlotOccupied { index });
        }
        if child_is_attached {
            return Err(TreeError::AlreadyAttached { child });
        }
        if self.ancestors(parent).any(|id| id == child) {
            return Err(TreeError::WouldCycle { child });
        }

        if let Some(slot) = self
            .node_mut(parent)
            .and_then(Node::children_mut)
            .and_then(|children| children.slot_mut(index))
        {
            *slot = Some(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }

        Ok(())
    }

    /// Moves `child` into the first vacant slot of `parent` and returns the slot index
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<usize> {
        let index = self
            .try_node(parent)?
            .children()
            .ok_or(TreeError::InvalidOnTerminal)?
            .first_vacant()
            .ok_or(TreeError::IndexOutOfRange {
                index: MAX_CHILDREN,
            })?;

        self.set_child(parent, index, child)?;
        Ok(index)
    }

    /// Detaches the child at slot `index` and hands its ownership back to the caller
    pub fn take_child(&mut self, parent: NodeId, index: usize) -> Result<Option<NodeId>> {
        let slot = self
            .try_node_mut(parent)?
            .children_mut()
            .ok_or(TreeError::InvalidOnTerminal)?
            .slot_mut(index)
            .ok_or(TreeError::IndexOutOfRange { index })?;

        let child = slot.take();
        if let Some(id) = child {
            if let Some(node) = self.node_mut(id) {
                node.parent = None;
            }
        }

        Ok(child)
    }

    /// Attaches a semantic artifact to a node. Returns the previous one
    pub fn set_symbol(
        &mut self,
        node: NodeId,
        symbol: Option<SymbolRef>,
    ) -> Result<Option<SymbolRef>> {
        let node = self.try_node_mut(node)?;
        Ok(std::mem::replace(&mut node.symbol, symbol))
    }
}

/// Destruction
impl SyntaxTree {
    /// Releases the subtree at `root`, children before parents, and returns the number of
    /// released nodes
    ///
    /// `None`, released and foreign ids are no-ops. Symbol references are left untouched.
    pub fn destroy(&mut self, root: impl Into<Option<NodeId>>) -> usize {
        self.destroy_with(root, |_, _| {})
    }

    /// [`Self::destroy`], handing each released node to `on_release`
    pub fn destroy_with(
        &mut self,
        root: impl Into<Option<NodeId>>,
        mut on_release: impl FnMut(NodeId, Node),
    ) -> usize {
        let root = match root.into() {
            Some(root) if self.is_live(root) => root,
            _ => return 0,
        };

        if let Some(parent) = self.node(root).and_then(Node::parent) {
            if let Some(children) = self.node_mut(parent).and_then(Node::children_mut) {
                children.remove(root);
            }
        }

        // reversed, this is the post-order
        let mut stack = vec![root];
        let mut order = Vec::new();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(children) = self.node(id).and_then(Node::children) {
                stack.extend(children.iter());
            }
        }

        for &id in order.iter().rev() {
            if let Some(node) = self.nodes.get_mut(id).and_then(Option::take) {
                self.live -= 1;
                log::trace!("release {:?} `{}`", id, node.rule);
                on_release(id, node);
            }
        }

        log::debug!("destroyed {:?}: released {} node(s)", root, order.len());
        order.len()
    }
}

/// Accessors
impl SyntaxTree {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id).and_then(Option::as_mut)
    }

    fn try_node(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(TreeError::StaleNode { node: id })
    }

    fn try_node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.node_mut(id).ok_or(TreeError::StaleNode { node: id })
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Present children of `id` in slot order. Empty for terminals and stale ids
    pub fn children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.node(id)
            .and_then(Node::children)
            .into_iter()
            .flat_map(Children::iter)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn symbol(&self, id: NodeId) -> Option<SymbolRef> {
        self.node(id).and_then(Node::symbol)
    }

    /// `id` followed by its owners up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(id).filter(|id| self.is_live(*id)), move |id| {
            self.parent(*id)
        })
    }

    /// Live nodes without an owner
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter_enumerated()
            .filter_map(|(id, node)| node.as_ref().filter(|n| n.parent.is_none()).map(|_| id))
    }
}
