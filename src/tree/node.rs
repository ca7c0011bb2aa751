//! Node data

use crate::tree::name::Name;

/// Fixed branching capacity of a non-terminal node
pub const MAX_CHILDREN: usize = 10;

/// Tree-local node index
///
/// Ids are never reused by a [`SyntaxTree`](crate::tree::SyntaxTree), so an id of a released node
/// stays stale forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl From<usize> for NodeId {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Non-owning reference to a semantic artifact, such as a symbol table entry
///
/// The tree only stores it. It's never released along with nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolRef(u32);

impl SymbolRef {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Child slots of a non-terminal node, with explicit occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Children {
    slots: [Option<NodeId>; MAX_CHILDREN],
}

impl Children {
    /// Child at slot `index`, if any
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<NodeId>; MAX_CHILDREN] {
        &self.slots
    }

    /// Present children in slot order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn first_vacant(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Option<NodeId>> {
        self.slots.get_mut(index)
    }

    /// Empties the slot holding `child`
    pub(crate) fn remove(&mut self, child: NodeId) -> Option<usize> {
        let index = self.slots.iter().position(|slot| *slot == Some(child))?;
        self.slots[index] = None;
        Some(index)
    }
}

/// Terminal or non-terminal
///
/// Terminals have no child storage, so a terminal with children can't be expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf made of a single token
    Terminal,
    /// Matched grammar production
    NonTerminal(Children),
}

/// Syntax tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) rule: Name,
    pub(crate) value: Name,
    pub(crate) kind: NodeKind,
    pub(crate) symbol: Option<SymbolRef>,
    /// Owner of this node
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(rule: Name, value: Name, is_terminal: bool) -> Self {
        let kind = if is_terminal {
            NodeKind::Terminal
        } else {
            NodeKind::NonTerminal(Children::default())
        };

        Self {
            rule,
            value,
            kind,
            symbol: None,
            parent: None,
        }
    }

    /// Grammar rule name or terminal category
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Lexeme of a terminal, or auxiliary text of a non-terminal
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal)
    }

    /// Child slots. `None` for terminals
    pub fn children(&self) -> Option<&Children> {
        match &self.kind {
            NodeKind::Terminal => None,
            NodeKind::NonTerminal(children) => Some(children),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Children> {
        match &mut self.kind {
            NodeKind::Terminal => None,
            NodeKind::NonTerminal(children) => Some(children),
        }
    }

    pub fn symbol(&self) -> Option<SymbolRef> {
        self.symbol
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
