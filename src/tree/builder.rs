//! Top-down tree construction along the parser's recursion

use smallvec::SmallVec;

use crate::tree::{NodeId, Result, SyntaxTree};

/// Builds a [`SyntaxTree`] with `start_node` / `token` / `finish_node` calls
///
/// Every new node is attached to the innermost unfinished node. The first top-level node becomes
/// the root; later top-level nodes are left unattached (see [`SyntaxTree::roots`]).
///
/// ```
/// use sintatico::tree::TreeBuilder;
///
/// let mut builder = TreeBuilder::new();
/// builder.start_node("Program", "").unwrap();
/// builder.token("Identifier", "main").unwrap();
/// builder.finish_node();
///
/// let (tree, root) = builder.finish();
/// assert_eq!(tree.render_to_string(root), "Program\n  Identifier: main\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    tree: SyntaxTree,
    /// Unfinished non-terminals, innermost last
    parents: SmallVec<[NodeId; 8]>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds into an existing (possibly configured) tree
    pub fn with_tree(tree: SyntaxTree) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Opens a non-terminal node. Following nodes become its children until
    /// [`Self::finish_node`]
    pub fn start_node(&mut self, rule: &str, value: &str) -> Result<NodeId> {
        let id = self.tree.non_terminal(rule, value)?;
        self.attach(id)?;
        self.parents.push(id);
        Ok(id)
    }

    /// Adds a terminal node to the current non-terminal
    pub fn token(&mut self, rule: &str, lexeme: &str) -> Result<NodeId> {
        let id = self.tree.terminal(rule, lexeme)?;
        self.attach(id)?;
        Ok(id)
    }

    /// Closes the innermost non-terminal
    pub fn finish_node(&mut self) -> Option<NodeId> {
        self.parents.pop()
    }

    /// Number of unfinished non-terminals
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.parents.last().copied()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Returns the tree and its root. Unfinished nodes are closed implicitly
    pub fn finish(self) -> (SyntaxTree, Option<NodeId>) {
        (self.tree, self.root)
    }

    fn attach(&mut self, id: NodeId) -> Result<()> {
        let parent = match self.parents.last() {
            Some(parent) => *parent,
            None => {
                self.root.get_or_insert(id);
                return Ok(());
            }
        };

        if let Err(err) = self.tree.push_child(parent, id) {
            // the node never got an owner
            self.tree.destroy(id);
            return Err(err);
        }

        Ok(())
    }
}
