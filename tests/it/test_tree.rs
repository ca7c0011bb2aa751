//! Tests for `tree` module: construction, rendering and destruction

use std::collections::HashMap;

use sintatico::tree::{NodeId, SymbolRef, SyntaxTree, TreeError, MAX_CHILDREN};

use crate::util::{Case, RENDER_CASES};

/// Builds the input of each case and renders it
#[test]
fn render() {
    RENDER_CASES.run(runner)
}

fn runner(case: &Case) -> String {
    let mut tree = SyntaxTree::new();
    let root = self::build(&mut tree, &case.code);
    let n_nodes = tree.len();

    let output = tree.render_to_string(root);
    assert_eq!(output, tree.render_to_string(root), "{}", case.title);

    // everything is reachable from the root
    assert_eq!(tree.destroy(root), n_nodes, "{}", case.title);
    assert!(tree.is_empty(), "{}", case.title);

    output
}

/// Builds a tree from a tiny S-expression DSL
///
/// - `(Rule child..)`: non-terminal
/// - `Rule:lexeme`: terminal
/// - `Rule`: non-terminal without children
/// - `N=` before a child: attach it at slot `N` (default: first vacant slot)
fn build(tree: &mut SyntaxTree, src: &str) -> NodeId {
    let tks = self::tokenize(src);
    let mut pos = 0;
    let (slot, root) = self::build_sx(tree, &tks, &mut pos);
    assert_eq!(slot, None, "root can't have a slot index");
    assert_eq!(pos, tks.len(), "trailing tokens in `{}`", src);
    root
}

fn tokenize(src: &str) -> Vec<String> {
    let mut tks = Vec::new();
    let mut word = String::new();

    for c in src.chars() {
        if c.is_whitespace() || c == '(' || c == ')' {
            if !word.is_empty() {
                tks.push(std::mem::take(&mut word));
            }
            if !c.is_whitespace() {
                tks.push(c.to_string());
            }
        } else {
            word.push(c);
            if c == '=' {
                tks.push(std::mem::take(&mut word));
            }
        }
    }

    if !word.is_empty() {
        tks.push(word);
    }

    tks
}

fn build_sx(tree: &mut SyntaxTree, tks: &[String], pos: &mut usize) -> (Option<usize>, NodeId) {
    let mut slot = None;
    if let Some(index) = tks[*pos].strip_suffix('=') {
        slot = Some(index.parse::<usize>().unwrap());
        *pos += 1;
    }

    let tk = &tks[*pos];
    *pos += 1;

    if tk != "(" {
        let id = match tk.split_once(':') {
            Some((rule, lexeme)) => tree.terminal(rule, lexeme).unwrap(),
            None => tree.non_terminal(tk, "").unwrap(),
        };
        return (slot, id);
    }

    let parent = tree.non_terminal(&tks[*pos], "").unwrap();
    *pos += 1;

    while tks[*pos] != ")" {
        match self::build_sx(tree, tks, pos) {
            (Some(index), child) => tree.set_child(parent, index, child).unwrap(),
            (None, child) => {
                tree.push_child(parent, child).unwrap();
            }
        }
    }
    *pos += 1;

    (slot, parent)
}

#[test]
fn program_scenario() {
    let mut tree = SyntaxTree::new();
    let root = tree.create_node("Program", "", false).unwrap();
    let child = tree.create_node("Identifier", "main", true).unwrap();
    tree.set_child(root, 0, child).unwrap();

    let s = tree.render_to_string(root);
    assert_eq!(s.lines().collect::<Vec<_>>(), vec!["Program", "  Identifier: main"]);

    assert_eq!(tree.destroy(root), 2);
}

#[test]
fn dsl_slots() {
    let mut tree = SyntaxTree::new();
    let root = self::build(&mut tree, "(Call 0=Identifier:f 4=(Args 9=Number:2 2=Number:1))");

    let slots = tree.node(root).unwrap().children().unwrap().slots();
    assert!(slots[0].is_some() && slots[4].is_some());
    assert_eq!(slots.iter().flatten().count(), 2);
}

/// Every attached node is released exactly once
#[test]
fn ownership_uniqueness() {
    let mut tree = SyntaxTree::new();
    let root = self::build(
        &mut tree,
        "(Program (Fn Identifier:main (Params) (Block (Return Number:0))) Eof:eof)",
    );
    let allocated = tree.len();

    let mut released: HashMap<NodeId, usize> = HashMap::new();
    let n = tree.destroy_with(root, |id, node| {
        // owners go last: none of the children may still be live
        assert!(node.children().map_or(true, |c| c.iter().all(|c| released.contains_key(&c))));
        *released.entry(id).or_default() += 1;
    });

    assert_eq!(n, allocated);
    assert_eq!(released.len(), allocated);
    assert!(released.values().all(|&count| count == 1));

    assert_eq!(tree.destroy_with(root, |_, _| panic!("double release")), 0);
    assert_eq!(tree.destroy(None), 0);
}

#[test]
fn terminal_invariant() {
    let mut tree = SyntaxTree::new();
    let leaf = tree.terminal("Number", "1").unwrap();

    for index in 0..=MAX_CHILDREN {
        let child = tree.terminal("Number", "2").unwrap();
        assert_eq!(
            tree.set_child(leaf, index, child),
            Err(TreeError::InvalidOnTerminal)
        );
        tree.destroy(child);
    }

    assert_eq!(tree.len(), 1);
}

#[test]
fn bounds() {
    let mut tree = SyntaxTree::new();
    let parent = tree.non_terminal("Args", "").unwrap();
    let child = tree.terminal("Number", "1").unwrap();

    assert_eq!(
        tree.set_child(parent, 10, child),
        Err(TreeError::IndexOutOfRange { index: 10 })
    );
    assert_eq!(tree.set_child(parent, 9, child), Ok(()));
}

#[test]
fn symbols_are_not_owned() {
    // symbol table of the semantic stage
    let symbols = vec!["main".to_string()];

    let mut tree = SyntaxTree::new();
    let root = self::build(&mut tree, "(Program Identifier:main)");
    let ident = tree.children(root).next().unwrap();
    tree.set_symbol(ident, Some(SymbolRef::new(0))).unwrap();

    let mut refs = Vec::new();
    assert_eq!(tree.destroy_with(root, |_, node| refs.extend(node.symbol())), 2);

    assert_eq!(refs, vec![SymbolRef::new(0)]);
    assert_eq!(symbols[refs[0].raw() as usize], "main");
}
