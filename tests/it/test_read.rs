//! Tests for `tree::read`: renderings read back into trees

use sintatico::tree::{read, NodeId, SyntaxTree, TreeError};

use crate::util::{Case, READ_ERROR_CASES, RENDER_CASES};

/// Reading any rendering and rendering it again gives the same text
#[test]
fn round_trip() {
    RENDER_CASES.run(|case| {
        let (mut tree, root) = read::from_str(&case.expected)
            .unwrap_or_else(|err| panic!("{}:{}: {}", case.file, case.ln, err));

        let output = tree.render_to_string(root);

        let n_nodes = tree.len();
        assert_eq!(tree.destroy(root), n_nodes, "{}", case.title);

        output
    })
}

/// Renderings that can't be read back fail with a line-numbered error
#[test]
fn read_errors() {
    READ_ERROR_CASES.run(error_runner)
}

fn error_runner(case: &Case) -> String {
    match read::from_str(&case.code) {
        Ok((tree, root)) => format!("no error, read:\n{}", tree.render_to_string(root)),
        Err(err) => format!("{}\n", err),
    }
}

/// `(rule, value, is_terminal)` of each node in pre-order
fn shape(tree: &SyntaxTree, root: NodeId) -> Vec<(String, String, bool)> {
    let mut nodes = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.node(id).unwrap();
        nodes.push((node.rule().to_string(), node.value().to_string(), node.is_terminal()));
        stack.extend(tree.children(id).rev());
    }
    nodes
}

/// Names with line breaks, colons and spaces survive a round trip
#[test]
fn unusual_names_round_trip() {
    let mut tree = SyntaxTree::new();
    let root = tree.non_terminal("Program", "").unwrap();

    let s = tree.terminal("Str", "a\nb").unwrap();
    tree.push_child(root, s).unwrap();

    let path = tree.non_terminal("Path::Expr", "").unwrap();
    let ident = tree.terminal("Identifier", "x").unwrap();
    tree.push_child(path, ident).unwrap();
    tree.push_child(root, path).unwrap();

    let spaced = tree.terminal("Two words", "C:\\dir ").unwrap();
    tree.push_child(root, spaced).unwrap();

    let text = tree.render_to_string(root);
    assert_eq!(text.lines().count(), 5);

    let (mut read, read_root) = read::from_str(&text).unwrap();
    let read_root = read_root.unwrap();
    assert_eq!(read.render_to_string(read_root), text);

    assert_eq!(
        self::shape(&read, read_root),
        vec![
            ("Program".to_string(), "".to_string(), false),
            ("Str".to_string(), "a\nb".to_string(), true),
            ("Path::Expr".to_string(), "".to_string(), false),
            ("Identifier".to_string(), "x".to_string(), true),
            ("Two words".to_string(), "C:\\dir ".to_string(), true),
        ]
    );

    assert_eq!(read.destroy(read_root), 5);
    assert_eq!(tree.destroy(root), 5);
}

/// A node without a rule name couldn't be rendered unambiguously
#[test]
fn empty_rule_is_rejected() {
    let mut tree = SyntaxTree::new();
    assert_eq!(tree.non_terminal("", ""), Err(TreeError::EmptyRule));
    assert_eq!(tree.terminal("", "x"), Err(TreeError::EmptyRule));
    assert!(tree.is_empty());
}
