/*!
Syntax tree for recursive-descent parser front-ends

The parser builds a [`tree::SyntaxTree`] node by node, hands the root to later compiler stages,
prints it for debugging and finally releases it. See the [`tree`] module.
*/

pub mod tree;
