//! Indented rendering of the structured tree.
//!
//! One line per node, indented with one tab per depth level. The generator logs
//! these lines through `log::info!` when asked to print the tree.

use super::Node;

/// Render `node` and its descendants starting at `depth`.
pub fn render_tree(node: &Node, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(node, depth, &mut lines);
    lines
}

fn render_into(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = "\t".repeat(depth);
    match node {
        Node::Program(items) => {
            lines.push(format!("{indent}Program:"));
            for item in items {
                render_into(item, depth + 1, lines);
            }
        }
        Node::Number(value) => {
            lines.push(format!("{indent}Number: {value}"));
        }
        Node::BinaryOp { op, left, right } => {
            lines.push(format!("{indent}BinaryOp: {op}"));
            render_into(left, depth + 1, lines);
            render_into(right, depth + 1, lines);
        }
        Node::Assignment { name, value } => {
            lines.push(format!("{indent}Assignment:"));
            lines.push(format!("{indent}\tVariableName: {name}"));
            render_into(value, depth + 1, lines);
        }
        Node::ProcedureBody(items) => {
            lines.push(format!("{indent}ProcedureBody:"));
            for item in items {
                render_into(item, depth + 1, lines);
            }
        }
        Node::Procedure { name, body } => {
            lines.push(format!("{indent}Procedure:"));
            lines.push(format!("{indent}\tName: {name}"));
            render_into(body, depth + 1, lines);
        }
        Node::ProcedureCall(name) => {
            lines.push(format!("{indent}ProcedureCall:"));
            lines.push(format!("{indent}\tName: {name}"));
        }
    }
}
