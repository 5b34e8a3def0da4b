// This module defines the structured tree produced by the front end and consumed read-only by
// the code generator. Node is a closed sum type over every construct of the language: the
// program root, numeric literals, binary arithmetic, assignment to a named global, procedure
// bodies, procedure definitions and procedure calls. Composite nodes own their children
// directly (Vec for item lists, Box for sub-expressions), so the tree is strictly owned with
// no sharing and no cycles. BinaryOperator restricts arithmetic to the four supported
// operators and converts from the source character, rejecting anything else as an
// unsupported node. NodeKind is a fieldless mirror of Node used for diagnostics and for the
// liveness-anchor rule, which only applies to numeric-valued kinds.

//! Structured tree model.
//!
//! The tree is pure data. Lowering lives in [`crate::codegen`] and printing in
//! [`print`].

use std::fmt;

use crate::core::{CompileError, CompileResult};

pub mod print;

pub use print::render_tree;

/// Arithmetic operator of a [`Node::BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Source character for this operator.
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

impl TryFrom<char> for BinaryOperator {
    type Error = CompileError;

    fn try_from(c: char) -> CompileResult<Self> {
        match c {
            '+' => Ok(Self::Add),
            '-' => Ok(Self::Sub),
            '*' => Ok(Self::Mul),
            '/' => Ok(Self::Div),
            other => Err(CompileError::UnsupportedNode {
                node: format!("BinaryOp '{other}'"),
            }),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A node of the structured tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root holding every top-level item in source order.
    Program(Vec<Node>),
    /// Numeric literal, e.g. `42.0`.
    Number(f64),
    /// Arithmetic on two sub-expressions, e.g. `1 + 2`.
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Store the value of an expression into a named global, e.g. `save 42 in x`.
    Assignment { name: String, value: Box<Node> },
    /// Ordered items inside a procedure definition.
    ProcedureBody(Vec<Node>),
    /// Zero-argument procedure definition, e.g. `create name ... end`.
    Procedure { name: String, body: Box<Node> },
    /// Zero-argument call of a previously defined procedure.
    ProcedureCall(String),
}

/// Fieldless discriminant of [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Number,
    BinaryOp,
    Assignment,
    ProcedureBody,
    Procedure,
    ProcedureCall,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Number => "Number",
            Self::BinaryOp => "BinaryOp",
            Self::Assignment => "Assignment",
            Self::ProcedureBody => "ProcedureBody",
            Self::Procedure => "Procedure",
            Self::ProcedureCall => "ProcedureCall",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Node {
    pub fn number(value: f64) -> Self {
        Node::Number(value)
    }

    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(name: impl Into<String>, value: Node) -> Self {
        Node::Assignment {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Procedure definition whose body holds `items`.
    pub fn procedure(name: impl Into<String>, items: Vec<Node>) -> Self {
        Node::Procedure {
            name: name.into(),
            body: Box::new(Node::ProcedureBody(items)),
        }
    }

    pub fn call(name: impl Into<String>) -> Self {
        Node::ProcedureCall(name.into())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Number(_) => NodeKind::Number,
            Node::BinaryOp { .. } => NodeKind::BinaryOp,
            Node::Assignment { .. } => NodeKind::Assignment,
            Node::ProcedureBody(_) => NodeKind::ProcedureBody,
            Node::Procedure { .. } => NodeKind::Procedure,
            Node::ProcedureCall(_) => NodeKind::ProcedureCall,
        }
    }

    /// Whether this node yields a numeric value that nothing else consumes when it
    /// appears as a statement, i.e. whether the liveness anchor applies to it.
    pub fn is_numeric_expr(&self) -> bool {
        matches!(self, Node::Number(_) | Node::BinaryOp { .. })
    }

    /// Child items of a `Program` or `ProcedureBody`.
    pub fn items(&self) -> Option<&[Node]> {
        match self {
            Node::Program(items) | Node::ProcedureBody(items) => Some(items),
            _ => None,
        }
    }
}
