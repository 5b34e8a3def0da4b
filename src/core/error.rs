// This module defines error types for the hebe code generator using the thiserror crate for
// idiomatic Rust error handling. CompileError is the single error enum shared by the front
// end, the registries, the lowering dispatch, the backends and the execution driver. Its
// variants follow the generator's failure taxonomy: structural problems with the tree root,
// duplicate definitions through the non-idempotent registry path, failed lookups (including
// unresolvable procedure calls), node kinds without a lowering rule, and backend failures
// during emission, verification or execution. Parse and I/O variants cover the front end and
// file export. Every error is fatal for the enclosing generate/run call; CompileResult<T> is
// the convenience alias used throughout the crate.

//! Error types for the hebe compiler.
//!
//! Using thiserror for more idiomatic error handling.

use std::fmt;

use thiserror::Error;

/// The kind of entity a symbol registry stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    BasicBlock,
    GlobalVariable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Function => "Function",
            SymbolKind::BasicBlock => "Basic block",
            SymbolKind::GlobalVariable => "Global variable",
        })
    }
}

/// Main error type for code generation and execution.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Structural error: {reason}")]
    Structural { reason: String },

    #[error("{kind} {name} already exists and can not be created")]
    DuplicateDefinition { kind: SymbolKind, name: String },

    #[error("{kind} {name} not found")]
    Lookup { kind: SymbolKind, name: String },

    #[error("Code generation for {node} not supported")]
    UnsupportedNode { node: String },

    #[error("Backend error: {reason}")]
    Backend { reason: String },

    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn structural(reason: impl Into<String>) -> Self {
        CompileError::Structural {
            reason: reason.into(),
        }
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        CompileError::Backend {
            reason: reason.into(),
        }
    }

    pub fn duplicate(kind: SymbolKind, name: impl Into<String>) -> Self {
        CompileError::DuplicateDefinition {
            kind,
            name: name.into(),
        }
    }

    pub fn lookup(kind: SymbolKind, name: impl Into<String>) -> Self {
        CompileError::Lookup {
            kind,
            name: name.into(),
        }
    }
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
