// This module provides the code generator: the component that walks the structured tree and
// lowers it into a backend's program representation. CodeGenerator<B> owns the tree root, the
// backend, the three symbol registries and the per-compilation statistics. Lowering itself is
// split across submodules: expr holds the exhaustive per-node dispatch, procedure handles
// procedure definitions, calls and the scoped insertion cursor, and entry synthesizes the
// implicit entry function that runs the whole program. This file carries the generator type,
// the Generated result of lowering one node, and the diagnostic pass-throughs (tree printing,
// program representation printing, file export) plus run_jit, which consumes the generator
// and hands the finished program to the backend's execution engine.

//! Tree-to-backend lowering.
//!
//! Typical use:
//!
//! ```no_run
//! use hebe::ast::{BinaryOperator, Node};
//! use hebe::codegen::CodeGenerator;
//! use hebe::ir::IrBackend;
//!
//! let program = Node::Program(vec![Node::assign(
//!     "ret",
//!     Node::binary(BinaryOperator::Mul, Node::number(6.0), Node::number(7.0)),
//! )]);
//! let mut generator = CodeGenerator::with_root(IrBackend::default(), program);
//! generator.generate_code()?;
//! assert_eq!(generator.run_jit()?, 42);
//! # Ok::<(), hebe::CompileError>(())
//! ```

use std::fmt;
use std::path::Path;

use crate::ast::{render_tree, Node};
use crate::core::{Backend, CompileError, CompileResult, GeneratorConfig, SessionStats, SymbolTables};

mod entry;
mod expr;
mod procedure;

/// What lowering a single node produced.
pub enum Generated<B: Backend> {
    /// A numeric value.
    Value(B::Value),
    /// The global written by an assignment.
    Global(B::Global),
    /// A freshly defined function.
    Function(B::Function),
    /// A call instruction.
    Call(B::CallSite),
    /// Nothing usable as a value.
    Void,
}

impl<B: Backend> Generated<B> {
    pub fn is_void(&self) -> bool {
        matches!(self, Generated::Void)
    }

    /// Short name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Generated::Value(_) => "value",
            Generated::Global(_) => "global",
            Generated::Function(_) => "function",
            Generated::Call(_) => "call",
            Generated::Void => "void",
        }
    }
}

impl<B: Backend> Clone for Generated<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend> Copy for Generated<B> {}

impl<B: Backend> fmt::Debug for Generated<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generated::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Generated::Global(g) => f.debug_tuple("Global").field(g).finish(),
            Generated::Function(func) => f.debug_tuple("Function").field(func).finish(),
            Generated::Call(call) => f.debug_tuple("Call").field(call).finish(),
            Generated::Void => f.write_str("Void"),
        }
    }
}

/// Lowers a structured tree into the program representation of `B`.
pub struct CodeGenerator<B: Backend> {
    root: Option<Node>,
    backend: B,
    tables: SymbolTables<B>,
    config: GeneratorConfig,
    stats: SessionStats,
    generated: bool,
}

impl<B: Backend> CodeGenerator<B> {
    /// Generator without a tree. Individual nodes can still be lowered after
    /// [`enter_entry_function`](Self::enter_entry_function).
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, None, GeneratorConfig::default())
    }

    pub fn with_root(backend: B, root: Node) -> Self {
        Self::with_config(backend, Some(root), GeneratorConfig::default())
    }

    pub fn with_config(backend: B, root: Option<Node>, config: GeneratorConfig) -> Self {
        Self {
            root,
            backend,
            tables: SymbolTables::new(),
            config,
            stats: SessionStats::default(),
            generated: false,
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn tables(&self) -> &SymbolTables<B> {
        &self.tables
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Tree lines, one per node, tab-indented by depth.
    pub fn render_node_tree(&self) -> CompileResult<Vec<String>> {
        match &self.root {
            Some(root) => Ok(render_tree(root, 0)),
            None => {
                log::error!("No code provided. root node is empty");
                Err(CompileError::structural("no code provided, root node is empty"))
            }
        }
    }

    pub fn print_node_tree(&self) -> CompileResult<()> {
        for line in self.render_node_tree()? {
            log::info!("{}", line);
        }
        Ok(())
    }

    /// Log `node` and its descendants, indented from `depth`.
    pub fn print_node(&self, node: &Node, depth: usize) {
        for line in render_tree(node, depth) {
            log::info!("{}", line);
        }
    }

    pub fn program_representation(&self) -> String {
        self.backend.print_to_string()
    }

    pub fn print_program_representation(&self) {
        if self.backend.is_empty() {
            log::warn!("Module is empty!");
        }
        print!("{}", self.program_representation());
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> CompileResult<()> {
        let path = path.as_ref();
        self.backend.write_to_file(path).map_err(|err| {
            log::error!("Could not write program to {}: {}", path.display(), err);
            err
        })?;
        log::info!("Program written to {}", path.display());
        Ok(())
    }

    /// Execute the entry function and truncate its result toward zero.
    ///
    /// Consumes the generator: the backend is handed to its execution engine.
    /// Fails with [`CompileError::Structural`] unless `generate_code` succeeded.
    pub fn run_jit(self) -> CompileResult<i32> {
        if !self.generated {
            log::error!("No generated program to run");
            return Err(CompileError::structural("program has not been generated"));
        }

        let entry = self.config.entry_function.clone();
        log::info!("Running {}", entry);

        let result = self.backend.execute(&entry).map_err(|err| {
            log::error!("Execution of {} failed: {}", entry, err);
            err
        })?;

        log::info!("{} returned {}", entry, result);
        Ok(result as i32)
    }
}
