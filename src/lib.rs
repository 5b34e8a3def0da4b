//! hebe - a tiny procedural language lowered to a native-code backend.
//!
//! A program is a list of items: numeric expressions, assignments to named
//! globals, zero-argument procedure definitions and calls. The front end turns
//! source text into a structured tree, the code generator lowers the tree into
//! a backend's program representation, and the backend executes it.
//!
//! # Primary Usage
//!
//! ```no_run
//! use hebe::codegen::CodeGenerator;
//! use hebe::ir::IrBackend;
//!
//! let program = hebe::frontend::parse("save 2 + 40 in ret")?;
//! let mut generator = CodeGenerator::with_root(IrBackend::default(), program);
//! generator.generate_code()?;
//! let result = generator.run_jit()?;
//! assert_eq!(result, 42);
//! # Ok::<(), hebe::CompileError>(())
//! ```
//!
//! # Architecture
//!
//! - [`ast`] - Structured tree and its printer
//! - [`frontend`] - Lexer and parser
//! - [`core`] - Backend trait, registries, errors, configuration, statistics
//! - [`codegen`] - Tree lowering and entry synthesis
//! - [`ir`] - Default backend: in-crate representation and interpreter
//! - `llvm` - LLVM backend through inkwell (feature `llvm`)
//! - [`driver`] - Command-line surface

pub mod ast;
pub mod codegen;
pub mod core;
pub mod driver;
pub mod frontend;
pub mod ir;
#[cfg(feature = "llvm")]
pub mod llvm;

pub use ast::{BinaryOperator, Node, NodeKind};
pub use codegen::{CodeGenerator, Generated};
pub use self::core::{
    ArithOp, Backend, CompileError, CompileResult, GeneratorConfig, ReturnKind, SessionStats, SymbolKind,
};
pub use ir::IrBackend;
#[cfg(feature = "llvm")]
pub use llvm::LlvmBackend;
