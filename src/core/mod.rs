// This module serves as the central hub for hebe's core infrastructure, the pieces shared by
// the code generator and every backend. It exports and organizes: the error taxonomy
// (CompileError and the SymbolKind it reports on), the Backend trait with its ReturnKind and
// ArithOp vocabulary, the name-keyed symbol registries (functions, per-function basic blocks,
// globals), the generator configuration, and the per-compilation statistics. None of these
// depend on a concrete backend; the in-crate interpreter and the LLVM backend both plug in
// through the Backend trait.

//! Core hebe infrastructure.
//!
//! # Key Components
//!
//! ## Errors (`error`)
//! - One error enum for the whole pipeline, built on `thiserror`
//!
//! ## Backend surface (`backend`)
//! - Function, block, global and instruction emission
//! - Verification, printing and execution
//!
//! ## Symbol registries (`registry`)
//! - create / get / get-or-create over name-keyed handles
//! - Basic blocks scoped per owning function
//!
//! ## Configuration (`config`) and statistics (`session`)

pub mod backend;
pub mod config;
pub mod error;
pub mod registry;
pub mod session;

pub use backend::{ArithOp, Backend, ReturnKind};
pub use config::GeneratorConfig;
pub use error::{CompileError, CompileResult, SymbolKind};
pub use registry::{BlockRegistry, Registry, SymbolTables};
pub use session::SessionStats;
