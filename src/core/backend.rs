// This module defines the Backend trait, the bridge between the code generator and whatever
// library emits and executes the low-level program representation. The trait covers the
// minimal surface the generator needs: creating zero-argument functions with a void or
// numeric return kind, module-wide function lookup, basic block creation, moving and
// querying the insertion point, numeric constants, the four arithmetic instructions,
// externally visible zero-initialized globals, private scratch slots, loads, stores,
// zero-argument calls and returns, plus verification, textual serialization and execution.
// Handles are opaque associated types so the generator never depends on a concrete backend.
// Two implementations exist: the in-crate program representation with its interpreter
// (crate::ir) and the inkwell-based LLVM backend behind the `llvm` feature (crate::llvm).

//! Backend responsibilities.
//!
//! The backend owns the program representation being built. The generator only
//! ever talks to it through this trait and stores the returned handles in its
//! [`registries`](super::registry). The framework assumes:
//! - Every function takes no arguments and returns either nothing or one number.
//! - Every function has a single `entry` block.
//! - Instructions are appended at the end of the block set by `position_at_end`.
//!
//! Execution consumes the backend: once a program is handed to the execution
//! engine it can no longer be mutated.

use std::fmt;
use std::path::Path;

use super::error::CompileResult;

/// Return kind of a generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    Void,
    Number,
}

/// Arithmetic instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// Mnemonic used in the textual program representation.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "fadd",
            ArithOp::Sub => "fsub",
            ArithOp::Mul => "fmul",
            ArithOp::Div => "fdiv",
        }
    }

    /// Conventional name given to the instruction result.
    pub const fn result_name(self) -> &'static str {
        match self {
            ArithOp::Add => "addtmp",
            ArithOp::Sub => "subtmp",
            ArithOp::Mul => "multmp",
            ArithOp::Div => "divtmp",
        }
    }

    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => lhs * rhs,
            ArithOp::Div => lhs / rhs,
        }
    }
}

/// Emission and execution hooks implemented by a code generation library.
pub trait Backend {
    type Function: Copy + fmt::Debug;
    type Block: Copy + fmt::Debug;
    type Value: Copy + fmt::Debug;
    type Pointer: Copy + fmt::Debug;
    type Global: Copy + fmt::Debug;
    type CallSite: Copy + fmt::Debug;

    /// Create a zero-argument function. Fails if the module already has `name`.
    fn create_function(&mut self, name: &str, ret: ReturnKind) -> CompileResult<Self::Function>;

    /// Look a function up in the whole module, regardless of who created it.
    fn lookup_function(&self, name: &str) -> Option<Self::Function>;

    /// Append a new basic block to `function`.
    fn create_block(&mut self, name: &str, function: Self::Function) -> CompileResult<Self::Block>;

    /// Block currently receiving instructions, if any.
    fn insertion_block(&self) -> Option<Self::Block>;

    fn position_at_end(&mut self, block: Self::Block);

    /// Forget the insertion point.
    fn clear_insertion_point(&mut self);

    fn const_number(&mut self, value: f64) -> Self::Value;

    fn build_arith(&mut self, op: ArithOp, lhs: Self::Value, rhs: Self::Value) -> CompileResult<Self::Value>;

    /// Create an externally visible numeric global initialized to zero.
    fn create_global(&mut self, name: &str) -> CompileResult<Self::Global>;

    fn global_pointer(&self, global: Self::Global) -> Self::Pointer;

    /// Private numeric storage local to the current function.
    fn build_scratch_slot(&mut self, name: &str) -> CompileResult<Self::Pointer>;

    fn build_store(&mut self, value: Self::Value, ptr: Self::Pointer) -> CompileResult<()>;

    fn build_load(&mut self, ptr: Self::Pointer, name: &str) -> CompileResult<Self::Value>;

    fn build_call(&mut self, function: Self::Function) -> CompileResult<Self::CallSite>;

    fn build_return(&mut self, value: Self::Value) -> CompileResult<()>;

    fn build_return_void(&mut self) -> CompileResult<()>;

    /// Check the program representation for structural problems.
    fn verify(&self) -> CompileResult<()>;

    /// Whether the module has no functions and no globals.
    fn is_empty(&self) -> bool;

    fn print_to_string(&self) -> String;

    fn write_to_file(&self, path: &Path) -> CompileResult<()>;

    /// Hand the program to the execution engine and run `entry`.
    fn execute(self, entry: &str) -> CompileResult<f64>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arith_apply() {
        assert_eq!(ArithOp::Add.apply(1.5, 2.0), 3.5);
        assert_eq!(ArithOp::Sub.apply(1.5, 2.0), -0.5);
        assert_eq!(ArithOp::Mul.apply(1.5, 2.0), 3.0);
        assert_eq!(ArithOp::Div.apply(1.0, 4.0), 0.25);
        assert!(ArithOp::Div.apply(1.0, 0.0).is_infinite());
    }
}
