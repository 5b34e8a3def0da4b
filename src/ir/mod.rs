//! In-crate program representation.
//!
//! This module provides the default backend of the code generator: a small,
//! LLVM-flavoured SSA representation together with a builder
//! ([`IrBackend`]), a structural verifier and an interpreter that plays the
//! role of the execution engine. The representation is designed to be:
//! - Flat: functions, blocks, values and globals live in index-addressed tables
//! - Unfolded: every emitted instruction stays visible, constants are never folded
//! - Printable: [`Module`] renders to a readable text form
//!
//! # Text Format
//!
//! ```text
//! ; ModuleID = 'MainModule'
//!
//! @ret = global double 0.0
//!
//! define double @run() {
//! entry:
//!   %anchor = alloca double
//!   %addtmp = fadd double 1.0, 2.0
//!   store double %addtmp, ptr %anchor
//!   %ret.load = load double, ptr @ret
//!   ret double %ret.load
//! }
//! ```

use crate::core::{ArithOp, ReturnKind};

pub mod builder;
pub mod interp;
pub mod print;
pub mod verify;

pub use builder::IrBackend;
pub use interp::Interpreter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalRef(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub blocks: Vec<Block>,
    pub values: Vec<Value>,
    pub globals: Vec<Global>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub ret: ReturnKind,
    pub blocks: Vec<BlockRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub func: FuncRef,
    pub insts: Vec<ValueRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub name: String,
    pub op: Operation,
    /// Block holding the instruction; `None` for constants and global addresses.
    pub block: Option<BlockRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub init: f64,
    pub external: bool,
    /// Address value used as a store/load operand.
    pub addr: ValueRef,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Const(f64),
    GlobalAddr(GlobalRef),
    Arith {
        op: ArithOp,
        lhs: ValueRef,
        rhs: ValueRef,
    },
    Alloca,
    Load {
        ptr: ValueRef,
    },
    Store {
        value: ValueRef,
        ptr: ValueRef,
    },
    Call {
        callee: FuncRef,
    },
    Ret {
        value: Option<ValueRef>,
    },
}

impl Operation {
    pub fn is_terminator(&self) -> bool {
        matches!(self, Operation::Ret { .. })
    }

    /// Whether the operation lives inside a block.
    pub fn is_instruction(&self) -> bool {
        !matches!(self, Operation::Const(_) | Operation::GlobalAddr(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Operation::GlobalAddr(_) | Operation::Alloca)
    }
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            blocks: Vec::new(),
            values: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn function(&self, func: FuncRef) -> &Function {
        &self.functions[func.0 as usize]
    }

    pub fn block(&self, block: BlockRef) -> &Block {
        &self.blocks[block.0 as usize]
    }

    pub fn value(&self, value: ValueRef) -> &Value {
        &self.values[value.0 as usize]
    }

    pub fn global(&self, global: GlobalRef) -> &Global {
        &self.globals[global.0 as usize]
    }

    pub fn find_function(&self, name: &str) -> Option<FuncRef> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|idx| FuncRef(idx as u32))
    }

    pub fn find_global(&self, name: &str) -> Option<GlobalRef> {
        self.globals
            .iter()
            .position(|g| g.name == name)
            .map(|idx| GlobalRef(idx as u32))
    }

    /// Whether `value` produces a number usable as an arithmetic or store operand.
    pub fn is_numeric(&self, value: ValueRef) -> bool {
        match self.value(value).op {
            Operation::Const(_) | Operation::Arith { .. } | Operation::Load { .. } => true,
            Operation::Call { callee } => self.function(callee).ret == ReturnKind::Number,
            _ => false,
        }
    }

    /// Function owning the block of `value`, if it is an instruction.
    pub fn owning_function(&self, value: ValueRef) -> Option<FuncRef> {
        self.value(value).block.map(|b| self.block(b).func)
    }

    /// First block of `func`, where execution starts.
    pub fn entry_block(&self, func: FuncRef) -> Option<BlockRef> {
        self.function(func).blocks.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.globals.is_empty()
    }
}
