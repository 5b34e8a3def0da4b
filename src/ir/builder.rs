//! Builder for the in-crate program representation.
//!
//! [`IrBackend`] implements [`Backend`] on top of a [`Module`]. It mirrors the
//! behaviour of an LLVM `IRBuilder` configured without constant folding:
//! every arithmetic instruction is emitted as-is so tests can inspect it.

use std::path::Path;

use hashbrown::HashMap;

use super::interp::Interpreter;
use super::{Block, BlockRef, FuncRef, Function, Global, GlobalRef, Module, Operation, Value, ValueRef};
use crate::core::{ArithOp, Backend, CompileError, CompileResult, GeneratorConfig, ReturnKind, SymbolKind};

/// Backend building a [`Module`] and executing it with the [`Interpreter`].
#[derive(Debug, Clone)]
pub struct IrBackend {
    module: Module,
    cursor: Option<BlockRef>,
    max_call_depth: usize,
    /// Per-function counters used to keep value names unique.
    name_counts: HashMap<(FuncRef, String), u32>,
}

impl IrBackend {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module: Module::new(module_name),
            cursor: None,
            max_call_depth: GeneratorConfig::default().max_call_depth,
            name_counts: HashMap::new(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut backend = Self::new(config.module_name.clone());
        backend.max_call_depth = config.max_call_depth;
        backend
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn into_module(self) -> Module {
        self.module
    }

    fn push_value(&mut self, name: String, op: Operation, block: Option<BlockRef>) -> ValueRef {
        let idx = ValueRef(self.module.values.len() as u32);
        self.module.values.push(Value { name, op, block });
        idx
    }

    /// Append an instruction at the end of the current block.
    fn append(&mut self, name: &str, op: Operation) -> CompileResult<ValueRef> {
        let block = self
            .cursor
            .ok_or_else(|| CompileError::backend("builder position is not set"))?;
        let name = self.unique_name(block, name);
        let value = self.push_value(name, op, Some(block));
        self.module.blocks[block.0 as usize].insts.push(value);
        Ok(value)
    }

    /// LLVM-style uniquing: `addtmp`, `addtmp1`, `addtmp2`, ...
    fn unique_name(&mut self, block: BlockRef, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }
        let func = self.module.block(block).func;
        let count = self.name_counts.entry((func, name.to_string())).or_insert(0);
        let unique = if *count == 0 {
            name.to_string()
        } else {
            format!("{name}{count}")
        };
        *count += 1;
        unique
    }

    fn expect_numeric(&self, value: ValueRef, what: &str) -> CompileResult<()> {
        if self.module.is_numeric(value) {
            Ok(())
        } else {
            Err(CompileError::backend(format!(
                "{what} operand {:?} is not a numeric value",
                self.module.value(value).op
            )))
        }
    }

    fn expect_pointer(&self, ptr: ValueRef) -> CompileResult<()> {
        if self.module.value(ptr).op.is_pointer() {
            Ok(())
        } else {
            Err(CompileError::backend(format!(
                "operand {:?} is not a pointer",
                self.module.value(ptr).op
            )))
        }
    }

    fn current_function(&self) -> CompileResult<&Function> {
        let block = self
            .cursor
            .ok_or_else(|| CompileError::backend("builder position is not set"))?;
        Ok(self.module.function(self.module.block(block).func))
    }
}

impl Default for IrBackend {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl Backend for IrBackend {
    type Function = FuncRef;
    type Block = BlockRef;
    type Value = ValueRef;
    type Pointer = ValueRef;
    type Global = GlobalRef;
    type CallSite = ValueRef;

    fn create_function(&mut self, name: &str, ret: ReturnKind) -> CompileResult<FuncRef> {
        if self.module.find_function(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::Function, name));
        }
        // Functions and globals share one symbol namespace.
        if self.module.find_global(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::GlobalVariable, name));
        }
        let func = FuncRef(self.module.functions.len() as u32);
        self.module.functions.push(Function {
            name: name.to_string(),
            ret,
            blocks: Vec::new(),
        });
        Ok(func)
    }

    fn lookup_function(&self, name: &str) -> Option<FuncRef> {
        self.module.find_function(name)
    }

    fn create_block(&mut self, name: &str, function: FuncRef) -> CompileResult<BlockRef> {
        if function.0 as usize >= self.module.functions.len() {
            return Err(CompileError::backend(format!("unknown function {:?}", function)));
        }
        let block = BlockRef(self.module.blocks.len() as u32);
        self.module.blocks.push(Block {
            name: name.to_string(),
            func: function,
            insts: Vec::new(),
        });
        self.module.functions[function.0 as usize].blocks.push(block);
        Ok(block)
    }

    fn insertion_block(&self) -> Option<BlockRef> {
        self.cursor
    }

    fn position_at_end(&mut self, block: BlockRef) {
        self.cursor = Some(block);
    }

    fn clear_insertion_point(&mut self) {
        self.cursor = None;
    }

    fn const_number(&mut self, value: f64) -> ValueRef {
        self.push_value(String::new(), Operation::Const(value), None)
    }

    fn build_arith(&mut self, op: ArithOp, lhs: ValueRef, rhs: ValueRef) -> CompileResult<ValueRef> {
        self.expect_numeric(lhs, op.mnemonic())?;
        self.expect_numeric(rhs, op.mnemonic())?;
        self.append(op.result_name(), Operation::Arith { op, lhs, rhs })
    }

    fn create_global(&mut self, name: &str) -> CompileResult<GlobalRef> {
        if self.module.find_global(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::GlobalVariable, name));
        }
        if self.module.find_function(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::Function, name));
        }
        let global = GlobalRef(self.module.globals.len() as u32);
        let addr = self.push_value(name.to_string(), Operation::GlobalAddr(global), None);
        self.module.globals.push(Global {
            name: name.to_string(),
            init: 0.0,
            external: true,
            addr,
        });
        Ok(global)
    }

    fn global_pointer(&self, global: GlobalRef) -> ValueRef {
        self.module.global(global).addr
    }

    fn build_scratch_slot(&mut self, name: &str) -> CompileResult<ValueRef> {
        self.append(name, Operation::Alloca)
    }

    fn build_store(&mut self, value: ValueRef, ptr: ValueRef) -> CompileResult<()> {
        self.expect_numeric(value, "store")?;
        self.expect_pointer(ptr)?;
        self.append("", Operation::Store { value, ptr })?;
        Ok(())
    }

    fn build_load(&mut self, ptr: ValueRef, name: &str) -> CompileResult<ValueRef> {
        self.expect_pointer(ptr)?;
        self.append(name, Operation::Load { ptr })
    }

    fn build_call(&mut self, function: FuncRef) -> CompileResult<ValueRef> {
        let name = match self.module.function(function).ret {
            ReturnKind::Number => "calltmp",
            ReturnKind::Void => "",
        };
        self.append(name, Operation::Call { callee: function })
    }

    fn build_return(&mut self, value: ValueRef) -> CompileResult<()> {
        if self.current_function()?.ret != ReturnKind::Number {
            return Err(CompileError::backend("value returned from a void function"));
        }
        self.expect_numeric(value, "ret")?;
        self.append("", Operation::Ret { value: Some(value) })?;
        Ok(())
    }

    fn build_return_void(&mut self) -> CompileResult<()> {
        if self.current_function()?.ret != ReturnKind::Void {
            return Err(CompileError::backend("void return from a function returning a number"));
        }
        self.append("", Operation::Ret { value: None })?;
        Ok(())
    }

    fn verify(&self) -> CompileResult<()> {
        super::verify::verify_module(&self.module)
    }

    fn is_empty(&self) -> bool {
        self.module.is_empty()
    }

    fn print_to_string(&self) -> String {
        self.module.to_string()
    }

    fn write_to_file(&self, path: &Path) -> CompileResult<()> {
        std::fs::write(path, self.module.to_string())?;
        Ok(())
    }

    fn execute(self, entry: &str) -> CompileResult<f64> {
        let mut interpreter = Interpreter::new(&self.module, self.max_call_depth);
        interpreter.run(entry)
    }
}
