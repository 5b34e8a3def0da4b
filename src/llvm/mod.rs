// This module implements the Backend trait on top of LLVM through inkwell. Emission maps one
// to one onto an inkwell Builder positioned inside a Module: zero-argument functions returning
// void or double, `entry` blocks, double constants and fadd/fsub/fmul/fdiv instructions,
// external zero-initialized double globals, allocas for scratch slots, loads, stores, calls
// and returns. The builder constant-folds, so arithmetic on two constants yields a constant
// rather than an instruction. Duplicate detection uses the module's own symbol table.
// Execution hands the module to an MCJIT execution engine and calls the entry function through
// a native function pointer. Compiled only with the `llvm` cargo feature, which links LLVM 19.

//! LLVM backend using inkwell.

use std::path::Path;

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::targets::{InitializationConfig, Target};
use inkwell::values::{CallSiteValue, FloatValue, FunctionValue, GlobalValue, PointerValue};
use inkwell::{AddressSpace, OptimizationLevel};

use crate::core::{ArithOp, Backend, CompileError, CompileResult, GeneratorConfig, ReturnKind, SymbolKind};

/// Signature of the synthesized entry function.
type EntryFn = unsafe extern "C" fn() -> f64;

fn builder_error(err: impl std::fmt::Display) -> CompileError {
    log::error!("LLVM builder error: {}", err);
    CompileError::backend(err.to_string())
}

/// Backend emitting LLVM IR and running it with MCJIT.
pub struct LlvmBackend<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
}

impl<'ctx> LlvmBackend<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        log::debug!("Creating LLVM module {}", module_name);
        Self {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
        }
    }

    pub fn from_config(context: &'ctx Context, config: &GeneratorConfig) -> Self {
        Self::new(context, &config.module_name)
    }

    pub fn module(&self) -> &Module<'ctx> {
        &self.module
    }
}

impl<'ctx> Backend for LlvmBackend<'ctx> {
    type Function = FunctionValue<'ctx>;
    type Block = BasicBlock<'ctx>;
    type Value = FloatValue<'ctx>;
    type Pointer = PointerValue<'ctx>;
    type Global = GlobalValue<'ctx>;
    type CallSite = CallSiteValue<'ctx>;

    fn create_function(&mut self, name: &str, ret: ReturnKind) -> CompileResult<Self::Function> {
        if self.module.get_function(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::Function, name));
        }
        // LLVM would rename the new symbol to keep module names unique.
        if self.module.get_global(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::GlobalVariable, name));
        }
        let fn_type = match ret {
            ReturnKind::Void => self.context.void_type().fn_type(&[], false),
            ReturnKind::Number => self.context.f64_type().fn_type(&[], false),
        };
        Ok(self.module.add_function(name, fn_type, Some(Linkage::External)))
    }

    fn lookup_function(&self, name: &str) -> Option<Self::Function> {
        self.module.get_function(name)
    }

    fn create_block(&mut self, name: &str, function: Self::Function) -> CompileResult<Self::Block> {
        Ok(self.context.append_basic_block(function, name))
    }

    fn insertion_block(&self) -> Option<Self::Block> {
        self.builder.get_insert_block()
    }

    fn position_at_end(&mut self, block: Self::Block) {
        self.builder.position_at_end(block);
    }

    fn clear_insertion_point(&mut self) {
        self.builder.clear_insertion_position();
    }

    fn const_number(&mut self, value: f64) -> Self::Value {
        self.context.f64_type().const_float(value)
    }

    fn build_arith(&mut self, op: ArithOp, lhs: Self::Value, rhs: Self::Value) -> CompileResult<Self::Value> {
        let name = op.result_name();
        let result = match op {
            ArithOp::Add => self.builder.build_float_add(lhs, rhs, name),
            ArithOp::Sub => self.builder.build_float_sub(lhs, rhs, name),
            ArithOp::Mul => self.builder.build_float_mul(lhs, rhs, name),
            ArithOp::Div => self.builder.build_float_div(lhs, rhs, name),
        };
        result.map_err(builder_error)
    }

    fn create_global(&mut self, name: &str) -> CompileResult<Self::Global> {
        if self.module.get_global(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::GlobalVariable, name));
        }
        if self.module.get_function(name).is_some() {
            return Err(CompileError::duplicate(SymbolKind::Function, name));
        }
        let f64_type = self.context.f64_type();
        let global = self.module.add_global(f64_type, Some(AddressSpace::default()), name);
        global.set_initializer(&f64_type.const_zero());
        global.set_linkage(Linkage::External);
        Ok(global)
    }

    fn global_pointer(&self, global: Self::Global) -> Self::Pointer {
        global.as_pointer_value()
    }

    fn build_scratch_slot(&mut self, name: &str) -> CompileResult<Self::Pointer> {
        self.builder
            .build_alloca(self.context.f64_type(), name)
            .map_err(builder_error)
    }

    fn build_store(&mut self, value: Self::Value, ptr: Self::Pointer) -> CompileResult<()> {
        self.builder.build_store(ptr, value).map_err(builder_error)?;
        Ok(())
    }

    fn build_load(&mut self, ptr: Self::Pointer, name: &str) -> CompileResult<Self::Value> {
        let value = self
            .builder
            .build_load(self.context.f64_type(), ptr, name)
            .map_err(builder_error)?;
        Ok(value.into_float_value())
    }

    fn build_call(&mut self, function: Self::Function) -> CompileResult<Self::CallSite> {
        let name = match function.get_type().get_return_type() {
            Some(_) => "calltmp",
            None => "",
        };
        self.builder.build_call(function, &[], name).map_err(builder_error)
    }

    fn build_return(&mut self, value: Self::Value) -> CompileResult<()> {
        self.builder.build_return(Some(&value)).map_err(builder_error)?;
        Ok(())
    }

    fn build_return_void(&mut self) -> CompileResult<()> {
        self.builder.build_return(None).map_err(builder_error)?;
        Ok(())
    }

    fn verify(&self) -> CompileResult<()> {
        self.module.verify().map_err(|err| {
            log::error!("Module verification failed: {}", err);
            CompileError::backend(err.to_string())
        })
    }

    fn is_empty(&self) -> bool {
        self.module.get_first_function().is_none() && self.module.get_first_global().is_none()
    }

    fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    fn write_to_file(&self, path: &Path) -> CompileResult<()> {
        self.module
            .print_to_file(path)
            .map_err(|err| CompileError::backend(err.to_string()))
    }

    fn execute(self, entry: &str) -> CompileResult<f64> {
        Target::initialize_native(&InitializationConfig::default()).map_err(|err| {
            log::error!("Failed to initialize native target: {}", err);
            CompileError::backend(err)
        })?;

        let engine = self
            .module
            .create_jit_execution_engine(OptimizationLevel::None)
            .map_err(|err| {
                log::error!("Failed to create execution engine: {}", err);
                CompileError::backend(err.to_string())
            })?;

        let function = unsafe { engine.get_function::<EntryFn>(entry) }.map_err(|err| {
            log::error!("Could not find function '{}' in module: {}", entry, err);
            CompileError::backend(format!("could not find function '{entry}': {err}"))
        })?;

        log::debug!("Calling {} through MCJIT", entry);
        Ok(unsafe { function.call() })
    }
}
