// This module provides the execution engine of the in-crate backend: a direct interpreter
// over a verified Module. Globals are materialized once per interpreter from their
// initializers and persist across calls. Calls run on an explicit, heap-allocated frame stack:
// each frame records its function, its current block and instruction index, its instruction
// results and scratch slots, and the call instruction in the caller that receives its result.
// Call depth is therefore bounded by memory, never by the native stack; max_call_depth only
// stops runaway self-calls with a backend error. Execution runs straight-line through a block
// until a return, since the language has no branches. Lookup of the entry function, calls
// into declarations and use of undefined values are all reported as backend errors.

//! Interpreter for the in-crate program representation.

use hashbrown::HashMap;

use super::{BlockRef, FuncRef, Module, Operation, ValueRef};
use crate::core::{CompileError, CompileResult, ReturnKind};

/// Activation record of one call.
#[derive(Debug)]
struct Frame {
    func: FuncRef,
    block: BlockRef,
    /// Index of the next instruction in `block`.
    pc: usize,
    /// Call instruction in the caller receiving the return value.
    call_site: Option<ValueRef>,
    values: HashMap<ValueRef, f64>,
    slots: HashMap<ValueRef, f64>,
}

/// Execution engine for a [`Module`].
#[derive(Debug)]
pub struct Interpreter<'m> {
    module: &'m Module,
    memory: Vec<f64>,
    max_call_depth: usize,
    instructions_executed: usize,
}

impl<'m> Interpreter<'m> {
    pub fn new(module: &'m Module, max_call_depth: usize) -> Self {
        log::debug!("Initializing interpreter for module {}", module.name);
        Self {
            module,
            memory: module.globals.iter().map(|g| g.init).collect(),
            max_call_depth,
            instructions_executed: 0,
        }
    }

    /// Run the numeric function `entry` with no arguments.
    pub fn run(&mut self, entry: &str) -> CompileResult<f64> {
        let Some(func) = self.module.find_function(entry) else {
            log::error!("Could not find function '{}' in module", entry);
            return Err(CompileError::backend(format!("could not find function '{entry}'")));
        };
        if self.module.function(func).ret != ReturnKind::Number {
            return Err(CompileError::backend(format!("function '{entry}' does not return a number")));
        }

        let result = self.execute(func)?;
        log::debug!(
            "Executed {} instructions, {} returned {:?}",
            self.instructions_executed,
            entry,
            result
        );
        result.ok_or_else(|| CompileError::backend(format!("function '{entry}' returned no value")))
    }

    /// Current value of the global `name`.
    pub fn global_value(&self, name: &str) -> Option<f64> {
        self.module
            .find_global(name)
            .map(|g| self.memory[g.0 as usize])
    }

    pub fn instructions_executed(&self) -> usize {
        self.instructions_executed
    }

    fn enter(&self, func: FuncRef, call_site: Option<ValueRef>) -> CompileResult<Frame> {
        let function = self.module.function(func);
        let Some(block) = self.module.entry_block(func) else {
            return Err(CompileError::backend(format!(
                "call to function '{}' without a body",
                function.name
            )));
        };

        log::trace!("Entering {}", function.name);
        Ok(Frame {
            func,
            block,
            pc: 0,
            call_site,
            values: HashMap::new(),
            slots: HashMap::new(),
        })
    }

    /// Run `func` to completion, including every call it makes.
    fn execute(&mut self, func: FuncRef) -> CompileResult<Option<f64>> {
        let module = self.module;
        let mut stack = vec![self.enter(func, None)?];

        while let Some(frame) = stack.last_mut() {
            let Some(&inst) = module.block(frame.block).insts.get(frame.pc) else {
                return Err(CompileError::backend(format!(
                    "block {} of '{}' ended without a terminator",
                    module.block(frame.block).name,
                    module.function(frame.func).name
                )));
            };
            frame.pc += 1;
            self.instructions_executed += 1;

            match module.value(inst).op {
                Operation::Arith { op, lhs, rhs } => {
                    let result = op.apply(self.operand(frame, lhs)?, self.operand(frame, rhs)?);
                    frame.values.insert(inst, result);
                }
                Operation::Alloca => {
                    frame.slots.insert(inst, 0.0);
                }
                Operation::Load { ptr } => {
                    let value = self.read(frame, ptr)?;
                    frame.values.insert(inst, value);
                }
                Operation::Store { value, ptr } => {
                    let value = self.operand(frame, value)?;
                    self.write(frame, ptr, value)?;
                }
                Operation::Call { callee } => {
                    if stack.len() >= self.max_call_depth {
                        return Err(CompileError::backend(format!(
                            "call depth limit of {} exceeded in '{}'",
                            self.max_call_depth,
                            module.function(callee).name
                        )));
                    }
                    let callee_frame = self.enter(callee, Some(inst))?;
                    stack.push(callee_frame);
                }
                Operation::Ret { value } => {
                    let result = match value {
                        Some(v) => Some(self.operand(frame, v)?),
                        None => None,
                    };
                    let call_site = frame.call_site;
                    stack.pop();

                    match stack.last_mut() {
                        None => return Ok(result),
                        Some(caller) => {
                            if let (Some(site), Some(result)) = (call_site, result) {
                                caller.values.insert(site, result);
                            }
                        }
                    }
                }
                Operation::Const(_) | Operation::GlobalAddr(_) => {
                    return Err(CompileError::backend(format!("%{} is not an instruction", inst.0)));
                }
            }
        }

        Err(CompileError::backend("call stack emptied without a return"))
    }

    fn operand(&self, frame: &Frame, value: ValueRef) -> CompileResult<f64> {
        match self.module.value(value).op {
            Operation::Const(c) => Ok(c),
            _ => frame
                .values
                .get(&value)
                .copied()
                .ok_or_else(|| CompileError::backend(format!("value %{} used before definition", value.0))),
        }
    }

    fn read(&self, frame: &Frame, ptr: ValueRef) -> CompileResult<f64> {
        match self.module.value(ptr).op {
            Operation::GlobalAddr(g) => Ok(self.memory[g.0 as usize]),
            Operation::Alloca => frame
                .slots
                .get(&ptr)
                .copied()
                .ok_or_else(|| CompileError::backend(format!("slot %{} read before allocation", ptr.0))),
            _ => Err(CompileError::backend(format!("load from non-pointer %{}", ptr.0))),
        }
    }

    fn write(&mut self, frame: &mut Frame, ptr: ValueRef, value: f64) -> CompileResult<()> {
        match self.module.value(ptr).op {
            Operation::GlobalAddr(g) => {
                self.memory[g.0 as usize] = value;
                Ok(())
            }
            Operation::Alloca => match frame.slots.get_mut(&ptr) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(CompileError::backend(format!("slot %{} written before allocation", ptr.0))),
            },
            _ => Err(CompileError::backend(format!("store to non-pointer %{}", ptr.0))),
        }
    }
}
