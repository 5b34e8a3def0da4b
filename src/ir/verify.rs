//! Structural verification of a [`Module`].
//!
//! Checks performed per defined function:
//! - every block is non-empty and ends with exactly one terminator
//! - returns agree with the function's return kind
//! - instruction operands are defined in the same function
//! - loads and stores go through pointers, arithmetic uses numbers

use super::{FuncRef, Module, Operation, ValueRef};
use crate::core::{CompileError, CompileResult, ReturnKind};

pub fn verify_module(module: &Module) -> CompileResult<()> {
    for idx in 0..module.functions.len() {
        verify_function(module, FuncRef(idx as u32))?;
    }
    Ok(())
}

fn fail(module: &Module, func: FuncRef, reason: String) -> CompileError {
    let name = &module.function(func).name;
    log::error!("Verification of function {} failed: {}", name, reason);
    CompileError::backend(format!("function {name}: {reason}"))
}

fn verify_function(module: &Module, func: FuncRef) -> CompileResult<()> {
    let function = module.function(func);

    for &block_ref in &function.blocks {
        let block = module.block(block_ref);
        let Some((&last, body)) = block.insts.split_last() else {
            return Err(fail(module, func, format!("block {} is empty", block.name)));
        };

        if !module.value(last).op.is_terminator() {
            return Err(fail(module, func, format!("block {} has no terminator", block.name)));
        }
        if body.iter().any(|&inst| module.value(inst).op.is_terminator()) {
            return Err(fail(
                module,
                func,
                format!("block {} has a terminator before its end", block.name),
            ));
        }

        for &inst in &block.insts {
            verify_instruction(module, func, inst)?;
        }
    }

    Ok(())
}

fn verify_instruction(module: &Module, func: FuncRef, inst: ValueRef) -> CompileResult<()> {
    if !module.value(inst).op.is_instruction() {
        return Err(fail(module, func, format!("%{} is not an instruction", inst.0)));
    }

    let check_local = |operand: ValueRef| -> CompileResult<()> {
        match module.owning_function(operand) {
            Some(owner) if owner != func => Err(fail(
                module,
                func,
                format!("operand %{} belongs to function {}", operand.0, module.function(owner).name),
            )),
            _ => Ok(()),
        }
    };
    let check_numeric = |operand: ValueRef| -> CompileResult<()> {
        check_local(operand)?;
        if module.is_numeric(operand) {
            Ok(())
        } else {
            Err(fail(module, func, format!("operand %{} is not numeric", operand.0)))
        }
    };
    let check_pointer = |operand: ValueRef| -> CompileResult<()> {
        check_local(operand)?;
        if module.value(operand).op.is_pointer() {
            Ok(())
        } else {
            Err(fail(module, func, format!("operand %{} is not a pointer", operand.0)))
        }
    };

    match module.value(inst).op {
        Operation::Arith { lhs, rhs, .. } => {
            check_numeric(lhs)?;
            check_numeric(rhs)
        }
        Operation::Load { ptr } => check_pointer(ptr),
        Operation::Store { value, ptr } => {
            check_numeric(value)?;
            check_pointer(ptr)
        }
        Operation::Ret { value } => match (module.function(func).ret, value) {
            (ReturnKind::Number, Some(v)) => check_numeric(v),
            (ReturnKind::Void, None) => Ok(()),
            (ReturnKind::Number, None) => Err(fail(module, func, "missing return value".to_string())),
            (ReturnKind::Void, Some(_)) => Err(fail(module, func, "void function returns a value".to_string())),
        },
        Operation::Alloca | Operation::Call { .. } | Operation::Const(_) | Operation::GlobalAddr(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArithOp, Backend};
    use crate::ir::IrBackend;

    #[test]
    fn well_formed_function_passes() {
        let mut backend = IrBackend::new("m");
        let f = backend.create_function("f", ReturnKind::Number).unwrap();
        let entry = backend.create_block("entry", f).unwrap();
        backend.position_at_end(entry);
        let one = backend.const_number(1.0);
        let sum = backend.build_arith(ArithOp::Add, one, one).unwrap();
        backend.build_return(sum).unwrap();

        assert!(backend.verify().is_ok());
    }

    #[test]
    fn missing_terminator_fails() {
        let mut backend = IrBackend::new("m");
        let f = backend.create_function("f", ReturnKind::Void).unwrap();
        let entry = backend.create_block("entry", f).unwrap();
        backend.position_at_end(entry);
        backend.build_scratch_slot("slot").unwrap();

        let err = backend.verify().unwrap_err();
        assert!(err.to_string().contains("has no terminator"));
    }

    #[test]
    fn empty_block_fails() {
        let mut backend = IrBackend::new("m");
        let f = backend.create_function("f", ReturnKind::Void).unwrap();
        backend.create_block("entry", f).unwrap();

        let err = backend.verify().unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn cross_function_operand_fails() {
        let mut backend = IrBackend::new("m");
        let f = backend.create_function("f", ReturnKind::Void).unwrap();
        let f_entry = backend.create_block("entry", f).unwrap();
        let g = backend.create_function("g", ReturnKind::Void).unwrap();
        let g_entry = backend.create_block("entry", g).unwrap();

        backend.position_at_end(f_entry);
        let slot = backend.build_scratch_slot("slot").unwrap();
        backend.build_return_void().unwrap();

        backend.position_at_end(g_entry);
        let one = backend.const_number(1.0);
        backend.build_store(one, slot).unwrap();
        backend.build_return_void().unwrap();

        let err = backend.verify().unwrap_err();
        assert!(err.to_string().contains("belongs to function f"));
    }

    #[test]
    fn declarations_are_accepted() {
        let mut backend = IrBackend::new("m");
        backend.create_function("ext", ReturnKind::Void).unwrap();
        assert!(backend.verify().is_ok());
    }
}
