//! Textual rendering of a [`Module`].

use std::fmt;

use super::{Module, Operation, ValueRef};
use crate::core::ReturnKind;

fn type_name(ret: ReturnKind) -> &'static str {
    match ret {
        ReturnKind::Void => "void",
        ReturnKind::Number => "double",
    }
}

/// Render an operand: constants inline, globals with `@`, locals with `%`.
fn operand(module: &Module, value: ValueRef) -> String {
    let v = module.value(value);
    match v.op {
        Operation::Const(c) => format!("{c:?}"),
        Operation::GlobalAddr(g) => format!("@{}", module.global(g).name),
        _ if v.name.is_empty() => format!("%{}", value.0),
        _ => format!("%{}", v.name),
    }
}

fn print_instruction(module: &Module, value: ValueRef, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let def = operand(module, value);
    match module.value(value).op {
        Operation::Arith { op, lhs, rhs } => writeln!(
            f,
            "  {def} = {} double {}, {}",
            op.mnemonic(),
            operand(module, lhs),
            operand(module, rhs)
        ),
        Operation::Alloca => writeln!(f, "  {def} = alloca double"),
        Operation::Load { ptr } => writeln!(f, "  {def} = load double, ptr {}", operand(module, ptr)),
        Operation::Store { value, ptr } => writeln!(
            f,
            "  store double {}, ptr {}",
            operand(module, value),
            operand(module, ptr)
        ),
        Operation::Call { callee } => {
            let func = module.function(callee);
            match func.ret {
                ReturnKind::Void => writeln!(f, "  call void @{}()", func.name),
                ReturnKind::Number => writeln!(f, "  {def} = call double @{}()", func.name),
            }
        }
        Operation::Ret { value: Some(v) } => writeln!(f, "  ret double {}", operand(module, v)),
        Operation::Ret { value: None } => writeln!(f, "  ret void"),
        Operation::Const(_) | Operation::GlobalAddr(_) => Ok(()),
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;

        if !self.globals.is_empty() {
            writeln!(f)?;
        }
        for global in &self.globals {
            let linkage = if global.external { "global" } else { "internal global" };
            writeln!(f, "@{} = {} double {:?}", global.name, linkage, global.init)?;
        }

        for func in &self.functions {
            writeln!(f)?;
            if func.blocks.is_empty() {
                writeln!(f, "declare {} @{}()", type_name(func.ret), func.name)?;
                continue;
            }
            writeln!(f, "define {} @{}() {{", type_name(func.ret), func.name)?;
            for &block in &func.blocks {
                let block = self.block(block);
                writeln!(f, "{}:", block.name)?;
                for &inst in &block.insts {
                    print_instruction(self, inst, f)?;
                }
            }
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}
