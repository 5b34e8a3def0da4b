//! Per-node lowering dispatch.

use super::{CodeGenerator, Generated};
use crate::ast::{BinaryOperator, Node};
use crate::core::{ArithOp, Backend, CompileError, CompileResult};

impl From<BinaryOperator> for ArithOp {
    fn from(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Add => ArithOp::Add,
            BinaryOperator::Sub => ArithOp::Sub,
            BinaryOperator::Mul => ArithOp::Mul,
            BinaryOperator::Div => ArithOp::Div,
        }
    }
}

impl<B: Backend> CodeGenerator<B> {
    /// Lower one node at the current insertion point.
    pub fn codegen_expr(&mut self, node: &Node) -> CompileResult<Generated<B>> {
        self.stats.record_node(node.kind());
        log::trace!("Lowering {}", node.kind());

        match node {
            Node::Number(value) => Ok(Generated::Value(self.backend.const_number(*value))),
            Node::BinaryOp { op, left, right } => self.codegen_binary_op(*op, left, right),
            Node::Assignment { name, value } => self.codegen_assignment(name, value),
            Node::ProcedureBody(items) => self.codegen_procedure_body(items),
            Node::Procedure { name, body } => self.codegen_procedure(name, body),
            Node::ProcedureCall(name) => self.codegen_procedure_call(name),
            Node::Program(_) => {
                log::error!("Code generation for Program not supported");
                Err(CompileError::UnsupportedNode {
                    node: node.kind().to_string(),
                })
            }
        }
    }

    fn codegen_binary_op(&mut self, op: BinaryOperator, left: &Node, right: &Node) -> CompileResult<Generated<B>> {
        let lhs = self.codegen_expr(left)?;
        let lhs = expect_value(lhs, op)?;
        let rhs = self.codegen_expr(right)?;
        let rhs = expect_value(rhs, op)?;

        let value = self.backend.build_arith(op.into(), lhs, rhs)?;
        Ok(Generated::Value(value))
    }

    fn codegen_assignment(&mut self, name: &str, value: &Node) -> CompileResult<Generated<B>> {
        let global = self.global(name)?;
        let value = match self.codegen_expr(value)? {
            Generated::Value(v) => v,
            other => {
                log::error!("Assignment to {} from a {}", name, other.describe());
                return Err(CompileError::backend(format!(
                    "value assigned to {name} is a {}, not a number",
                    other.describe()
                )));
            }
        };

        let ptr = self.backend.global_pointer(global);
        self.backend.build_store(value, ptr)?;
        Ok(Generated::Global(global))
    }

    fn codegen_procedure_body(&mut self, items: &[Node]) -> CompileResult<Generated<B>> {
        let anchor = self.backend.build_scratch_slot("anchor")?;
        self.lower_items(items, anchor)?;
        Ok(Generated::Void)
    }

    /// Lower `items` in order, storing top-level numeric results into `anchor`.
    /// Returns what the last item produced.
    pub(super) fn lower_items(&mut self, items: &[Node], anchor: B::Pointer) -> CompileResult<Option<Generated<B>>> {
        let mut last = None;
        for item in items {
            let generated = self.codegen_expr(item)?;
            if let (true, Generated::Value(value)) = (item.is_numeric_expr(), generated) {
                self.backend.build_store(value, anchor)?;
                self.stats.record_anchor_store();
            }
            last = Some(generated);
        }
        Ok(last)
    }

    /// The global `name`, created zero-initialized on first use.
    pub(super) fn global(&mut self, name: &str) -> CompileResult<B::Global> {
        let backend = &mut self.backend;
        let stats = &mut self.stats;
        self.tables.globals.get_or_create(name, || {
            let global = backend.create_global(name)?;
            stats.record_global();
            Ok(global)
        })
    }
}

fn expect_value<B: Backend>(generated: Generated<B>, op: BinaryOperator) -> CompileResult<B::Value> {
    match generated {
        Generated::Value(value) => Ok(value),
        other => {
            log::error!("Operand of '{}' is a {}", op, other.describe());
            Err(CompileError::backend(format!(
                "operand of '{op}' is a {}, not a number",
                other.describe()
            )))
        }
    }
}
