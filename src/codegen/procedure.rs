// Procedure definitions become void, zero-argument functions with a single `entry` block.
// Definition goes through the non-idempotent registry path so a second definition of the same
// name is a duplicate. The body is lowered with the insertion cursor moved into the new block;
// with_insertion_block restores the previous cursor whatever the body returns, so nested
// definitions and failed bodies leave the enclosing function positioned where it was.
// Calls resolve their target against the backend's whole module rather than the registry.

//! Procedure definition and invocation.

use super::{CodeGenerator, Generated};
use crate::ast::Node;
use crate::core::{Backend, CompileError, CompileResult, ReturnKind, SymbolKind};

impl<B: Backend> CodeGenerator<B> {
    pub(super) fn codegen_procedure(&mut self, name: &str, body: &Node) -> CompileResult<Generated<B>> {
        log::debug!("Defining procedure {}", name);

        let backend = &mut self.backend;
        let function = self
            .tables
            .functions
            .create(name, || backend.create_function(name, ReturnKind::Void))?;

        let backend = &mut self.backend;
        let block = self
            .tables
            .blocks
            .create(name, "entry", || backend.create_block("entry", function))?;

        self.with_insertion_block(block, |this| {
            match body {
                Node::ProcedureBody(_) => this.codegen_expr(body)?,
                other => {
                    log::error!("Procedure {} has a {} as body", name, other.kind());
                    return Err(CompileError::structural(format!(
                        "body of procedure {name} is a {}, expected ProcedureBody",
                        other.kind()
                    )));
                }
            };
            this.backend.build_return_void()
        })?;

        self.stats.record_procedure();
        Ok(Generated::Function(function))
    }

    pub(super) fn codegen_procedure_call(&mut self, name: &str) -> CompileResult<Generated<B>> {
        let Some(function) = self.backend.lookup_function(name) else {
            log::error!("Function {} not found in module", name);
            return Err(CompileError::lookup(SymbolKind::Function, name));
        };

        let call = self.backend.build_call(function)?;
        self.stats.record_call(name);
        Ok(Generated::Call(call))
    }

    /// Run `f` with the insertion cursor at the end of `block`, then put the
    /// cursor back where it was, on success and on error alike.
    pub fn with_insertion_block<R, F>(&mut self, block: B::Block, f: F) -> CompileResult<R>
    where
        F: FnOnce(&mut Self) -> CompileResult<R>,
    {
        let saved = self.backend.insertion_block();
        self.backend.position_at_end(block);

        let result = f(self);

        match saved {
            Some(saved) => self.backend.position_at_end(saved),
            None => self.backend.clear_insertion_point(),
        }
        result
    }
}
