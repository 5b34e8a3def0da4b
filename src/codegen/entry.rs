//! Entry function synthesis.
//!
//! The whole program runs inside one implicit function, `run` by default. Its
//! result is whatever the result global (`ret` by default) holds once every
//! top-level item has been lowered.

use super::{CodeGenerator, Generated};
use crate::ast::Node;
use crate::core::{Backend, CompileError, CompileResult, ReturnKind};

impl<B: Backend> CodeGenerator<B> {
    /// Lower the whole tree into the backend.
    pub fn generate_code(&mut self) -> CompileResult<()> {
        log::info!("Generating code for module {}", self.config.module_name);
        if self.generated {
            return Err(CompileError::structural("code has already been generated"));
        }

        let Some(root) = self.root.take() else {
            log::error!("No code provided. root node is empty");
            return Err(CompileError::structural("no code provided, root node is empty"));
        };
        let result = self.lower_program(&root);
        self.root = Some(root);

        match result {
            Ok(()) => {
                self.generated = true;
                log::debug!("{}", self.stats);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to generate code: {}", err);
                Err(err)
            }
        }
    }

    /// Position the cursor in the entry block of the entry function, creating
    /// both on first use, and return the liveness anchor of that body.
    pub fn enter_entry_function(&mut self) -> CompileResult<B::Pointer> {
        let name = self.config.entry_function.clone();

        let backend = &mut self.backend;
        let function = self
            .tables
            .functions
            .get_or_create(&name, || backend.create_function(&name, ReturnKind::Number))?;

        let backend = &mut self.backend;
        let block = self
            .tables
            .blocks
            .get_or_create(&name, "entry", || backend.create_block("entry", function))?;

        self.backend.position_at_end(block);
        self.backend.build_scratch_slot("anchor")
    }

    fn lower_program(&mut self, root: &Node) -> CompileResult<()> {
        let Node::Program(items) = root else {
            return Err(CompileError::structural(format!(
                "root node is a {}, expected Program",
                root.kind()
            )));
        };
        if items.is_empty() {
            return Err(CompileError::structural("program has no items"));
        }

        let anchor = self.enter_entry_function()?;
        let last = self.lower_items(items, anchor)?;

        let result_name = self.config.result_variable.clone();
        let result = self.global(&result_name)?;
        let ptr = self.backend.global_pointer(result);
        let value = self.backend.build_load(ptr, &format!("{result_name}.load"))?;

        if last.as_ref().map_or(true, Generated::is_void) {
            return Err(CompileError::structural(
                "last top-level item did not produce a value",
            ));
        }

        self.backend.build_return(value)?;
        self.backend.verify()
    }
}
