//! Generator configuration.
//!
//! The defaults match the conventions of the language: the program runs as a
//! function named `run` and its result is whatever the global `ret` holds.

/// Names and limits used while generating and executing a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Name of the module holding the program representation.
    pub module_name: String,
    /// Name of the synthesized entry function.
    pub entry_function: String,
    /// Global read back as the program result.
    pub result_variable: String,
    /// Deepest call nesting the interpreter accepts before failing. Frames live
    /// on the heap, so this only bounds runaway recursion.
    pub max_call_depth: usize,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self {
            module_name: "MainModule".to_string(),
            entry_function: "run".to_string(),
            result_variable: "ret".to_string(),
            max_call_depth: 100_000,
        }
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_entry_function(mut self, name: impl Into<String>) -> Self {
        self.entry_function = name.into();
        self
    }

    pub fn with_result_variable(mut self, name: impl Into<String>) -> Self {
        self.result_variable = name.into();
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
