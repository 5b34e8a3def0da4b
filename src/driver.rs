//! Command-line driver.
//!
//! Glue between the binary and the library: reads the source, parses it,
//! generates code for the selected backend, performs the requested dumps and
//! runs the program.

use std::io::Read;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::codegen::CodeGenerator;
use crate::core::{Backend, CompileResult, GeneratorConfig};
use crate::frontend;
use crate::ir::IrBackend;

/// Backend used to generate and run the program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// In-crate program representation executed by the interpreter.
    #[default]
    Interp,
    /// LLVM IR executed by MCJIT (requires the `llvm` feature).
    Llvm,
}

/// Compile and run a hebe program.
#[derive(Debug, Clone, Default, Parser)]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Source file. Read from stdin when absent.
    pub input: Option<PathBuf>,

    /// Log the structured tree before generating code.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_tree: bool,

    /// Print the generated program representation to stdout.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_ir: bool,

    /// Write the generated program representation to a file.
    #[arg(long, value_name = "PATH")]
    pub emit_ir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = BackendKind::Interp)]
    pub backend: BackendKind,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Options {
    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match (self.verbose, self.dump_tree) {
            (0, false) => "warn",
            (0, true) | (1, _) => "info",
            (2, _) => "debug",
            _ => "trace",
        }
    }
}

/// Program text named by `options`, or stdin.
pub fn read_source(options: &Options) -> CompileResult<String> {
    match &options.input {
        Some(path) => {
            log::debug!("Reading {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

/// Parse, generate and execute `source`, returning the program result.
pub fn run(source: &str, options: &Options) -> CompileResult<i32> {
    let program = frontend::parse(source)?;
    let config = GeneratorConfig::default();

    match options.backend {
        BackendKind::Interp => {
            let backend = IrBackend::from_config(&config);
            execute(CodeGenerator::with_config(backend, Some(program), config), options)
        }
        BackendKind::Llvm => run_llvm(program, config, options),
    }
}

#[cfg(feature = "llvm")]
fn run_llvm(program: crate::ast::Node, config: GeneratorConfig, options: &Options) -> CompileResult<i32> {
    let context = inkwell::context::Context::create();
    let backend = crate::llvm::LlvmBackend::from_config(&context, &config);
    execute(CodeGenerator::with_config(backend, Some(program), config), options)
}

#[cfg(not(feature = "llvm"))]
fn run_llvm(_program: crate::ast::Node, _config: GeneratorConfig, _options: &Options) -> CompileResult<i32> {
    log::error!("LLVM backend requested but hebe was built without the `llvm` feature");
    Err(crate::core::CompileError::backend("hebe was built without the `llvm` feature"))
}

fn execute<B: Backend>(mut generator: CodeGenerator<B>, options: &Options) -> CompileResult<i32> {
    if options.dump_tree {
        generator.print_node_tree()?;
    }

    generator.generate_code()?;

    if options.dump_ir {
        generator.print_program_representation();
    }
    if let Some(path) = &options.emit_ir {
        generator.export_to_file(path)?;
    }

    generator.run_jit()
}
