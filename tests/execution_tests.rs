//! End-to-end runs from source text through the interpreter.

use hebe::ast::{BinaryOperator, Node};
use hebe::codegen::CodeGenerator;
use hebe::core::{CompileError, GeneratorConfig};
use hebe::driver::{self, Options};
use hebe::frontend;
use hebe::ir::IrBackend;

fn run(source: &str) -> Result<i32, CompileError> {
    driver::run(source, &Options::default())
}

#[test]
fn arithmetic_into_result() {
    assert_eq!(run("save 6 * 7 in ret").unwrap(), 42);
    assert_eq!(run("save (1 + 2) * (10 - 4) / 2 in ret").unwrap(), 9);
}

#[test]
fn result_is_truncated_toward_zero() {
    assert_eq!(run("save 7 / 2 in ret").unwrap(), 3);
    assert_eq!(run("save -2.9 in ret").unwrap(), -2);
    assert_eq!(run("save 1 / 0 in ret").unwrap(), i32::MAX);
}

#[test]
fn procedures_write_globals() {
    let source = "\
; sets the result from inside a procedure
create answer
    save 40 + 2 in ret
end
answer
";
    assert_eq!(run(source).unwrap(), 42);
}

#[test]
fn later_assignment_wins() {
    let source = "
create first save 1 in ret end
create second save 2 in ret end
second
first
";
    assert_eq!(run(source).unwrap(), 1);
}

#[test]
fn bare_literal_returns_zero() {
    assert_eq!(run("42").unwrap(), 0);
}

#[test]
fn keywords_ignore_case() {
    assert_eq!(run("CREATE p SAVE 5 IN ret END p").unwrap(), 5);
}

#[test]
fn parser_builds_expected_tree() {
    let program = frontend::parse("create p save 1 + 2 in x end\np\n3").unwrap();
    let expected = Node::Program(vec![
        Node::procedure(
            "p",
            vec![Node::assign(
                "x",
                Node::binary(BinaryOperator::Add, Node::number(1.0), Node::number(2.0)),
            )],
        ),
        Node::call("p"),
        Node::number(3.0),
    ]);
    assert_eq!(program, expected);
}

#[test]
fn errors_propagate_from_every_stage() {
    assert!(matches!(run("save 1 in"), Err(CompileError::Parse { .. })));
    assert!(matches!(run("p"), Err(CompileError::Lookup { .. })));
    assert!(matches!(run(""), Err(CompileError::Structural { .. })));
    assert!(matches!(
        run("create p 1 end create p 2 end"),
        Err(CompileError::DuplicateDefinition { .. })
    ));
}

#[test]
fn custom_entry_and_result_names() {
    let config = GeneratorConfig::default()
        .with_module_name("Custom")
        .with_entry_function("main")
        .with_result_variable("out");
    let program = frontend::parse("save 9 in out").unwrap();
    let backend = IrBackend::from_config(&config);

    let mut generator = CodeGenerator::with_config(backend, Some(program), config);
    generator.generate_code().unwrap();

    let text = generator.program_representation();
    assert!(text.starts_with("; ModuleID = 'Custom'"));
    assert!(text.contains("define double @main()"));
    assert_eq!(generator.run_jit().unwrap(), 9);
}

#[test]
fn stats_track_lowering() {
    let program = frontend::parse("create p save 1 in x end p p 2 * 3").unwrap();
    let mut generator = CodeGenerator::with_root(IrBackend::default(), program);
    generator.generate_code().unwrap();

    let stats = generator.stats();
    assert_eq!(stats.procedures_defined, 1);
    assert_eq!(stats.calls_emitted, 2);
    assert_eq!(stats.anchor_stores, 1);
    assert_eq!(stats.node_counts["ProcedureCall"], 2);
    assert_eq!(stats.node_counts["Number"], 3);
}

#[test]
fn llvm_backend_selection_without_feature() {
    let options = Options {
        backend: driver::BackendKind::Llvm,
        ..Options::default()
    };
    let result = driver::run("save 1 in ret", &options);
    if cfg!(feature = "llvm") {
        assert_eq!(result.unwrap(), 1);
    } else {
        assert!(matches!(result, Err(CompileError::Backend { .. })));
    }
}

#[test]
fn deep_procedure_chain_runs_at_default_depth() {
    let mut source = String::from("create p0 save 7 in ret end\n");
    for i in 1..1100 {
        source.push_str(&format!("create p{i} p{} end\n", i - 1));
    }
    source.push_str("p1099\n");

    assert_eq!(run(&source).unwrap(), 7);
}

#[test]
fn unbounded_recursion_reports_depth_limit() {
    let err = run("create p p end p").unwrap_err();
    assert!(matches!(err, CompileError::Backend { .. }));
    assert!(err.to_string().contains("call depth limit of 100000"));
}
