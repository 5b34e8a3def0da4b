//! Lowering tests against the in-crate backend.

use hebe::ast::{BinaryOperator, Node};
use hebe::codegen::{CodeGenerator, Generated};
use hebe::core::{ArithOp, CompileError, SymbolKind};
use hebe::ir::{Interpreter, IrBackend, Operation};

fn positioned() -> CodeGenerator<IrBackend> {
    let mut generator = CodeGenerator::new(IrBackend::default());
    generator.enter_entry_function().unwrap();
    generator
}

fn generate(items: Vec<Node>) -> Result<CodeGenerator<IrBackend>, CompileError> {
    let mut generator = CodeGenerator::with_root(IrBackend::default(), Node::Program(items));
    generator.generate_code()?;
    Ok(generator)
}

#[test]
fn number_lowers_to_equal_constant() {
    let mut generator = positioned();

    for value in [-100000.121212, -1.0, 0.0, 10.0, 123423421.23] {
        let Generated::Value(v) = generator.codegen_expr(&Node::number(value)).unwrap() else {
            panic!("number did not produce a value");
        };
        let module = generator.backend().module();
        assert_eq!(module.value(v).op, Operation::Const(value));
        assert!(module.is_numeric(v));
    }
}

#[test]
fn binary_op_keeps_operator_and_operand_order() {
    let mut generator = positioned();
    let pairs = [(1.0, 2.0), (-3.5, 0.0), (100.0, -0.25), (7.0, 7.0)];

    for op in BinaryOperator::ALL {
        for (a, b) in pairs {
            let node = Node::binary(op, Node::number(a), Node::number(b));
            let Generated::Value(v) = generator.codegen_expr(&node).unwrap() else {
                panic!("binary op did not produce a value");
            };

            let module = generator.backend().module();
            let Operation::Arith { op: tag, lhs, rhs } = module.value(v).op else {
                panic!("expected an arithmetic instruction for {op}");
            };
            assert_eq!(tag, ArithOp::from(op));
            assert_eq!(module.value(lhs).op, Operation::Const(a));
            assert_eq!(module.value(rhs).op, Operation::Const(b));
        }
    }
}

#[test]
fn assignment_stores_evaluated_value() {
    let generator = generate(vec![
        Node::assign("x", Node::binary(BinaryOperator::Mul, Node::number(2.0), Node::number(21.0))),
        Node::assign("y", Node::binary(BinaryOperator::Div, Node::number(1.0), Node::number(4.0))),
    ])
    .unwrap();
    assert!(generator.tables().globals.contains("x"));

    let module = generator.into_backend().into_module();
    assert!(module.find_global("x").is_some());

    let mut interp = Interpreter::new(&module, 16);
    interp.run("run").unwrap();
    assert_eq!(interp.global_value("x"), Some(42.0));
    assert_eq!(interp.global_value("y"), Some(0.25));
}

#[test]
fn repeated_assignment_reuses_global() {
    let generator = generate(vec![
        Node::assign("x", Node::number(1.0)),
        Node::assign("x", Node::number(2.0)),
    ])
    .unwrap();

    let module = generator.backend().module();
    assert_eq!(module.globals.iter().filter(|g| g.name == "x").count(), 1);
    assert_eq!(generator.tables().globals.names(), vec!["ret", "x"]);
    assert_eq!(generator.stats().globals_created, 2);
}

#[test]
fn duplicate_procedure_fails() {
    let err = generate(vec![
        Node::procedure("p", vec![Node::number(1.0)]),
        Node::procedure("p", vec![Node::number(2.0)]),
    ])
    .err()
    .unwrap();

    assert!(matches!(
        err,
        CompileError::DuplicateDefinition { kind: SymbolKind::Function, ref name } if name == "p"
    ));
}

#[test]
fn assignments_and_calls_only_program_succeeds() {
    let generator = generate(vec![
        Node::procedure("p", vec![Node::assign("y", Node::number(3.0))]),
        Node::call("p"),
        Node::assign("z", Node::number(5.0)),
    ])
    .unwrap();

    assert_eq!(generator.stats().anchor_stores, 0);
    assert!(generator.tables().globals.contains("ret"));
    assert_eq!(generator.run_jit().unwrap(), 0);
}

#[test]
fn literal_program_returns_result_initializer() {
    let generator = generate(vec![Node::number(42.0)]).unwrap();
    assert_eq!(generator.stats().anchor_stores, 1);
    assert_eq!(generator.run_jit().unwrap(), 0);
}

#[test]
fn call_before_definition_fails() {
    let err = generate(vec![
        Node::call("p"),
        Node::procedure("p", vec![Node::number(1.0)]),
    ])
    .err()
    .unwrap();

    assert!(matches!(
        err,
        CompileError::Lookup { kind: SymbolKind::Function, ref name } if name == "p"
    ));
}

#[test]
fn print_node_tree_without_root_fails() {
    let generator = CodeGenerator::new(IrBackend::default());
    assert!(matches!(generator.print_node_tree(), Err(CompileError::Structural { .. })));
}

#[test]
fn render_node_tree_lists_every_node() {
    let generator = CodeGenerator::with_root(
        IrBackend::default(),
        Node::Program(vec![Node::assign("ret", Node::number(1.5))]),
    );
    assert_eq!(
        generator.render_node_tree().unwrap(),
        vec!["Program:", "\tAssignment:", "\t\tVariableName: ret", "\t\tNumber: 1.5"]
    );
    generator.print_node_tree().unwrap();
    generator.print_node(&Node::call("p"), 2);
}

#[test]
fn structural_errors() {
    let mut generator = CodeGenerator::new(IrBackend::default());
    assert!(matches!(generator.generate_code(), Err(CompileError::Structural { .. })));

    assert!(matches!(generate(Vec::new()), Err(CompileError::Structural { .. })));

    let mut generator = CodeGenerator::with_root(IrBackend::default(), Node::number(1.0));
    assert!(matches!(generator.generate_code(), Err(CompileError::Structural { .. })));

    let err = generate(vec![Node::ProcedureBody(Vec::new())]).err().unwrap();
    assert!(matches!(err, CompileError::Structural { .. }));
}

#[test]
fn generate_code_runs_once() {
    let mut generator = generate(vec![Node::assign("ret", Node::number(1.0))]).unwrap();
    assert!(matches!(generator.generate_code(), Err(CompileError::Structural { .. })));
}

#[test]
fn run_requires_successful_generation() {
    let generator = CodeGenerator::new(IrBackend::default());
    assert!(matches!(generator.run_jit(), Err(CompileError::Structural { .. })));

    let mut generator = CodeGenerator::with_root(
        IrBackend::default(),
        Node::Program(vec![Node::assign("ret", Node::number(5.0)), Node::call("missing")]),
    );
    assert!(matches!(generator.generate_code(), Err(CompileError::Lookup { .. })));
    assert!(matches!(generator.run_jit(), Err(CompileError::Structural { .. })));
}

#[test]
fn global_and_procedure_names_collide() {
    let err = generate(vec![
        Node::assign("x", Node::number(1.0)),
        Node::procedure("x", vec![Node::number(2.0)]),
    ])
    .err()
    .unwrap();
    assert!(matches!(
        err,
        CompileError::DuplicateDefinition { kind: SymbolKind::GlobalVariable, ref name } if name == "x"
    ));

    let err = generate(vec![
        Node::procedure("y", vec![Node::number(2.0)]),
        Node::assign("y", Node::number(1.0)),
    ])
    .err()
    .unwrap();
    assert!(matches!(
        err,
        CompileError::DuplicateDefinition { kind: SymbolKind::Function, ref name } if name == "y"
    ));
}

#[test]
fn program_node_is_unsupported_in_dispatch() {
    let mut generator = positioned();
    let err = generator.codegen_expr(&Node::Program(Vec::new())).unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedNode { .. }));
}

#[test]
fn non_numeric_operand_is_a_backend_error() {
    let mut generator = positioned();
    let node = Node::binary(BinaryOperator::Add, Node::assign("x", Node::number(1.0)), Node::number(2.0));
    assert!(matches!(generator.codegen_expr(&node), Err(CompileError::Backend { .. })));
}

#[test]
fn anchor_receives_top_level_numeric_results() {
    let generator = generate(vec![
        Node::number(1.0),
        Node::binary(BinaryOperator::Add, Node::number(2.0), Node::number(3.0)),
        Node::assign("ret", Node::number(4.0)),
    ])
    .unwrap();

    assert_eq!(generator.stats().anchor_stores, 2);
    let text = generator.program_representation();
    assert!(text.contains("  store double 1.0, ptr %anchor\n"));
    assert!(text.contains("  store double %addtmp, ptr %anchor\n"));
}

#[test]
fn program_representation_text() {
    let generator = generate(vec![Node::assign(
        "ret",
        Node::binary(BinaryOperator::Add, Node::number(2.0), Node::number(40.0)),
    )])
    .unwrap();

    let expected = "\
; ModuleID = 'MainModule'

@ret = global double 0.0

define double @run() {
entry:
  %anchor = alloca double
  %addtmp = fadd double 2.0, 40.0
  store double %addtmp, ptr @ret
  %ret.load = load double, ptr @ret
  ret double %ret.load
}
";
    assert_eq!(generator.program_representation(), expected);
}

#[test]
fn export_writes_representation() {
    let generator = generate(vec![Node::assign("ret", Node::number(3.0))]).unwrap();
    let path = std::env::temp_dir().join(format!("hebe_export_{}.ll", std::process::id()));

    generator.export_to_file(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, generator.program_representation());
}
