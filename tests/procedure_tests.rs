//! Procedure definition, calls and insertion cursor handling.

use hebe::ast::Node;
use hebe::codegen::{CodeGenerator, Generated};
use hebe::core::{Backend, CompileError, GeneratorConfig, SymbolKind};
use hebe::ir::IrBackend;

fn positioned() -> CodeGenerator<IrBackend> {
    let mut generator = CodeGenerator::new(IrBackend::default());
    generator.enter_entry_function().unwrap();
    generator
}

#[test]
fn definition_restores_cursor() {
    let mut generator = positioned();
    let entry = generator.backend().insertion_block();

    let generated = generator
        .codegen_expr(&Node::procedure("p", vec![Node::number(1.0)]))
        .unwrap();

    assert!(matches!(generated, Generated::Function(_)));
    assert_eq!(generator.backend().insertion_block(), entry);
    assert_eq!(generator.stats().procedures_defined, 1);
}

#[test]
fn nested_definitions_restore_enclosing_cursor() {
    let mut generator = positioned();
    let entry = generator.backend().insertion_block();

    let outer = Node::procedure(
        "outer",
        vec![
            Node::procedure("inner", vec![Node::assign("a", Node::number(1.0))]),
            Node::call("inner"),
            Node::assign("b", Node::number(2.0)),
        ],
    );
    generator.codegen_expr(&outer).unwrap();
    assert_eq!(generator.backend().insertion_block(), entry);

    let text = generator.program_representation();
    let inner = text.find("define void @inner()").unwrap();
    let outer = text.find("define void @outer()").unwrap();
    let call = text.find("  call void @inner()").unwrap();
    assert!(outer < call);
    assert!(call < inner);
}

#[test]
fn failing_body_restores_cursor() {
    let mut generator = positioned();
    let entry = generator.backend().insertion_block();

    let err = generator
        .codegen_expr(&Node::procedure("p", vec![Node::call("missing")]))
        .unwrap_err();

    assert!(matches!(err, CompileError::Lookup { kind: SymbolKind::Function, .. }));
    assert_eq!(generator.backend().insertion_block(), entry);
}

#[test]
fn unpositioned_cursor_stays_unpositioned() {
    let mut generator = CodeGenerator::new(IrBackend::default());
    generator
        .codegen_expr(&Node::procedure("p", vec![Node::assign("x", Node::number(1.0))]))
        .unwrap();
    assert_eq!(generator.backend().insertion_block(), None);
}

#[test]
fn every_function_owns_an_entry_block() {
    let mut generator = CodeGenerator::with_root(
        IrBackend::default(),
        Node::Program(vec![
            Node::procedure("p", vec![Node::number(1.0)]),
            Node::procedure("q", vec![Node::number(2.0)]),
            Node::call("q"),
        ]),
    );
    generator.generate_code().unwrap();

    let blocks = &generator.tables().blocks;
    assert!(blocks.contains("run", "entry"));
    assert!(blocks.contains("p", "entry"));
    assert!(blocks.contains("q", "entry"));
    assert_eq!(blocks.len(), 3);
}

#[test]
fn body_must_be_a_procedure_body() {
    let mut generator = positioned();
    let node = Node::Procedure {
        name: "p".to_string(),
        body: Box::new(Node::number(1.0)),
    };
    assert!(matches!(generator.codegen_expr(&node), Err(CompileError::Structural { .. })));
}

#[test]
fn calls_resolve_against_the_module() {
    let mut generator = positioned();
    let generated = generator.codegen_expr(&Node::call("run")).unwrap();
    assert!(matches!(generated, Generated::Call(_)));
    assert_eq!(generator.stats().calls_emitted, 1);
}

#[test]
fn self_call_hits_interpreter_depth_limit() {
    let config = GeneratorConfig::default().with_max_call_depth(32);
    let backend = IrBackend::from_config(&config);
    let program = Node::Program(vec![
        Node::procedure("p", vec![Node::call("p")]),
        Node::call("p"),
    ]);
    let mut generator = CodeGenerator::with_config(backend, Some(program), config);
    generator.generate_code().unwrap();

    let err = generator.run_jit().unwrap_err();
    assert!(err.to_string().contains("call depth limit of 32"));
}
