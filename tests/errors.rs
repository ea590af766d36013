use varlang::error::{LexError, SemanticError, SyntaxError};
use varlang::{compile_to_ir, CompileError, CompileOptions};

fn compile_err(src: &str) -> CompileError {
    compile_to_ir(src, &CompileOptions::default()).expect_err("compilation should fail")
}

#[test]
fn print_of_undeclared_variable() {
    let err = compile_err("print(z);");
    assert!(matches!(
        &err,
        CompileError::Semantic(SemanticError::UnknownVariable { name }) if name == "z"
    ));
    assert_eq!(err.to_string(), "unknown variable 'z'");
}

#[test]
fn duplicate_declaration_fails_before_codegen() {
    // the undeclared print would be a semantic error if codegen had started
    let err = compile_err("print(q); var int x = 5; var int x = 6;");
    assert!(matches!(
        &err,
        CompileError::Syntax(SyntaxError::Duplicate { name, .. }) if name == "x"
    ));
}

#[test]
fn assignment_before_declaration() {
    let err = compile_err("x = 3; var int x = 5;");
    assert!(matches!(
        err,
        CompileError::Semantic(SemanticError::UndeclaredAssignment { .. })
    ));
}

#[test]
fn first_error_wins() {
    let err = compile_err("var int a = 1; print(b); print(c);");
    assert!(matches!(
        &err,
        CompileError::Semantic(SemanticError::UnknownVariable { name }) if name == "b"
    ));
}

#[test]
fn lexical_errors() {
    assert!(matches!(
        compile_err("var float f = 3.;"),
        CompileError::Lex(LexError::MalformedFloat { .. })
    ));
    assert!(matches!(
        compile_err("var int x = 5; x = 3 # 4;"),
        CompileError::Lex(LexError::UnexpectedChar { ch: '#', .. })
    ));
}

#[test]
fn arithmetic_is_tokenized_but_not_parsed() {
    let err = compile_err("var int x = 5; x = 2 * 3;");
    assert!(matches!(
        err,
        CompileError::Syntax(SyntaxError::Expected { ref found, .. }) if found == "*"
    ));
}

#[test]
fn categories() {
    assert_eq!(compile_err("$").category(), "lexical");
    assert_eq!(compile_err("print;").category(), "syntax");
    assert_eq!(compile_err("print(nope);").category(), "semantic");
    assert_eq!(compile_err("var int big = 4294967296;").category(), "codegen");
}
