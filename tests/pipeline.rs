use anyhow::Result;
use inkwell::context::Context;
use varlang::{compile, compile_to_ir, parse_source, CompileOptions, Node, TypeTag};

const REFERENCE: &str = "var int x = 5; var float y = 10.5; x = 3; print(x); print(y);";

#[test]
fn reference_program_compiles_to_valid_module() -> Result<()> {
    let ctx = Context::create();
    let module = compile(&ctx, REFERENCE, &CompileOptions::default())?;
    module
        .verify()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let main = module.get_function("main").expect("main is defined");
    assert_eq!(main.count_basic_blocks(), 1);
    assert!(main.get_type().get_return_type().is_none());
    assert!(module.get_function("printf").is_some());
    Ok(())
}

#[test]
fn reference_program_ir_shape() -> Result<()> {
    let ir = compile_to_ir(REFERENCE, &CompileOptions::default())?;

    assert_eq!(ir.matches("%x = alloca i32").count(), 1, "{ir}");
    assert_eq!(ir.matches("%y = alloca float").count(), 1, "{ir}");
    assert!(ir.contains("store i32 5, i32* %x"), "{ir}");
    assert!(ir.contains("store i32 3, i32* %x"), "{ir}");
    assert!(ir.contains("store float 1.050000e+01, float* %y"), "{ir}");

    // first print is an integer, second a widened float
    let calls: Vec<&str> = ir.lines().filter(|l| l.contains("call i32")).collect();
    assert_eq!(calls.len(), 2, "{ir}");
    assert!(calls[0].contains("@.str_int") && calls[0].contains(", i32 %"), "{ir}");
    assert!(calls[1].contains("@.str_float") && calls[1].contains(", double %fpext"), "{ir}");
    assert!(ir.contains("ret void"), "{ir}");
    Ok(())
}

#[test]
fn module_name_comes_from_options() -> Result<()> {
    let ir = compile_to_ir("print(1);", &CompileOptions::default().with_module_name("demo"))?;
    assert!(ir.contains("ModuleID = 'demo'"), "{ir}");
    Ok(())
}

#[test]
fn repeated_compilation_is_byte_identical() -> Result<()> {
    let first = compile_to_ir(REFERENCE, &CompileOptions::default())?;
    let second = compile_to_ir(REFERENCE, &CompileOptions::default())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn compilations_do_not_share_variables() -> Result<()> {
    compile_to_ir("var int shared = 1;", &CompileOptions::default())?;
    let err = compile_to_ir("print(shared);", &CompileOptions::default()).unwrap_err();
    assert_eq!(err.category(), "semantic");
    Ok(())
}

#[test]
fn literal_types_follow_spelling() -> Result<()> {
    let program = parse_source("print(5); print(10.5);")?;
    let types: Vec<TypeTag> = program
        .stmts
        .iter()
        .map(|stmt| match stmt {
            Node::Print { expr } => match expr.as_ref() {
                Node::NumberLiteral { inferred_type, .. } => *inferred_type,
                other => panic!("unexpected print argument {other:?}"),
            },
            other => panic!("unexpected statement {other:?}"),
        })
        .collect();
    assert_eq!(types, vec![TypeTag::Int32, TypeTag::Float32]);
    Ok(())
}

#[test]
fn whitespace_and_newlines_are_insignificant() -> Result<()> {
    let spread = "var int x\n  = 5 ;\n\nprint ( x ) ;\n";
    let packed = "var int x=5;print(x);";
    assert_eq!(
        compile_to_ir(spread, &CompileOptions::default())?,
        compile_to_ir(packed, &CompileOptions::default())?
    );
    Ok(())
}
