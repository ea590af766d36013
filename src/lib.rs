//! Crate root: wires together the compilation pipeline.
//!
//! - `lexer` scans source text one token at a time.
//! - `parser` builds the statement list and rejects duplicate declarations.
//! - `codegen` lowers statements into a single LLVM `main` via Inkwell.
//! - `link` turns an emitted object file into an executable.
//! - `error` holds the error taxonomy shared by every stage.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod error;
pub mod lexer;
pub mod link;
pub mod parser;
pub mod token;

use inkwell::context::Context;
use inkwell::module::Module;
use tracing::debug;

pub use ast::{Node, Program, TypeTag};
pub use codegen::Codegen;
pub use config::CompileOptions;
pub use error::{CompileError, CompileResult};

/// Parse a complete program. Nothing is lowered until parsing succeeds.
pub fn parse_source(src: &str) -> CompileResult<Program> {
    parser::parse(src)
}

/// Lower an already parsed program into a fresh module owned by `ctx`.
pub fn compile_program<'ctx>(
    ctx: &'ctx Context,
    program: &Program,
    options: &CompileOptions,
) -> CompileResult<Module<'ctx>> {
    let mut cg = Codegen::new(ctx, options);
    cg.emit_program(program)?;
    debug!(stmts = program.stmts.len(), "lowered program");
    cg.finish()
}

/// Parse and lower `src`.
pub fn compile<'ctx>(
    ctx: &'ctx Context,
    src: &str,
    options: &CompileOptions,
) -> CompileResult<Module<'ctx>> {
    let program = parse_source(src)?;
    compile_program(ctx, &program, options)
}

/// Compile `src` and return the module's textual IR.
pub fn compile_to_ir(src: &str, options: &CompileOptions) -> CompileResult<String> {
    let ctx = Context::create();
    let module = compile(&ctx, src, options)?;
    let ir = module.print_to_string().to_string();
    Ok(ir)
}
