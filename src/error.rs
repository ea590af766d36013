//! Error taxonomy shared by every pipeline stage.
//!
//! Each stage has its own enum; `CompileError` wraps them so callers can
//! match on the layer that failed. The first error aborts the compilation.

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Failures while scanning raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("malformed float literal at offset {offset}: expected a digit after '.'")]
    MalformedFloat { offset: usize },
}

/// Failures while assembling tokens into statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected token \"{found}\" at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("expected {expected}, but got \"{found}\" at offset {offset}")]
    Expected {
        expected: &'static str,
        found: String,
        offset: usize,
    },
    #[error("variable '{name}' already declared (offset {offset})")]
    Duplicate { name: String, offset: usize },
}

/// Failures that depend on what has been declared or on value types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("variable '{name}' not declared")]
    UndeclaredAssignment { name: String },
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("unsupported type in print: {ty}")]
    UnsupportedPrintType { ty: String },
}

/// Failures raised while lowering into the backend.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("invalid numeric literal '{text}': {reason}")]
    InvalidLiteral { text: String, reason: String },
    #[error("cannot emit initializer of '{name}'")]
    Initializer {
        name: String,
        #[source]
        source: Box<CompileError>,
    },
    #[error("backend error: {0}")]
    Backend(String),
    #[error("object emission failed: {0}")]
    Object(String),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// Short classification string used for logging.
    pub fn category(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "lexical",
            CompileError::Syntax(_) => "syntax",
            CompileError::Semantic(_) => "semantic",
            CompileError::Codegen(_) => "codegen",
        }
    }
}

impl From<inkwell::builder::BuilderError> for CompileError {
    fn from(err: inkwell::builder::BuilderError) -> Self {
        CodegenError::Backend(err.to_string()).into()
    }
}

/// Failures while turning an object file into an executable.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),
    #[error("failed to run {linker}: {source}")]
    Spawn {
        linker: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{linker} failed with {status}")]
    Failed {
        linker: String,
        status: std::process::ExitStatus,
    },
    #[error("cannot query platform SDK: {0}")]
    Sdk(String),
}
