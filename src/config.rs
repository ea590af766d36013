//! Compile options and driver-side input/log resolution.

use std::{env, fmt, fs, io::Read, path::PathBuf};

pub const LOG_FILTER_ENV: &str = "VARLANG_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Everything the library needs to know besides the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub module_name: String,
    pub entry_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            module_name: "varlang".to_string(),
            entry_name: "main".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }
}

/// What the driver writes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Emit {
    /// Textual LLVM IR
    Ir,
    /// Native object file
    Obj,
    /// Linked executable
    Exe,
}

/// Where the program text comes from, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl InputSource {
    pub fn resolve(inline: Option<String>, file: Option<PathBuf>) -> Self {
        match (inline, file) {
            (Some(code), _) => InputSource::Inline(code),
            (None, Some(path)) => InputSource::File(path),
            (None, None) => InputSource::Stdin,
        }
    }

    pub fn read(&self) -> std::io::Result<String> {
        match self {
            InputSource::Inline(code) => Ok(code.clone()),
            InputSource::File(path) => fs::read_to_string(path),
            InputSource::Stdin => {
                let mut src = String::new();
                std::io::stdin().read_to_string(&mut src)?;
                Ok(src)
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Inline(_) => write!(f, "<inline>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
            InputSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Log filter directives taken from `VARLANG_LOG`, or `warn`.
pub fn log_filter() -> String {
    filter_or_default(env::var(LOG_FILTER_ENV).ok())
}

fn filter_or_default(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}
