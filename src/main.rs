//! Command-line driver: picks the input, runs the pipeline, writes the output.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use inkwell::{context::Context as LlvmContext, targets::TargetTriple};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use varlang::{
    codegen::{host_triple, write_object},
    config::{self, CompileOptions, Emit, InputSource},
    link::link_executable,
    CompileError,
};

#[derive(Debug, Parser)]
#[command(name = "varlang", version, about = "Compile varlang source to LLVM IR or native code")]
struct Cli {
    /// Source file; standard input is read when neither FILE nor --eval is given
    file: Option<PathBuf>,

    /// Compile this source string instead of a file
    #[arg(short = 'e', long = "eval", value_name = "CODE", conflicts_with = "file")]
    eval: Option<String>,

    #[arg(long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Output path (IR goes to stdout when omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Target triple for object and executable output
    #[arg(long, value_name = "TRIPLE")]
    target: Option<String>,

    #[arg(long, default_value = "varlang")]
    module_name: String,
}

fn report(err: CompileError) -> anyhow::Error {
    error!(category = err.category(), %err, "compilation failed");
    err.into()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let input = InputSource::resolve(cli.eval.clone(), cli.file.clone());
    info!(source = %input, emit = ?cli.emit, "compiling");
    let src = input.read().with_context(|| format!("reading {input}"))?;

    let options = CompileOptions::default().with_module_name(&cli.module_name);
    let program = varlang::parse_source(&src).map_err(report)?;
    if program.stmts.is_empty() {
        bail!("no statements found in {input}");
    }

    let ctx = LlvmContext::create();
    let module = varlang::compile_program(&ctx, &program, &options).map_err(report)?;
    let triple = cli
        .target
        .as_deref()
        .map(TargetTriple::create)
        .unwrap_or_else(host_triple);

    match cli.emit {
        Emit::Ir => {
            let ir = module.print_to_string().to_string();
            match &cli.output {
                Some(path) => fs::write(path, ir).with_context(|| format!("writing {}", path.display()))?,
                None => print!("{ir}"),
            }
        }
        Emit::Obj => {
            let out = cli
                .output
                .unwrap_or_else(|| PathBuf::from(format!("{}.o", options.module_name)));
            write_object(&module, &triple, &out).map_err(report)?;
            info!(path = %out.display(), "wrote object file");
        }
        Emit::Exe => {
            let Some(out_exe) = cli.output else {
                bail!("--emit exe needs an output path (-o <PATH>)");
            };
            let obj = out_exe.with_extension("o");
            write_object(&module, &triple, &obj).map_err(report)?;
            link_executable(&obj, &out_exe)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perm = fs::metadata(&out_exe)?.permissions();
                perm.set_mode(0o755);
                fs::set_permissions(&out_exe, perm)?;
            }

            println!("Built {}", out_exe.display());
        }
    }
    Ok(())
}
