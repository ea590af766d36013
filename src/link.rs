use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::LinkError;

/// Link `obj` against the C library into the executable `out_exe`.
pub fn link_executable(obj: &Path, out_exe: &Path) -> Result<(), LinkError> {
    let obj = utf8(obj)?;
    let out = utf8(out_exe)?;
    let (linker, args) = linker_command(obj, out)?;
    run(&linker, &args)
}

fn utf8(path: &Path) -> Result<&str, LinkError> {
    path.to_str()
        .ok_or_else(|| LinkError::NonUtf8Path(path.to_path_buf()))
}

fn run(linker: &str, args: &[String]) -> Result<(), LinkError> {
    debug!(linker, ?args, "linking");
    let status = Command::new(linker)
        .args(args)
        .status()
        .map_err(|source| LinkError::Spawn {
            linker: linker.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(LinkError::Failed {
            linker: linker.to_string(),
            status,
        });
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn linker_command(obj: &str, out: &str) -> Result<(String, Vec<String>), LinkError> {
    // a C compiler driver knows where crt1.o and libc live; bare ld does not
    let linker = ["gcc", "cc", "clang", "ld.lld"]
        .into_iter()
        .find(|candidate| which::which(candidate).is_ok())
        .unwrap_or("ld");
    let args = vec![obj.to_string(), "-o".to_string(), out.to_string(), "-lc".to_string()];
    Ok((linker.to_string(), args))
}

#[cfg(target_os = "macos")]
fn linker_command(obj: &str, out: &str) -> Result<(String, Vec<String>), LinkError> {
    let query = |program: &str, args: &[&str]| -> Result<String, LinkError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| LinkError::Sdk(format!("{program}: {e}")))?;
        String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .map_err(|e| LinkError::Sdk(format!("{program}: {e}")))
    };

    let sdk = query("xcrun", &["--sdk", "macosx", "--show-sdk-path"])?;
    let version = query("sw_vers", &["-productVersion"])?;
    let mut parts = version.split('.');
    let platform_ver = format!(
        "{}.{}",
        parts.next().unwrap_or("13"),
        parts.next().unwrap_or("0")
    );
    let arch = if cfg!(target_arch = "aarch64") { "arm64" } else { "x86_64" };

    let args = [
        "-o", out, "-arch", arch, "-platform_version", "macos", platform_ver.as_str(), platform_ver.as_str(),
        "-syslibroot", sdk.as_str(), "-e", "_main", obj, "-lSystem",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    Ok(("ld".to_string(), args))
}

#[cfg(target_os = "windows")]
fn linker_command(obj: &str, out: &str) -> Result<(String, Vec<String>), LinkError> {
    let args = vec![
        obj.to_string(),
        format!("/OUT:{out}"),
        "msvcrt.lib".to_string(),
        "legacy_stdio_definitions.lib".to_string(),
    ];
    Ok(("link.exe".to_string(), args))
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
compile_error!("Unsupported OS: varlang can only link executables on macOS, Linux, and Windows.");
