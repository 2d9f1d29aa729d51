//! `kiln run`: restore from the cache or compile and commit.
//!
//! The full cache-aware compile:
//! 1. Fingerprint the invocation
//! 2. Restore outputs on a hit and stop
//! 3. Otherwise run the compiler
//! 4. Commit the outputs if the compiler succeeded

use std::process::Command;

use kiln_cache::CompilationCache;
use kiln_config::CacheSettings;

use crate::pipeline::{invocation_key, load_invocation, open_cache};
use crate::{GlobalArgs, RunArgs, EXIT_COMPILE_FAILED};

/// Runs `kiln run`. Returns 0 when outputs are in place, 1 if the compiler failed.
pub fn run(
    args: &RunArgs,
    global: &GlobalArgs,
    settings: &CacheSettings,
) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = load_invocation(&args.manifest)?;
    let compiler = if args.compiler.is_empty() {
        &invocation.command_line
    } else {
        &args.compiler
    };
    let (program, program_args) = compiler
        .split_first()
        .ok_or("no compiler command given and the invocation has an empty command_line")?;

    let cache = open_cache(settings);
    let key = invocation_key(&cache, &invocation)?;
    let outputs = &invocation.arguments.outputs;

    if cache.try_emit(key, outputs)?.is_some() {
        if !global.quiet {
            eprintln!("   Restored {key}");
        }
        return Ok(0);
    }

    if !global.quiet {
        eprintln!(" Compiling {key}");
    }
    log::info!("running {}", compiler.join(" "));
    let mut command = Command::new(program);
    command.args(program_args);
    // Relative paths in the command line mean what they meant when hashing.
    if let Some(base) = &invocation.arguments.base_directory {
        command.current_dir(base);
    }
    let status = command
        .status()
        .map_err(|e| format!("failed to start compiler '{program}': {e}"))?;

    if !status.success() {
        log::warn!("compiler exited with {status}; nothing cached");
        return Ok(EXIT_COMPILE_FAILED);
    }

    // Diagnostics are not captured from the child process.
    cache.cache(key, outputs, &[])?;
    if !global.quiet {
        eprintln!("    Cached {key}");
    }
    Ok(0)
}
