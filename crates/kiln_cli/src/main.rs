//! kiln CLI: cache-aware front end for compiler invocations.
//!
//! Provides `kiln hash` to fingerprint an invocation, `kiln restore` and
//! `kiln commit` for drivers that run the compiler themselves, `kiln run` to
//! restore-or-compile in one step, and `kiln status` to inspect an entry.

#![warn(missing_docs)]

mod commit;
mod hash;
mod logging;
mod pipeline;
mod restore;
mod run;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use kiln_cache::CacheError;

/// Exit code when the compiler itself failed.
pub const EXIT_COMPILE_FAILED: i32 = 1;

/// Exit code for unhandled errors: unreadable inputs, storage or config failures.
pub const EXIT_ERROR: i32 = 2;

/// Exit code of `kiln restore` when the invocation is not cached.
pub const EXIT_CACHE_MISS: i32 = 3;

/// kiln: content-addressable compilation cache.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Content-addressable compilation cache")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache root directory, overriding the configuration.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the cache key of an invocation.
    Hash(ManifestArgs),
    /// Show the key, partition and committed state of an invocation.
    Status(ManifestArgs),
    /// Restore cached outputs; exits with 3 on a miss.
    Restore(ManifestArgs),
    /// Store the outputs of a finished compilation.
    Commit(CommitArgs),
    /// Restore from the cache, or run the compiler and cache its outputs.
    Run(RunArgs),
}

/// Arguments naming an invocation manifest.
#[derive(Parser, Debug)]
pub struct ManifestArgs {
    /// Invocation manifest (JSON).
    pub manifest: PathBuf,
}

/// Arguments for the `kiln commit` subcommand.
#[derive(Parser, Debug)]
pub struct CommitArgs {
    /// Invocation manifest (JSON).
    pub manifest: PathBuf,

    /// Commit under this key instead of recomputing it.
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for the `kiln run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Invocation manifest (JSON).
    pub manifest: PathBuf,

    /// Compiler command to run on a miss. Defaults to the manifest's
    /// `command_line`.
    #[arg(last = true)]
    pub compiler: Vec<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Verbosity count.
    pub verbose: u8,
    /// Optional path to a configuration file.
    pub config: Option<PathBuf>,
    /// Optional cache root override.
    pub cache_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        cache_dir: cli.cache_dir,
    };

    let settings = pipeline::load_settings(&global);
    let configured_level = settings
        .as_ref()
        .map(|s| s.log_level)
        .unwrap_or_default();
    logging::init_logging(global.verbose, global.quiet, configured_level);

    let result = settings.and_then(|settings| match cli.command {
        Command::Hash(ref args) => hash::run(args, &global, &settings),
        Command::Status(ref args) => hash::status(args, &global, &settings),
        Command::Restore(ref args) => restore::run(args, &global, &settings),
        Command::Commit(ref args) => commit::run(args, &global, &settings),
        Command::Run(ref args) => run::run(args, &global, &settings),
    });

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {}", describe_error(e.as_ref()));
            process::exit(EXIT_ERROR);
        }
    }
}

/// Renders an error, naming whether fingerprinting or storage failed.
fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    match err.downcast_ref::<CacheError>() {
        Some(e) if e.is_fatal_input() => format!("cannot fingerprint inputs: {e}"),
        Some(e) => format!("cache storage failed: {e}"),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_hash() {
        let cli = Cli::parse_from(["kiln", "hash", "invocation.json"]);
        match cli.command {
            Command::Hash(ref args) => {
                assert_eq!(args.manifest, PathBuf::from("invocation.json"));
            }
            _ => panic!("expected Hash command"),
        }
    }

    #[test]
    fn parse_commit_with_key() {
        let cli = Cli::parse_from([
            "kiln",
            "commit",
            "invocation.json",
            "--key",
            "0102030405060708090a0b0c0d0e0f10",
        ]);
        match cli.command {
            Command::Commit(ref args) => {
                assert_eq!(
                    args.key.as_deref(),
                    Some("0102030405060708090a0b0c0d0e0f10")
                );
            }
            _ => panic!("expected Commit command"),
        }
    }

    #[test]
    fn parse_run_with_compiler() {
        let cli = Cli::parse_from([
            "kiln",
            "run",
            "invocation.json",
            "--",
            "csc",
            "/out:app.dll",
            "Program.cs",
        ]);
        match cli.command {
            Command::Run(ref args) => {
                assert_eq!(args.compiler, vec!["csc", "/out:app.dll", "Program.cs"]);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_run_without_compiler() {
        let cli = Cli::parse_from(["kiln", "run", "invocation.json"]);
        match cli.command {
            Command::Run(ref args) => assert!(args.compiler.is_empty()),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "kiln",
            "-vv",
            "--cache-dir",
            "/tmp/kiln",
            "restore",
            "invocation.json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/kiln")));
    }

    #[test]
    fn parse_quiet_after_subcommand() {
        let cli = Cli::parse_from(["kiln", "status", "invocation.json", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn describe_input_error() {
        let err: Box<dyn std::error::Error> = Box::new(CacheError::UnsupportedInput {
            input: "SourceFiles".to_string(),
            shape: "number 1".to_string(),
        });
        assert!(describe_error(err.as_ref()).starts_with("cannot fingerprint inputs:"));
    }

    #[test]
    fn describe_other_error() {
        let err: Box<dyn std::error::Error> = "no compiler command".into();
        assert_eq!(describe_error(err.as_ref()), "no compiler command");
    }
}
