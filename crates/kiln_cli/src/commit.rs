//! `kiln commit`: store freshly compiled outputs.

use kiln_cache::{CompilationCache, HashKey};
use kiln_config::CacheSettings;

use crate::pipeline::{invocation_key, load_invocation, open_cache};
use crate::{CommitArgs, GlobalArgs};

/// Runs `kiln commit`.
///
/// Recomputes the key from the manifest unless `--key` names one from an
/// earlier `kiln hash`, which keeps the key stable if inputs were touched
/// by the compilation itself.
pub fn run(
    args: &CommitArgs,
    global: &GlobalArgs,
    settings: &CacheSettings,
) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = load_invocation(&args.manifest)?;
    let cache = open_cache(settings);
    let key = match &args.key {
        Some(key) => key.parse::<HashKey>()?,
        None => invocation_key(&cache, &invocation)?,
    };

    cache.cache(key, &invocation.arguments.outputs, &[])?;
    if !global.quiet {
        eprintln!("    Cached {key}");
    }
    Ok(0)
}
