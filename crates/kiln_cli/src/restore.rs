//! `kiln restore`: copy cached outputs into place.

use kiln_cache::CompilationCache;
use kiln_config::CacheSettings;

use crate::pipeline::{invocation_key, load_invocation, open_cache};
use crate::{GlobalArgs, ManifestArgs, EXIT_CACHE_MISS};

/// Runs `kiln restore`. Returns 0 on a hit and [`EXIT_CACHE_MISS`] on a miss.
pub fn run(
    args: &ManifestArgs,
    global: &GlobalArgs,
    settings: &CacheSettings,
) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = load_invocation(&args.manifest)?;
    let cache = open_cache(settings);
    let key = invocation_key(&cache, &invocation)?;

    match cache.try_emit(key, &invocation.arguments.outputs)? {
        Some(_) => {
            if !global.quiet {
                eprintln!("   Restored {key}");
            }
            Ok(0)
        }
        None => {
            if !global.quiet {
                eprintln!("   Not cached {key}");
            }
            Ok(EXIT_CACHE_MISS)
        }
    }
}
