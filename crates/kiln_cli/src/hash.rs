//! `kiln hash` and `kiln status`: report the key of an invocation.

use kiln_config::CacheSettings;

use crate::pipeline::{invocation_key, load_invocation, open_cache};
use crate::{GlobalArgs, ManifestArgs};

/// Runs `kiln hash`: prints the invocation's key on stdout.
pub fn run(
    args: &ManifestArgs,
    _global: &GlobalArgs,
    settings: &CacheSettings,
) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = load_invocation(&args.manifest)?;
    let cache = open_cache(settings);
    let key = invocation_key(&cache, &invocation)?;
    println!("{key}");
    Ok(0)
}

/// Runs `kiln status`: prints the key, partition and committed state.
pub fn status(
    args: &ManifestArgs,
    _global: &GlobalArgs,
    settings: &CacheSettings,
) -> Result<i32, Box<dyn std::error::Error>> {
    let invocation = load_invocation(&args.manifest)?;
    let cache = open_cache(settings);
    let key = invocation_key(&cache, &invocation)?;
    let store = cache.store();
    println!("key:       {key}");
    println!("partition: {}", store.partition_path(key).display());
    println!(
        "state:     {}",
        if store.is_committed(key) {
            "committed"
        } else {
            "not cached"
        }
    );
    Ok(0)
}

