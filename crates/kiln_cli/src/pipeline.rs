//! Shared helpers for CLI commands: settings resolution, invocation manifest
//! loading, and opening the cache.

use std::path::{Path, PathBuf};

use kiln_cache::{
    BuildCache, CompilationCache, CompilerArguments, ExtensionModule, HashKey, LoadedModule,
};
use kiln_config::{CacheSettings, KilnConfig};
use serde::Deserialize;

use crate::GlobalArgs;

/// One compiler invocation as described by the compile driver.
///
/// Relative input paths, output paths and module binaries resolve against
/// the manifest's directory unless `arguments.base_directory` says
/// otherwise. The compiler is started in that same directory.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Invocation {
    /// Raw compiler command line. Recorded in the trace, not hashed.
    pub command_line: Vec<String>,
    /// Structured compiler arguments.
    pub arguments: CompilerArguments,
    /// Extension modules loaded for this compilation.
    pub modules: Vec<LoadedModule>,
}

/// Resolves cache settings from `--config`, a discovered `kiln.toml`, or
/// defaults, then applies `--cache-dir`.
pub fn load_settings(global: &GlobalArgs) -> Result<CacheSettings, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config_path = match &global.config {
        Some(path) => Some(path.clone()),
        None => kiln_config::find_config(&cwd),
    };

    let (config, config_dir) = match config_path {
        Some(path) => {
            let config = kiln_config::load_config_file(&path)?;
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.clone());
            (config, dir)
        }
        None => (KilnConfig::default(), cwd),
    };

    Ok(kiln_config::resolve_settings(
        &config,
        &config_dir,
        global.cache_dir.as_deref(),
    ))
}

/// Reads and parses an invocation manifest.
pub fn load_invocation(path: &Path) -> Result<Invocation, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read invocation {}: {e}", path.display()))?;
    let mut invocation: Invocation = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse invocation {}: {e}", path.display()))?;

    let manifest_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    if invocation.arguments.base_directory.is_none() {
        invocation.arguments.base_directory = Some(manifest_dir.clone());
    }
    invocation.arguments.outputs = invocation.arguments.resolved_outputs();
    for module in &mut invocation.modules {
        if module.binary.is_relative() {
            module.binary = manifest_dir.join(&module.binary);
        }
    }
    Ok(invocation)
}

/// Opens the cache described by `settings`.
pub fn open_cache(settings: &CacheSettings) -> BuildCache {
    log::debug!("cache root {}", settings.cache_root.display());
    BuildCache::new(&settings.cache_root).with_trace(settings.trace)
}

/// Computes the key of `invocation`.
pub fn invocation_key(
    cache: &BuildCache,
    invocation: &Invocation,
) -> Result<HashKey, kiln_cache::CacheError> {
    let modules: Vec<&dyn ExtensionModule> = invocation
        .modules
        .iter()
        .map(|m| m as &dyn ExtensionModule)
        .collect();
    cache.calculate_hash(&invocation.command_line, &invocation.arguments, &modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_cache::InputValue;

    #[test]
    fn load_invocation_defaults_base_to_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("invocation.json");
        std::fs::write(
            &manifest,
            r#"{
                "command_line": ["csc", "Program.cs"],
                "arguments": {
                    "source_files": ["Program.cs"],
                    "outputs": {"output": "bin/app.dll", "pdb": "/abs/app.pdb"}
                },
                "modules": [{"type_name": "Aspects.Logging", "binary": "plugins/Aspects.dll"}]
            }"#,
        )
        .unwrap();

        let invocation = load_invocation(&manifest).unwrap();
        assert_eq!(invocation.command_line, vec!["csc", "Program.cs"]);
        assert_eq!(
            invocation.arguments.base_directory.as_deref(),
            Some(dir.path())
        );
        assert_eq!(
            invocation.arguments.source_files,
            InputValue::paths(["Program.cs"])
        );
        assert_eq!(
            invocation.modules[0].binary,
            dir.path().join("plugins/Aspects.dll")
        );
        assert_eq!(
            invocation.arguments.outputs.output,
            Some(dir.path().join("bin/app.dll"))
        );
        assert_eq!(
            invocation.arguments.outputs.pdb,
            Some(PathBuf::from("/abs/app.pdb"))
        );
    }

    #[test]
    fn load_invocation_keeps_explicit_base() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("invocation.json");
        std::fs::write(
            &manifest,
            r#"{"arguments": {"base_directory": "/work/app"}}"#,
        )
        .unwrap();
        let invocation = load_invocation(&manifest).unwrap();
        assert_eq!(
            invocation.arguments.base_directory,
            Some(PathBuf::from("/work/app"))
        );
        assert!(invocation.modules.is_empty());
    }

    #[test]
    fn load_invocation_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("invocation.json");
        std::fs::write(&manifest, "{ not json").unwrap();
        let err = load_invocation(&manifest).unwrap_err();
        assert!(err.to_string().contains("failed to parse invocation"));
    }

    #[test]
    fn load_settings_honors_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("kiln.toml");
        std::fs::write(&config, "[cache]\nroot = \"store\"\ntrace = false\n").unwrap();

        let global = GlobalArgs {
            quiet: true,
            verbose: 0,
            config: Some(config),
            cache_dir: None,
        };
        let settings = load_settings(&global).unwrap();
        assert_eq!(settings.cache_root, dir.path().join("store"));
        assert!(!settings.trace);

        let global = GlobalArgs {
            cache_dir: Some(dir.path().join("elsewhere")),
            ..global
        };
        let settings = load_settings(&global).unwrap();
        assert_eq!(settings.cache_root, dir.path().join("elsewhere"));
    }
}
