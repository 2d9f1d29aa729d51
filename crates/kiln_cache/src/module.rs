//! Hash-stable identity of the loaded extension modules.
//!
//! A module is identified by its fully-qualified type name and the content of
//! the binary it was loaded from, so rebuilding a plugin invalidates every
//! key that used it even when its type names are unchanged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::hasher::GenericHasher;

/// Input label used in errors for unreadable module binaries.
const MODULE_INPUT: &str = "CompilationModules";

/// An instantiated compiler plugin taking part in a compilation.
pub trait ExtensionModule {
    /// Fully-qualified name of the module's type.
    fn type_name(&self) -> &str;

    /// Path of the binary the module's type was loaded from.
    fn binary_path(&self) -> &Path;
}

impl<T: ExtensionModule + ?Sized> ExtensionModule for &T {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn binary_path(&self) -> &Path {
        (**self).binary_path()
    }
}

impl<T: ExtensionModule + ?Sized> ExtensionModule for Box<T> {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn binary_path(&self) -> &Path {
        (**self).binary_path()
    }
}

/// A plain description of a loaded module, as supplied by the compile driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedModule {
    /// Fully-qualified type name.
    pub type_name: String,
    /// Owning binary.
    pub binary: PathBuf,
}

impl LoadedModule {
    /// Creates a module description.
    pub fn new(type_name: impl Into<String>, binary: impl Into<PathBuf>) -> Self {
        Self {
            type_name: type_name.into(),
            binary: binary.into(),
        }
    }
}

impl ExtensionModule for LoadedModule {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn binary_path(&self) -> &Path {
        &self.binary
    }
}

/// Combined identity of a set of extension modules.
#[derive(Debug, Clone)]
pub struct ModuleIdentity {
    /// Distinct `(type name, binary)` pairs in sorted order.
    pub types: Vec<(String, PathBuf)>,
    /// Content digest of every distinct owning binary.
    pub binaries: BTreeMap<PathBuf, ContentHash>,
    /// The folded identity of all modules.
    pub digest: ContentHash,
}

impl ModuleIdentity {
    /// Computes the identity of `modules`.
    ///
    /// Duplicate types collapse and the remainder is sorted, so the result
    /// does not depend on load order. Each binary is read once no matter how
    /// many module types it provides.
    pub fn compute<M: ExtensionModule>(modules: &[M]) -> Result<Self, CacheError> {
        let mut types: Vec<(String, PathBuf)> = modules
            .iter()
            .map(|m| (m.type_name().to_string(), m.binary_path().to_path_buf()))
            .collect();
        types.sort();
        types.dedup();

        let mut binaries = BTreeMap::new();
        for (_, binary) in &types {
            if binaries.contains_key(binary) {
                continue;
            }
            let digest =
                GenericHasher::hash_file(binary).map_err(|e| CacheError::MissingInput {
                    input: MODULE_INPUT.to_string(),
                    path: binary.clone(),
                    source: e,
                })?;
            log::debug!("module binary {} -> {digest}", binary.display());
            binaries.insert(binary.clone(), digest);
        }

        let per_module: Vec<ContentHash> = types
            .iter()
            .map(|(name, binary)| {
                GenericHasher::combine(&[GenericHasher::hash_str(name), binaries[binary]])
            })
            .collect();

        Ok(Self {
            digest: GenericHasher::combine(&per_module),
            types,
            binaries,
        })
    }
}
