//! Content-addressable compilation cache.
//!
//! Fingerprints every input that determines a compiler invocation's output
//! (source files, references, resources, key material, extension modules)
//! into a [`HashKey`], and maps keys to on-disk partitions of cached
//! artifacts that can be restored instead of recompiling.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod hasher;
pub mod inputs;
pub mod key;
pub mod module;
pub mod store;
pub mod trace;

pub use cache::{BuildCache, CompilationCache, Diagnostic, Severity};
pub use error::CacheError;
pub use fingerprint::FingerprintCalculator;
pub use hasher::GenericHasher;
pub use inputs::{CompilerArguments, InputCategory, InputValue, OutputPaths};
pub use key::HashKey;
pub use module::{ExtensionModule, LoadedModule, ModuleIdentity};
pub use store::ArtifactStore;
