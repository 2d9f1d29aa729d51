//! Compiler inputs that determine an invocation's output.
//!
//! Every input relevant to output correctness lives in one of a closed set of
//! [`InputCategory`] buckets. Each bucket holds an [`InputValue`], a closed
//! sum type with one variant per recognized shape, so resolving a value to
//! its files is an exhaustive match rather than a runtime type probe.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One named bucket of compilation inputs.
///
/// The declaration order is the order in which categories are folded into
/// the fingerprint; reordering the variants changes every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputCategory {
    /// Non-source files handed to analyzers.
    AdditionalFiles,
    /// Analyzer assemblies.
    AnalyzerReferences,
    /// Strong-name key container.
    CryptoKeyContainer,
    /// Strong-name key file.
    CryptoKeyFile,
    /// Embedded or linked manifest resources.
    ManifestResources,
    /// Referenced assemblies.
    MetadataReferences,
    /// Source files, in compilation order.
    SourceFiles,
    /// Platform icon resource.
    Win32Icon,
    /// Platform manifest resource.
    Win32Manifest,
    /// Platform resource file.
    Win32ResourceFile,
}

impl InputCategory {
    /// All categories in fingerprint order.
    pub const ALL: [InputCategory; 10] = [
        InputCategory::AdditionalFiles,
        InputCategory::AnalyzerReferences,
        InputCategory::CryptoKeyContainer,
        InputCategory::CryptoKeyFile,
        InputCategory::ManifestResources,
        InputCategory::MetadataReferences,
        InputCategory::SourceFiles,
        InputCategory::Win32Icon,
        InputCategory::Win32Manifest,
        InputCategory::Win32ResourceFile,
    ];

    /// Stable display name, used in traces and error messages.
    pub fn name(self) -> &'static str {
        match self {
            InputCategory::AdditionalFiles => "AdditionalFiles",
            InputCategory::AnalyzerReferences => "AnalyzerReferences",
            InputCategory::CryptoKeyContainer => "CryptoKeyContainer",
            InputCategory::CryptoKeyFile => "CryptoKeyFile",
            InputCategory::ManifestResources => "ManifestResources",
            InputCategory::MetadataReferences => "MetadataReferences",
            InputCategory::SourceFiles => "SourceFiles",
            InputCategory::Win32Icon => "Win32Icon",
            InputCategory::Win32Manifest => "Win32Manifest",
            InputCategory::Win32ResourceFile => "Win32ResourceFile",
        }
    }
}

impl fmt::Display for InputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value held by one input category.
///
/// Deserialized untagged from the invocation manifest: `null` is
/// [`Absent`](InputValue::Absent), a string is a [`Path`](InputValue::Path),
/// an array is a [`List`](InputValue::List), and objects are matched by
/// their distinguishing field. Anything else lands in
/// [`Unrecognized`](InputValue::Unrecognized) and is rejected when the
/// fingerprint is computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// No value.
    #[default]
    Absent,
    /// A single file path.
    Path(PathBuf),
    /// An ordered, possibly heterogeneous collection.
    List(Vec<InputValue>),
    /// A source file given on the command line.
    SourceFile {
        /// Path of the source file.
        source: PathBuf,
        /// Whether the file is compiled as a script.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_script: bool,
    },
    /// An analyzer assembly reference.
    AnalyzerReference {
        /// Path of the analyzer assembly.
        analyzer: PathBuf,
    },
    /// A manifest resource descriptor.
    Resource {
        /// Logical resource name.
        resource: String,
        /// Backing file; `None` for resources supplied from memory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<PathBuf>,
        /// Whether the resource is publicly visible.
        #[serde(default = "default_public")]
        public: bool,
    },
    /// A metadata (assembly) reference.
    MetadataReference {
        /// Path of the referenced assembly.
        reference: PathBuf,
        /// Extern aliases applied to the reference.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        aliases: Vec<String>,
        /// Whether interop types are embedded.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        embed_interop_types: bool,
    },
    /// A value of a shape with no known resolution to files.
    Unrecognized(serde_json::Value),
}

fn default_public() -> bool {
    true
}

impl InputValue {
    /// A single file path.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        InputValue::Path(path.into())
    }

    /// An ordered list of plain file paths.
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        InputValue::List(paths.into_iter().map(Self::path).collect())
    }

    /// An ordered list of non-script source files.
    pub fn source_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        InputValue::List(
            paths
                .into_iter()
                .map(|p| InputValue::SourceFile {
                    source: p.into(),
                    is_script: false,
                })
                .collect(),
        )
    }

    /// Short description of the value's shape for error messages.
    pub fn shape(&self) -> String {
        match self {
            InputValue::Absent => "absent".to_string(),
            InputValue::Path(_) => "path".to_string(),
            InputValue::List(items) => format!("list of {}", items.len()),
            InputValue::SourceFile { .. } => "source file".to_string(),
            InputValue::AnalyzerReference { .. } => "analyzer reference".to_string(),
            InputValue::Resource { .. } => "resource".to_string(),
            InputValue::MetadataReference { .. } => "metadata reference".to_string(),
            InputValue::Unrecognized(value) => describe_json(value),
        }
    }
}

fn describe_json(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with fields [{}]", keys.join(", "))
        }
    }
}

/// Structured arguments of one compiler invocation.
///
/// Exposes one field per [`InputCategory`] plus the output paths that the
/// cache restores into or commits from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerArguments {
    /// Directory that relative input paths are resolved against. When unset
    /// they resolve against the process working directory.
    pub base_directory: Option<PathBuf>,
    /// See [`InputCategory::AdditionalFiles`].
    pub additional_files: InputValue,
    /// See [`InputCategory::AnalyzerReferences`].
    pub analyzer_references: InputValue,
    /// See [`InputCategory::CryptoKeyContainer`].
    pub crypto_key_container: InputValue,
    /// See [`InputCategory::CryptoKeyFile`].
    pub crypto_key_file: InputValue,
    /// See [`InputCategory::ManifestResources`].
    pub manifest_resources: InputValue,
    /// See [`InputCategory::MetadataReferences`].
    pub metadata_references: InputValue,
    /// See [`InputCategory::SourceFiles`].
    pub source_files: InputValue,
    /// See [`InputCategory::Win32Icon`].
    pub win32_icon: InputValue,
    /// See [`InputCategory::Win32Manifest`].
    pub win32_manifest: InputValue,
    /// See [`InputCategory::Win32ResourceFile`].
    pub win32_resource_file: InputValue,
    /// Output artifact paths.
    pub outputs: OutputPaths,
}

impl CompilerArguments {
    /// Returns the value held by `category`.
    pub fn input(&self, category: InputCategory) -> &InputValue {
        match category {
            InputCategory::AdditionalFiles => &self.additional_files,
            InputCategory::AnalyzerReferences => &self.analyzer_references,
            InputCategory::CryptoKeyContainer => &self.crypto_key_container,
            InputCategory::CryptoKeyFile => &self.crypto_key_file,
            InputCategory::ManifestResources => &self.manifest_resources,
            InputCategory::MetadataReferences => &self.metadata_references,
            InputCategory::SourceFiles => &self.source_files,
            InputCategory::Win32Icon => &self.win32_icon,
            InputCategory::Win32Manifest => &self.win32_manifest,
            InputCategory::Win32ResourceFile => &self.win32_resource_file,
        }
    }

    /// Replaces the value held by `category`.
    pub fn set_input(&mut self, category: InputCategory, value: InputValue) {
        let slot = match category {
            InputCategory::AdditionalFiles => &mut self.additional_files,
            InputCategory::AnalyzerReferences => &mut self.analyzer_references,
            InputCategory::CryptoKeyContainer => &mut self.crypto_key_container,
            InputCategory::CryptoKeyFile => &mut self.crypto_key_file,
            InputCategory::ManifestResources => &mut self.manifest_resources,
            InputCategory::MetadataReferences => &mut self.metadata_references,
            InputCategory::SourceFiles => &mut self.source_files,
            InputCategory::Win32Icon => &mut self.win32_icon,
            InputCategory::Win32Manifest => &mut self.win32_manifest,
            InputCategory::Win32ResourceFile => &mut self.win32_resource_file,
        };
        *slot = value;
    }

    /// Iterates categories and their values in fingerprint order.
    pub fn inputs(&self) -> impl Iterator<Item = (InputCategory, &InputValue)> {
        InputCategory::ALL.into_iter().map(move |c| (c, self.input(c)))
    }

    /// Resolves `path` against [`base_directory`](Self::base_directory).
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_directory {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the output paths with relative entries resolved against
    /// [`base_directory`](Self::base_directory), so the artifacts cached
    /// are the ones the compiler writes from that directory.
    pub fn resolved_outputs(&self) -> OutputPaths {
        let resolve = |path: &Option<PathBuf>| match path.as_deref() {
            Some(p) if !is_blank(p) => Some(self.resolve_path(p)),
            _ => path.clone(),
        };
        OutputPaths {
            output: resolve(&self.outputs.output),
            pdb: resolve(&self.outputs.pdb),
            documentation: resolve(&self.outputs.documentation),
        }
    }
}

/// Paths of the artifacts a compilation produces.
///
/// Unset or blank paths are skipped by both restore and commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    /// The primary output (assembly).
    pub output: Option<PathBuf>,
    /// Debug symbols.
    pub pdb: Option<PathBuf>,
    /// XML documentation.
    pub documentation: Option<PathBuf>,
}

impl OutputPaths {
    /// Returns the set, non-blank paths with their artifact names.
    pub fn named(&self) -> Vec<(&'static str, &Path)> {
        [
            ("output", &self.output),
            ("pdb", &self.pdb),
            ("documentation", &self.documentation),
        ]
        .into_iter()
        .filter_map(|(name, path)| match path.as_deref() {
            Some(p) if !is_blank(p) => Some((name, p)),
            _ => None,
        })
        .collect()
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
