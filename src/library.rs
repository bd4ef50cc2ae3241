use std::{fmt::Debug, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Opaque handle to a document loaded by the content library. The library
/// owns the underlying document; holders must hand the token back via
/// [`ContentLibrary::free`] once they are done with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BenchmarkHandle(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkInfo {
    pub id: String,
    pub title: String,
    pub version: String,
    pub resolved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
}

/// The seam to the native document-processing library.
///
/// Everything substantive (parsing, validation, profile resolution, export
/// formats) lives behind this trait; the workbench core only marshals the
/// results. Implementations must tolerate being called from worker threads:
/// long operations go through the task runner.
pub trait ContentLibrary: Debug + Send + Sync {
    /// Parses a benchmark document from disk.
    fn load_benchmark(&self, path: &Path) -> Result<BenchmarkHandle>;

    /// Title, version, and resolution status, with titles picked for `lang`.
    fn benchmark_info(&self, handle: BenchmarkHandle, lang: &str) -> Result<BenchmarkInfo>;

    /// The benchmark's profiles, with titles and descriptions for `lang`.
    fn profiles(&self, handle: BenchmarkHandle, lang: &str) -> Result<Vec<ProfileInfo>>;

    /// Validates the document against its schema. A well-formed document
    /// that fails validation is `Ok(false)`, not an error.
    fn validate(&self, handle: BenchmarkHandle) -> Result<bool>;

    /// Resolves profile and item inheritance in place.
    fn resolve(&self, handle: BenchmarkHandle) -> Result<()>;

    /// Writes the document back out.
    fn export(&self, handle: BenchmarkHandle, path: &Path) -> Result<()>;

    /// Returns a handle to the library. Using the handle afterwards is a
    /// caller bug.
    fn free(&self, handle: BenchmarkHandle);
}
