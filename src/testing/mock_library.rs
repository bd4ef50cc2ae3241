use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::library::{BenchmarkHandle, BenchmarkInfo, ContentLibrary, ProfileInfo};

/// Scripted stand-in for the native content library. Results are fixed up
/// front; loads, frees, and exports are recorded for assertions. State sits
/// behind a `Mutex` because the trait is called from worker threads.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockLibrary {
    pub benchmark: Option<BenchmarkInfo>,
    pub profiles: Vec<ProfileInfo>,
    state: Mutex<MockState>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MockState {
    next_handle: u64,
    loaded: Vec<BenchmarkHandle>,
    freed: Vec<BenchmarkHandle>,
    exported: Vec<PathBuf>,
}

#[cfg(test)]
impl MockLibrary {
    /// A mock that successfully loads a small two-profile benchmark.
    pub fn with_sample_benchmark() -> Self {
        let benchmark = serde_json::from_value(json!({
            "id": "xccdf_org.example_benchmark_baseline",
            "title": "Example Baseline Benchmark",
            "version": "1.0",
            "resolved": false
        }))
        .expect("sample benchmark json should parse");

        let profiles = serde_json::from_value(json!([
            {
                "id": "xccdf_org.example_profile_baseline",
                "title": "Baseline",
                "description": "Recommended defaults."
            },
            {
                "id": "xccdf_org.example_profile_strict",
                "title": "Strict",
                "description": null
            }
        ]))
        .expect("sample profile json should parse");

        Self {
            benchmark: Some(benchmark),
            profiles,
            state: Mutex::default(),
        }
    }

    pub fn loaded_handles(&self) -> Vec<BenchmarkHandle> {
        self.state().loaded.clone()
    }

    pub fn freed_handles(&self) -> Vec<BenchmarkHandle> {
        self.state().freed.clone()
    }

    pub fn exported_paths(&self) -> Vec<PathBuf> {
        self.state().exported.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl ContentLibrary for MockLibrary {
    fn load_benchmark(&self, _path: &Path) -> Result<BenchmarkHandle> {
        if self.benchmark.is_none() {
            return Err(anyhow!("No benchmark in mock"));
        }
        let mut state = self.state();
        state.next_handle += 1;
        let handle = BenchmarkHandle(state.next_handle);
        state.loaded.push(handle);
        Ok(handle)
    }

    fn benchmark_info(&self, _handle: BenchmarkHandle, _lang: &str) -> Result<BenchmarkInfo> {
        self.benchmark
            .clone()
            .ok_or_else(|| anyhow!("No benchmark in mock"))
    }

    fn profiles(&self, _handle: BenchmarkHandle, _lang: &str) -> Result<Vec<ProfileInfo>> {
        Ok(self.profiles.clone())
    }

    fn validate(&self, _handle: BenchmarkHandle) -> Result<bool> {
        Ok(self.benchmark.is_some())
    }

    fn resolve(&self, _handle: BenchmarkHandle) -> Result<()> {
        Ok(())
    }

    fn export(&self, _handle: BenchmarkHandle, path: &Path) -> Result<()> {
        self.state().exported.push(path.to_path_buf());
        Ok(())
    }

    fn free(&self, handle: BenchmarkHandle) {
        self.state().freed.push(handle);
    }
}
