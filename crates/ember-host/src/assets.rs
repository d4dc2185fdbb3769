use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use ember_bridge::AssetLoader;

/// Read-only assets rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        // Assets are addressed relative to the root only.
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            bail!("asset path {path:?} escapes the asset root");
        }
        Ok(self.root.join(rel))
    }
}

impl AssetLoader for DirAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        std::fs::read(&full).with_context(|| format!("failed to read asset {}", full.display()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }
}
