//! Viewer configuration (JSON).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "ViewerConfig::default_width")]
    pub width: u32,
    #[serde(default = "ViewerConfig::default_height")]
    pub height: u32,

    /// Key of the entry to show first; the first ordered entry when absent.
    #[serde(default)]
    pub start_entry: Option<String>,

    /// Directory relative texture/audio channel paths resolve against.
    #[serde(default)]
    pub assets_root: Option<PathBuf>,
}

impl ViewerConfig {
    fn default_width() -> u32 {
        960
    }
    fn default_height() -> u32 {
        540
    }

    pub fn resolve_asset(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.assets_root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            start_entry: None,
            assets_root: None,
        }
    }
}

/// Load a [`ViewerConfig`] from a JSON file, carrying the path in errors.
pub fn load_viewer_config(path: impl AsRef<Path>) -> Result<ViewerConfig, EngineError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: ViewerConfig = serde_json::from_slice(&bytes).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if cfg.width == 0 || cfg.height == 0 {
        return Err(EngineError::InvalidConfig {
            path: path.to_path_buf(),
            msg: "width/height must be > 0".to_string(),
        });
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
    }

    #[test]
    fn asset_paths_resolve_against_the_root() {
        let cfg = ViewerConfig {
            assets_root: Some(PathBuf::from("/opt/toygal/assets")),
            ..ViewerConfig::default()
        };
        assert_eq!(
            cfg.resolve_asset(Path::new("noise.png")),
            PathBuf::from("/opt/toygal/assets/noise.png")
        );
        assert_eq!(
            cfg.resolve_asset(Path::new("/tmp/abs.png")),
            PathBuf::from("/tmp/abs.png")
        );
    }
}
