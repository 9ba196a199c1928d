//! Settings file loading

use pixcut_image::{ImageError, Result, Settings};
use std::path::{Path, PathBuf};

/// File names searched in the working directory when `--config` is absent.
const CANDIDATES: [&str; 2] = ["pixcut.toml", ".pixcut.toml"];

/// Settings from `path`, a discovered config file, or defaults.
///
/// Returns the file the settings came from, if any.
pub fn load(path: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

    let settings = match &config_path {
        Some(p) => load_config_file(p)?,
        None => Settings::default(),
    };

    Ok((settings, config_path))
}

fn find_config_file() -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

/// Load and parse a TOML settings file.
pub fn load_config_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ImageError::config(format!("failed to read config file {}: {e}", path.display()))
    })?;

    let settings: Settings = toml::from_str(&content).map_err(|e| {
        ImageError::config(format!("failed to parse config file {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixcut_image::{CutMode, OutputFormat, ResizeMode};

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
output_format = "jpg"
quality = 70
cut_mode = "vertical"

[resize]
mode = "preset"
width = 800
"#,
        )
        .unwrap();

        let (settings, from) = load(Some(&path)).unwrap();
        assert_eq!(from.as_deref(), Some(path.as_path()));
        assert_eq!(settings.output_format, OutputFormat::Jpeg);
        assert_eq!(settings.quality, 70);
        assert_eq!(settings.cut_mode, CutMode::Vertical);
        assert_eq!(
            settings.resize.map(|r| r.mode),
            Some(ResizeMode::Preset { width: 800 })
        );
        assert!(settings.strip_metadata);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load(Some(Path::new("/nonexistent/pixcut.toml"))).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "quality = \"high\"").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("bad.toml"));
    }
}
