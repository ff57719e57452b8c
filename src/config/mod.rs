mod settings;

pub use settings::{Config, DisplaySettings, SourceKind, SourceSettings};

use crate::error::{ConvertError, Result};
use directories::ProjectDirs;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.cbconvert/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "cbconvert") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        ConvertError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".cbconvert"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, falling back to defaults when it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ConvertError::ConfigParse { path, source: e })
}

/// Create the config directory and write the config.toml template
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ConvertError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[source]
kind = "file"             # "file" reads a local document, "live" downloads today's feed
file = "currencies.xml"   # used when kind = "file"; relative to the working directory
host = "www.cbr.ru"       # used when kind = "live"
timeout_secs = 10

[display]
precision = 2             # decimal places in printed results
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.source.kind, defaults.source.kind);
        assert_eq!(parsed.source.file, defaults.source.file);
        assert_eq!(parsed.source.host, defaults.source.host);
        assert_eq!(parsed.source.timeout_secs, defaults.source.timeout_secs);
        assert_eq!(parsed.display.precision, defaults.display.precision);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[source]\nkind = \"live\"\n").unwrap();
        assert_eq!(parsed.source.kind, SourceKind::Live);
        assert_eq!(parsed.source.host, "www.cbr.ru");
        assert_eq!(parsed.display.precision, 2);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.source.kind, SourceKind::File);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "[source]\nkind = \"carrier-pigeon\"\n").unwrap();
        assert!(matches!(
            load_config(dir.path()),
            Err(ConvertError::ConfigParse { .. })
        ));
    }

    #[test]
    fn init_refuses_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            init_config(dir.path()),
            Err(ConvertError::AlreadyInitialized(_))
        ));

        let fresh = dir.path().join("cfg");
        let path = init_config(&fresh).unwrap();
        assert!(path.exists());
    }
}
