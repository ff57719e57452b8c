use serde::{Deserialize, Serialize};

use crate::rates::{DEFAULT_FILE, DEFAULT_HOST};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    File,
    Live,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            file: default_file(),
            host: default_host(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_file() -> String {
    DEFAULT_FILE.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_precision() -> usize {
    2
}
