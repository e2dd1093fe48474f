use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Limit displayed matches per query (0 = all).
    #[serde(default)]
    pub top: usize,
    /// Emit results as JSON.
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { top: 0, json: false }
    }
}

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
