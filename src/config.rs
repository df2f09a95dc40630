use std::{collections::HashMap, fs::File, io::BufReader, path::{Path, PathBuf}};

use crate::error::{HuffmanError, IoOp, Result};

pub const KEY_COMPRESSED_EXTENSION: &str = "compressed.extension";
pub const KEY_DECOMPRESSED_EXTENSION: &str = "decompressed.extension";
pub const KEY_OVERWRITE: &str = "overwrite";
pub const KEY_STATS: &str = "stats";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Extension given to compressed files.
    pub compressed_extension: String,
    /// Extension given to decompressed files.
    pub decompressed_extension: String,
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
    /// Write a `<output>.stats.json` report next to every output.
    pub write_stats: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compressed_extension: "mcf".to_string(),
            decompressed_extension: "txt".to_string(),
            overwrite: false,
            write_stats: false,
        }
    }
}

impl TryFrom<HashMap<String, String>> for CodecConfig {
    type Error = HuffmanError;

    /// Missing keys keep their default; unknown keys are ignored.
    fn try_from(value: HashMap<String, String>) -> Result<Self> {
        let mut config = CodecConfig::default();

        if let Some(ext) = value.get(KEY_COMPRESSED_EXTENSION) {
            config.compressed_extension = parse_extension(KEY_COMPRESSED_EXTENSION, ext)?;
        }
        if let Some(ext) = value.get(KEY_DECOMPRESSED_EXTENSION) {
            config.decompressed_extension = parse_extension(KEY_DECOMPRESSED_EXTENSION, ext)?;
        }
        if let Some(flag) = value.get(KEY_OVERWRITE) {
            config.overwrite = parse_bool(KEY_OVERWRITE, flag)?;
        }
        if let Some(flag) = value.get(KEY_STATS) {
            config.write_stats = parse_bool(KEY_STATS, flag)?;
        }

        Ok(config)
    }
}

impl CodecConfig {
    /// Reads a Java-style `.properties` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HuffmanError::io(IoOp::Read, path, e))?;
        let props = java_properties::read(BufReader::new(file))
            .map_err(|e| HuffmanError::Properties(e.to_string()))?;

        Self::try_from(props)
    }

    pub fn compressed_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.compressed_extension)
    }

    pub fn decompressed_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.decompressed_extension)
    }
}

fn invalid(key: &str, value: &str) -> HuffmanError {
    HuffmanError::Config { key: key.to_string(), value: value.to_string() }
}

fn parse_extension(key: &str, value: &str) -> Result<String> {
    let ext = value.trim().trim_start_matches('.');

    if ext.is_empty() || ext.contains(['/', '\\', '.']) {
        return Err(invalid(key, value));
    }

    Ok(ext.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
