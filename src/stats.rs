use std::{fmt, path::{Path, PathBuf}};

use serde::{Serialize, Deserialize};

use crate::{error::{HuffmanError, IoOp, Result}, utils::write_output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Compress,
    Decompress,
}

/// Summary of one file-level pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecReport {
    pub operation: Operation,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Leaves of the tree, end-of-stream marker and filler included.
    pub distinct_symbols: usize,
    /// Serialized tree bits, without padding or delimiter.
    pub header_bits: usize,
    /// Payload bits including the end-of-stream code, without padding.
    pub payload_bits: usize,
    pub elapsed_ns: u64,
}

impl CodecReport {
    /// Compressed size over original size.
    pub fn ratio(&self) -> Option<f64> {
        let (compressed, original) = match self.operation {
            Operation::Compress => (self.output_bytes, self.input_bytes),
            Operation::Decompress => (self.input_bytes, self.output_bytes),
        };

        (original != 0).then(|| compressed as f64 / original as f64)
    }

    /// `<output>.stats.json`
    pub fn stats_path(&self) -> PathBuf {
        let mut name = self.output_path.clone().into_os_string();
        name.push(".stats.json");
        PathBuf::from(name)
    }

    /// Writes the report as pretty JSON. An existing file is kept unless
    /// `overwrite` is set.
    pub fn store(&self, path: &Path, overwrite: bool) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| HuffmanError::io(IoOp::Write, path, e.into()))?;
        write_output(path, &json, overwrite)
    }
}

impl fmt::Display for CodecReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.operation {
            Operation::Compress => "compressed",
            Operation::Decompress => "decompressed",
        };

        write!(f, "{} {} ({} bytes) -> {} ({} bytes) in {}ns",
            verb, self.input_path.display(), self.input_bytes,
            self.output_path.display(), self.output_bytes, self.elapsed_ns)?;

        if let Some(ratio) = self.ratio() {
            write!(f, ", ratio {:.3}", ratio)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(operation: Operation, input_bytes: u64, output_bytes: u64) -> CodecReport {
        CodecReport {
            operation,
            input_path: PathBuf::from("in.txt"),
            output_path: PathBuf::from("out/in.mcf"),
            input_bytes,
            output_bytes,
            distinct_symbols: 3,
            header_bits: 23,
            payload_bits: 40,
            elapsed_ns: 1000,
        }
    }

    #[test]
    fn test_ratio_is_compressed_over_original() {
        assert_eq!(report(Operation::Compress, 200, 50).ratio(), Some(0.25));
        assert_eq!(report(Operation::Decompress, 50, 200).ratio(), Some(0.25));
        assert_eq!(report(Operation::Compress, 0, 4).ratio(), None);
    }

    #[test]
    fn test_stats_path_appends_suffix() {
        assert_eq!(report(Operation::Compress, 1, 1).stats_path(), PathBuf::from("out/in.mcf.stats.json"));
    }

    #[test]
    fn test_json_roundtrip() {
        let r = report(Operation::Decompress, 10, 20);
        let json = serde_json::to_string(&r).unwrap();

        assert!(json.contains("\"operation\":\"decompress\""));
        assert_eq!(serde_json::from_str::<CodecReport>(&json).unwrap(), r);
    }

    #[test]
    fn test_store_respects_overwrite() {
        let dir = std::env::temp_dir().join(format!("huffman_rust_store_{}_{}", std::process::id(), rand::random::<u32>()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.mcf.stats.json");
        std::fs::write(&path, b"precious").unwrap();
        let r = report(Operation::Compress, 10, 4);

        assert!(matches!(r.store(&path, false), Err(HuffmanError::Io { op: IoOp::Write, .. })));
        assert_eq!(std::fs::read(&path).unwrap(), b"precious");

        r.store(&path, true).unwrap();
        assert_eq!(serde_json::from_slice::<CodecReport>(&std::fs::read(&path).unwrap()).unwrap(), r);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_display_mentions_both_files() {
        let line = report(Operation::Compress, 200, 50).to_string();

        assert!(line.starts_with("compressed in.txt (200 bytes) -> out/in.mcf (50 bytes)"));
        assert!(line.ends_with("ratio 0.250"));
    }
}
