//! Compressed file layout:
//!
//! ```text
//! [tree, preorder bits, zero-padded] [0x20] [payload bits + end-of-stream code, zero-padded]
//! ```
//!
//! There are no length fields. The tree describes its own extent and the
//! payload ends at the end-of-stream code.

pub mod huffman_decoder;
pub mod huffman_encoder;

use std::{fs, path::{Path, PathBuf}};

use tracing::{debug, info};

use crate::{
    bitstreams::{BinaryReader, BinaryWriterBuilder},
    config::CodecConfig,
    error::{HuffmanError, IoOp, Result},
    frequency::FrequencyTable,
    huffman_tree::HuffmanTree,
    stats::{CodecReport, Operation},
    utils::{discard, timer::Timer, write_output},
};

pub use huffman_decoder::{decode, HuffmanDecoder};
pub use huffman_encoder::{encode, HuffmanEncoder};

/// Bit counts of the two sections of one compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    pub distinct_symbols: usize,
    pub header_bits: usize,
    pub payload_bits: usize,
}

pub fn compress_bytes(input: &[u8]) -> Result<Vec<u8>> {
    compress_sections(input).map(|(out, _)| out)
}

pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decompress_sections(data).map(|(out, _)| out)
}

pub fn compress_sections(input: &[u8]) -> Result<(Vec<u8>, Sections)> {
    let table = FrequencyTable::build(input);
    debug!(input_bytes = input.len(), distinct = table.distinct(), "counted symbol frequencies");

    let tree = HuffmanTree::build(&table)?;
    let encoder = HuffmanEncoder::new(&tree);

    let mut writer = BinaryWriterBuilder::new();
    let header_bits = encoder.write_header(&mut writer);
    let payload_bits = encoder.write_body(input, &mut writer)?;

    let sections = Sections { distinct_symbols: tree.num_leaves(), header_bits, payload_bits };
    Ok((writer.build().os.into_vec(), sections))
}

pub fn decompress_sections(data: &[u8]) -> Result<(Vec<u8>, Sections)> {
    let mut reader = BinaryReader::new(data);
    let decoder = HuffmanDecoder::decode_header(&mut reader)?;

    let mut out = Vec::new();
    let payload_bits = decoder.read_body(&mut reader, &mut out)?;

    let sections = Sections {
        distinct_symbols: decoder.tree().num_leaves(),
        header_bits: decoder.header_bits(),
        payload_bits,
    };
    Ok((out, sections))
}

/// Compresses `input` next to itself, with the configured compressed
/// extension. Returns the output path.
pub fn compress(input: impl AsRef<Path>, config: &CodecConfig) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = config.compressed_path(input);
    compress_to(input, &output, config)?;
    Ok(output)
}

/// Decompresses `input` next to itself, with the configured decompressed
/// extension. Returns the output path.
pub fn decompress(input: impl AsRef<Path>, config: &CodecConfig) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = config.decompressed_path(input);
    decompress_to(input, &output, config)?;
    Ok(output)
}

pub fn compress_to(input: impl AsRef<Path>, output: impl AsRef<Path>, config: &CodecConfig) -> Result<CodecReport> {
    run(Operation::Compress, input.as_ref(), output.as_ref(), config, compress_sections)
}

pub fn decompress_to(input: impl AsRef<Path>, output: impl AsRef<Path>, config: &CodecConfig) -> Result<CodecReport> {
    run(Operation::Decompress, input.as_ref(), output.as_ref(), config, decompress_sections)
}

/// Reads `input` whole, transforms it in memory, and only then touches
/// `output`, so a failed pass never leaves an output file behind. That
/// includes the stats report: if it cannot be stored the output goes too.
fn run(
    operation: Operation,
    input: &Path,
    output: &Path,
    config: &CodecConfig,
    transform: fn(&[u8]) -> Result<(Vec<u8>, Sections)>,
) -> Result<CodecReport> {
    let mut timer = Timer::new();

    let data = fs::read(input).map_err(|e| HuffmanError::io(IoOp::Read, input, e))?;
    let (out, sections) = transform(&data).map_err(|e| e.in_file(input))?;
    write_output(output, &out, config.overwrite)?;

    timer.stop();

    let report = CodecReport {
        operation,
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        input_bytes: data.len() as u64,
        output_bytes: out.len() as u64,
        distinct_symbols: sections.distinct_symbols,
        header_bits: sections.header_bits,
        payload_bits: sections.payload_bits,
        elapsed_ns: timer.total_ns(),
    };

    if config.write_stats {
        if let Err(e) = report.store(&report.stats_path(), config.overwrite) {
            discard(output);
            return Err(e);
        }
    }

    info!(?operation, input = %input.display(), output = %output.display(),
        input_bytes = report.input_bytes, output_bytes = report.output_bytes, "done");
    Ok(report)
}

#[cfg(test)]
mod tests;
