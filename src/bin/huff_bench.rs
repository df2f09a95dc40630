use std::hint::black_box;

use clap::Parser;
use rand::{distributions::{Distribution, WeightedIndex}, Rng};

use huffman_rust::{compress_bytes, decompress_bytes, utils::timer::Timer};

#[derive(Parser, Debug)]
#[command(about = "Time compression and decompression of skewed random data")]
struct Args {
    /// Bytes of input to generate
    #[arg(short, long, default_value_t = 16 << 20)]
    size: usize,
    /// Number of timed runs
    #[arg(short, long, default_value_t = 3)]
    runs: usize,
    /// Distinct byte values in the input (1..=256)
    #[arg(short, long, default_value_t = 64)]
    alphabet: usize,
}

/// Geometric-ish weights over `alphabet` random byte values.
fn gen_input(size: usize, alphabet: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut values: Vec<u8> = (0..=255).collect();
    for i in 0..values.len() {
        let j = rng.gen_range(i..values.len());
        values.swap(i, j);
    }
    values.truncate(alphabet);

    let weights: Vec<f64> = (0..alphabet).map(|i| 0.9f64.powi(i as i32)).collect();
    let dist = WeightedIndex::new(&weights).expect("weights are positive");

    (0..size).map(|_| values[dist.sample(&mut rng)]).collect()
}

fn main() {
    let args = Args::parse();
    assert!((1..=256).contains(&args.alphabet), "alphabet must be in 1..=256");

    let input = gen_input(args.size, args.alphabet);
    let mut comp_timer = Timer::new();
    let mut decomp_timer = Timer::new();
    let mut compressed_len = 0;

    for _ in 0..args.runs {
        comp_timer.start();
        let compressed = black_box(compress_bytes(&input).expect("compression failed"));
        comp_timer.stop();

        decomp_timer.start();
        let restored = black_box(decompress_bytes(&compressed).expect("decompression failed"));
        decomp_timer.stop();

        assert_eq!(restored, input, "round trip mismatch");
        compressed_len = compressed.len();
    }

    let processed = args.size * args.runs;

    println!("################### Huffman bench ###################");
    println!("input {} bytes, alphabet {}, runs {}", args.size, args.alphabet, args.runs);
    println!("compressed to {} bytes (ratio {:.3})", compressed_len, compressed_len as f64 / args.size.max(1) as f64);
    println!("compression {:.2} MB/s, total {} ns", comp_timer.mb_per_sec(processed), comp_timer.total_time);
    println!("decompression {:.2} MB/s, total {} ns", decomp_timer.mb_per_sec(processed), decomp_timer.total_time);
}
