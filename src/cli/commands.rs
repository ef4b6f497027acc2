use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::gf::tables::DEFAULT_POLY_INDEX;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about,
    long_about = "Low-weight Cauchy generator matrix search over GF(2^8)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deterministic greedy column solver from a seed pair (A, F)
    Solve {
        /// Index into the reduction polynomial catalog
        #[arg(long, default_value_t = DEFAULT_POLY_INDEX)]
        poly: usize,

        #[arg(short = 'm', long, default_value_t = 2)]
        parity_rows: usize,

        /// Data columns; defaults to 256 - parity rows
        #[arg(short = 'k', long)]
        columns: Option<usize>,

        #[arg(long, default_value_t = 1)]
        seed_a: u8,

        #[arg(long, default_value_t = 0)]
        seed_f: u8,

        /// Try every distinct (A, F) pair instead of the fixed seed
        #[arg(long)]
        scan: bool,

        /// Score only the first N columns; defaults to all
        #[arg(long)]
        score_columns: Option<usize>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Random search over disjoint (X, Y) vector pairs
    Explore {
        /// Index into the reduction polynomial catalog
        #[arg(long, default_value_t = DEFAULT_POLY_INDEX)]
        poly: usize,

        #[arg(short = 'k', long, default_value_t = 29)]
        columns: usize,

        #[arg(short = 'm', long, default_value_t = 3)]
        parity_rows: usize,

        #[arg(short, long, default_value_t = 1_000_000)]
        iterations: u64,

        /// Wall-clock cap in seconds
        #[arg(long)]
        seconds: Option<u64>,

        #[arg(long, default_value_t = 1)]
        seed: u64,

        #[arg(short, long, default_value_t = 1)]
        workers: usize,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Column-weight survey of all 256 symbols for every catalog polynomial
    Survey {
        /// Report cumulative ones for prefixes up to this many columns
        #[arg(short, long, default_value_t = 32)]
        columns: usize,
    },
}
