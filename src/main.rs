//! # cauchy-tabgen
//!
//! Searches for low-weight Cauchy generator matrices over GF(2^8). The
//! matrices drive XOR-based erasure codes: the fewer set bits in the 8x8
//! binary expansion of each coefficient, the fewer XOR operations a
//! bit-sliced encoder performs.
//!
//! ## Usage
//!
//! ### Greedy solve from a fixed seed pair
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- solve -m 2 --seed-a 1 --seed-f 0
//! ```
//!
//! ### Random search with 8 workers
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- explore -k 29 -m 3 -i 1000000 -w 8 --seed 1
//! ```

mod cauchy;
mod cli;
mod error;
mod gf;
mod io;
mod search;

use crate::{
    cli::commands::{Cli, Commands},
    io::handlers::{handle_explore, handle_solve, handle_survey},
};
use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(test)]
mod tests {
    use crate::{
        cauchy::sort::sort_columns,
        gf::{
            tables::{DEFAULT_POLY_INDEX, GfTables},
            weight::WeightTable,
        },
        search::{
            greedy::{self, SeedPair},
            random::{self, SearchConfig},
        },
    };
    use indicatif::ProgressBar;

    #[test]
    fn full_width_greedy_solution_reproduces_its_score() {
        let gf = GfTables::build(DEFAULT_POLY_INDEX).unwrap();
        let weights = WeightTable::build(&gf);
        let order = weights.min_weight_order();
        let (k, m) = (254, 2);

        let first = greedy::solve(&gf, &weights, &order, k, m, SeedPair { a: 1, f: 0 }).unwrap();
        let second = greedy::solve(&gf, &weights, &order, k, m, SeedPair { a: 1, f: 0 }).unwrap();

        assert_eq!(first.matrix, second.matrix);
        assert_eq!(
            first.matrix.count_ones(&weights, k),
            second.matrix.count_ones(&weights, k)
        );
        assert!(first.matrix.row(0).iter().all(|&c| c == 1));
    }

    #[test]
    fn explored_matrix_sorts_into_a_non_decreasing_prefix() {
        let gf = GfTables::build(DEFAULT_POLY_INDEX).unwrap();
        let weights = WeightTable::build(&gf);
        let config = SearchConfig {
            k: 10,
            m: 3,
            iterations: 200,
            time_limit: None,
            seed: 7,
            workers: 2,
        };

        let mut best = random::optimize(&gf, &weights, config, &ProgressBar::hidden())
            .unwrap()
            .expect("a positive budget always yields a matrix");

        let total_before = best.matrix.count_ones(&weights, 10);
        assert_eq!(total_before, best.ones);

        let counts = sort_columns(&mut best.matrix, &weights);
        for pair in counts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(best.matrix.count_ones(&weights, 10), total_before);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    let start_time = Instant::now();

    let result = match cli.command {
        Commands::Solve { .. } => handle_solve(cli.command).await,
        Commands::Explore { .. } => handle_explore(cli.command).await,
        Commands::Survey { .. } => handle_survey(cli.command).await,
    };

    if let Err(e) = &result {
        error!("Operation failed: {:?}", e);
    }

    info!("Total execution time: {:.2?}", start_time.elapsed());

    result
}
