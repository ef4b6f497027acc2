use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument, warn};

use crate::{
    cauchy::{matrix::Matrix, sort::sort_columns},
    cli::commands::Commands,
    gf::{
        tables::{GfTables, POLYNOMIAL_CATALOG},
        weight::WeightTable,
    },
    io::render::{render_matrix, render_row, write_matrix_json},
    search::{greedy, random},
};

fn check_dimensions(k: usize, m: usize) -> Result<()> {
    if k == 0 || m == 0 || k + m > 256 {
        return Err(anyhow!("Invalid k/m values. Must be > 0 and k+m <= 256"));
    }
    Ok(())
}

fn progress_bar(len: u64, template: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(template)
            .unwrap()
            .progress_chars("=> "),
    );
    pb
}

#[instrument(skip(args))]
pub async fn handle_solve(args: Commands) -> Result<()> {
    let (poly, parity_rows, columns, seed_a, seed_f, scan, score_columns, output) = match args {
        Commands::Solve {
            poly,
            parity_rows,
            columns,
            seed_a,
            seed_f,
            scan,
            score_columns,
            output,
        } => (
            poly,
            parity_rows,
            columns,
            seed_a,
            seed_f,
            scan,
            score_columns,
            output,
        ),
        _ => unreachable!(),
    };

    let m = parity_rows;
    let k = columns.unwrap_or(256usize.saturating_sub(m));
    check_dimensions(k, m)?;
    let score_cols = score_columns.unwrap_or(k).min(k);

    let gf = Arc::new(GfTables::build(poly)?);
    let weights = Arc::new(WeightTable::build(&gf));

    let gf_task = gf.clone();
    let weights_task = weights.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let order = weights_task.min_weight_order();
        info!("Min-weight order: {}", render_row(&order));

        if scan {
            let pb = progress_bar(
                256,
                "[{elapsed_precise}] [{bar:40.yellow/black}] Scanning seeds {pos}/{len}",
            );
            let best = greedy::scan(&gf_task, &weights_task, &order, k, m, score_cols, &pb)?;
            pb.finish_with_message("Seed scan complete!");
            best.ok_or_else(|| anyhow!("Every seed pair was infeasible"))
        } else {
            let seed = greedy::SeedPair {
                a: seed_a,
                f: seed_f,
            };
            let solution = greedy::solve(&gf_task, &weights_task, &order, k, m, seed)?;
            let ones = solution.matrix.count_ones(&weights_task, score_cols);
            Ok(greedy::ScoredSolution {
                seed,
                solution,
                ones,
            })
        }
    })
    .await??;

    info!(
        "Greedy solution for seed A={} F={}: {} ones over the first {} columns",
        outcome.seed.a, outcome.seed.f, outcome.ones, score_cols
    );
    println!("{}", render_matrix(&outcome.solution.matrix));

    if let Some(path) = output {
        write_matrix_json(&path, &outcome.solution.matrix, outcome.ones).await?;
        info!("Best matrix written to {:?}", path);
    }
    Ok(())
}

#[instrument(skip(args))]
pub async fn handle_explore(args: Commands) -> Result<()> {
    let (poly, columns, parity_rows, iterations, seconds, seed, workers, output) = match args {
        Commands::Explore {
            poly,
            columns,
            parity_rows,
            iterations,
            seconds,
            seed,
            workers,
            output,
        } => (
            poly,
            columns,
            parity_rows,
            iterations,
            seconds,
            seed,
            workers,
            output,
        ),
        _ => unreachable!(),
    };

    check_dimensions(columns, parity_rows)?;

    let gf = Arc::new(GfTables::build(poly)?);
    let weights = Arc::new(WeightTable::build(&gf));

    let config = random::SearchConfig {
        k: columns,
        m: parity_rows,
        iterations,
        time_limit: seconds.map(Duration::from_secs),
        seed,
        workers,
    };

    let gf_task = gf.clone();
    let weights_task = weights.clone();
    let best = tokio::task::spawn_blocking(move || {
        let pb = progress_bar(
            iterations,
            "[{elapsed_precise}] [{bar:40.cyan/black}] Sampling matrices {pos}/{len}",
        );
        let best = random::optimize(&gf_task, &weights_task, config, &pb)?;
        pb.finish_with_message("Search budget exhausted!");
        Ok::<_, anyhow::Error>(best)
    })
    .await??;

    let mut best = best.ok_or_else(|| anyhow!("The search budget produced no matrix"))?;
    let counts = sort_columns(&mut best.matrix, &weights);
    info!(
        "Best matrix: {} ones; cheapest column weighs {}, heaviest {}",
        best.ones,
        counts.first().copied().unwrap_or(0),
        counts.last().copied().unwrap_or(0)
    );
    println!("{}", render_matrix(&best.matrix));

    if let Some(path) = output {
        write_matrix_json(&path, &best.matrix, best.ones).await?;
        info!("Best matrix written to {:?}", path);
    }
    Ok(())
}

#[instrument(skip(args))]
pub async fn handle_survey(args: Commands) -> Result<()> {
    let columns = match args {
        Commands::Survey { columns } => columns,
        _ => unreachable!(),
    };
    let columns = columns.min(255);

    tokio::task::spawn_blocking(move || {
        for (index, &generator) in POLYNOMIAL_CATALOG.iter().enumerate() {
            info!("Surveying generator {} (0x{:02x})", index, generator);

            let gf = match GfTables::build(index) {
                Ok(gf) => gf,
                Err(e) => {
                    warn!("Skipping generator {}: {}", index, e);
                    continue;
                }
            };
            let weights = WeightTable::build(&gf);

            // Every symbol as a single parity row under the all-ones row,
            // sorted so the cheapest multipliers come first.
            let mut matrix = Matrix::zeroed(256, 2);
            for x in 0..256 {
                matrix.set(0, x, 1);
                matrix.set(1, x, x as u8);
            }
            sort_columns(&mut matrix, &weights);
            println!("{}", render_matrix(&matrix));

            let mut ones = 0u32;
            for x in 1..=columns {
                ones += weights.ones(matrix.get(1, x));
                info!("{} columns = {} ones", x, ones);
            }
        }
        Ok::<_, anyhow::Error>(())
    })
    .await??;

    Ok(())
}
