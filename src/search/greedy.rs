use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::debug;

use crate::cauchy::matrix::Matrix;
use crate::error::TabgenError;
use crate::gf::tables::GfTables;
use crate::gf::weight::WeightTable;

/// Seed pair for the greedy solver: X[0] = a, Y[0] = f.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPair {
    pub a: u8,
    pub f: u8,
}

/// A solved matrix together with the vectors that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreedySolution {
    pub matrix: Matrix,
    pub xs: Vec<u8>,
    pub ys: Vec<u8>,
}

/// Best outcome of one or more greedy runs, with its prefix-column score.
#[derive(Debug, Clone)]
pub struct ScoredSolution {
    pub seed: SeedPair,
    pub solution: GreedySolution,
    pub ones: u32,
}

/// Build an m x k matrix column by column from the seed pair, always taking
/// the locally cheapest choice. Deterministic for a given seed; commits never
/// backtrack.
///
/// Row phase: the first column of each row y >= 1 gets the cheapest
/// multiplier `a` (scanning `order`) whose implied Y value is unused, from
/// a * (A + G) = A + F  =>  G = (A + F + a*A) / a.
/// Column phase: each remaining X[x] = B minimizes the summed weight of
/// b = (B + F) / (Y[y] + B) over the parity rows.
pub fn solve(
    gf: &GfTables,
    weights: &WeightTable,
    order: &[u8; 256],
    k: usize,
    m: usize,
    seed: SeedPair,
) -> Result<GreedySolution, TabgenError> {
    if k == 0 || m == 0 || k + m > 256 {
        return Err(TabgenError::InvalidDimensions { k, m });
    }
    if seed.a == seed.f {
        return Err(TabgenError::SeedCollision(seed.a, seed.f));
    }

    let mut matrix = Matrix::zeroed(k, m);
    let mut xs = vec![0u8; k];
    let mut ys = vec![0u8; m];
    let mut seen = [false; 256];
    xs[0] = seed.a;
    ys[0] = seed.f;
    seen[seed.a as usize] = true;
    seen[seed.f as usize] = true;
    let af = seed.a ^ seed.f;

    matrix.row_mut(0).fill(1);

    for y in 1..m {
        let mut committed = false;
        for &a in order.iter() {
            if a == 0 {
                // 0 cannot appear as a matrix cell.
                continue;
            }
            let g = gf.div(af ^ gf.mul(a, seed.a), a);
            if seen[g as usize] {
                continue;
            }
            seen[g as usize] = true;
            ys[y] = g;
            matrix.set(y, 0, a);
            committed = true;
            break;
        }
        if !committed {
            return Err(TabgenError::InfeasibleSeed(seed.a, seed.f));
        }
    }

    for x in 1..k {
        let mut best = u32::MAX;
        let mut best_b = 0u8;
        for candidate in 0..=255u8 {
            if seen[candidate as usize] {
                continue;
            }
            // All Y values are marked seen, so the divisor is never zero.
            let total: u32 = ys[1..]
                .iter()
                .map(|&yv| weights.ones(gf.div(candidate ^ seed.f, yv ^ candidate)))
                .sum();
            if total < best {
                best = total;
                best_b = candidate;
            }
        }
        // k + m <= 256 guarantees an unseen candidate remains.
        debug_assert_ne!(best, u32::MAX);

        seen[best_b as usize] = true;
        xs[x] = best_b;
        for y in 1..m {
            matrix.set(y, x, gf.div(best_b ^ seed.f, ys[y] ^ best_b));
        }
    }

    Ok(GreedySolution { matrix, xs, ys })
}

/// Run the solver for every distinct (A, F) pair and keep the lowest score
/// over the first `score_columns` columns. Seed runs are independent given
/// the read-only tables, so the A values fan out across rayon workers;
/// infeasible seeds are skipped. Returns None only if every pair was
/// infeasible.
pub fn scan(
    gf: &GfTables,
    weights: &WeightTable,
    order: &[u8; 256],
    k: usize,
    m: usize,
    score_columns: usize,
    progress: &ProgressBar,
) -> Result<Option<ScoredSolution>, TabgenError> {
    if k == 0 || m == 0 || k + m > 256 {
        return Err(TabgenError::InvalidDimensions { k, m });
    }
    let score_columns = score_columns.min(k);

    (0u16..256)
        .into_par_iter()
        .map(|f| {
            let mut local: Option<ScoredSolution> = None;
            for a in 0u16..256 {
                if a == f {
                    continue;
                }
                let seed = SeedPair {
                    a: a as u8,
                    f: f as u8,
                };
                match solve(gf, weights, order, k, m, seed) {
                    Ok(solution) => {
                        let ones = solution.matrix.count_ones(weights, score_columns);
                        if local.as_ref().is_none_or(|best| ones < best.ones) {
                            local = Some(ScoredSolution {
                                seed,
                                solution,
                                ones,
                            });
                        }
                    }
                    Err(TabgenError::InfeasibleSeed(..)) => {
                        debug!(a, f, "skipping infeasible seed pair");
                    }
                    Err(other) => return Err(other),
                }
            }
            progress.inc(1);
            Ok(local)
        })
        .try_reduce(
            || None,
            |left, right| {
                Ok(match (left, right) {
                    (Some(l), Some(r)) => Some(if r.ones < l.ones { r } else { l }),
                    (l, None) => l,
                    (None, r) => r,
                })
            },
        )
}
