use serde::Serialize;

use crate::error::TabgenError;
use crate::gf::tables::GfTables;
use crate::gf::weight::WeightTable;

/// An m x k generator matrix of GF(256) values, row-major.
///
/// Matrices built from disjoint (X, Y) vectors keep row 0 identically 1:
/// Cauchy matrices stay invertible under nonzero row and column scaling, and
/// the all-ones row is the cheapest row there is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matrix {
    k: usize,
    m: usize,
    cells: Vec<u8>,
}

impl Matrix {
    pub fn zeroed(k: usize, m: usize) -> Self {
        Matrix {
            k,
            m,
            cells: vec![0u8; k * m],
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn m(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> u8 {
        self.cells[y * self.k + x]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, v: u8) {
        self.cells[y * self.k + x] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.cells[y * self.k..(y + 1) * self.k]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.cells[y * self.k..(y + 1) * self.k]
    }

    pub fn swap_cells(&mut self, y: usize, a: usize, b: usize) {
        self.cells.swap(y * self.k + a, y * self.k + b);
    }

    /// Rescale each row >= 1 by the divisor minimizing that row's ones total.
    /// Returns the whole matrix's ones total, row 0 included.
    ///
    /// Every candidate pivot is evaluated by rebuilding the row's weights
    /// under it; the first minimum in ascending column order wins. Nonzero
    /// row scaling preserves invertibility of every square submatrix, so this
    /// is a free weight reduction applied before any harder search.
    pub fn canonicalize_rows(&mut self, gf: &GfTables, weights: &WeightTable) -> u32 {
        let mut ones = weights.ones(1) * self.k as u32;

        for y in 1..self.m {
            let mut best = u32::MAX;
            let mut best_x = 0usize;
            for x in 0..self.k {
                let pivot = self.get(y, x);
                let count: u32 = self
                    .row(y)
                    .iter()
                    .map(|&c| weights.ones(gf.div(c, pivot)))
                    .sum();
                if count < best {
                    best = count;
                    best_x = x;
                }
            }

            let pivot = self.get(y, best_x);
            for z in 0..self.k {
                let c = gf.div(self.get(y, z), pivot);
                self.set(y, z, c);
            }
            ones += best;
        }

        ones
    }

    /// Ones total over the first `columns` columns of every row. Scoring a
    /// prefix lets callers rate the best-n-of-k subset of a sorted matrix
    /// without committing to the full width.
    pub fn count_ones(&self, weights: &WeightTable, columns: usize) -> u32 {
        (0..self.m)
            .map(|y| {
                self.row(y)[..columns]
                    .iter()
                    .map(|&c| weights.ones(c))
                    .sum::<u32>()
            })
            .sum()
    }
}

/// Build the raw Cauchy matrix for disjoint vectors X (k values) and Y
/// (m values), pivoted around Y[0] so that row 0 is trivially all ones:
/// cell (y, x) = (Y[0] + X[x]) / (X[x] + Y[y]).
pub fn build_raw(gf: &GfTables, xs: &[u8], ys: &[u8]) -> Result<Matrix, TabgenError> {
    let (k, m) = (xs.len(), ys.len());
    if k == 0 || m == 0 || k + m > 256 {
        return Err(TabgenError::InvalidDimensions { k, m });
    }
    let mut used = [false; 256];
    for &v in xs.iter().chain(ys.iter()) {
        if used[v as usize] {
            return Err(TabgenError::OverlappingVectors(v));
        }
        used[v as usize] = true;
    }

    let mut matrix = Matrix::zeroed(k, m);
    matrix.row_mut(0).fill(1);
    for (y, &yc) in ys.iter().enumerate().skip(1) {
        for (x, &xc) in xs.iter().enumerate() {
            let d = ys[0] ^ xc;
            matrix.set(y, x, gf.mul(gf.inv(xc ^ yc), d));
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::tables::DEFAULT_POLY_INDEX;

    fn field() -> (GfTables, WeightTable) {
        let gf = GfTables::build(DEFAULT_POLY_INDEX).unwrap();
        let weights = WeightTable::build(&gf);
        (gf, weights)
    }

    #[test]
    fn first_row_is_all_ones() {
        let (gf, _) = field();
        let xs: Vec<u8> = (50..62).collect();
        let ys = [3u8, 7, 11];
        let matrix = build_raw(&gf, &xs, &ys).unwrap();

        assert!(matrix.row(0).iter().all(|&c| c == 1));
        // Raw Cauchy cells are never zero.
        for y in 1..matrix.m() {
            assert!(matrix.row(y).iter().all(|&c| c != 0));
        }
    }

    #[test]
    fn rejects_overlapping_vectors() {
        let (gf, _) = field();
        assert_eq!(
            build_raw(&gf, &[1, 2, 3], &[4, 2]).err(),
            Some(TabgenError::OverlappingVectors(2))
        );
        assert_eq!(
            build_raw(&gf, &[1, 1], &[4]).err(),
            Some(TabgenError::OverlappingVectors(1))
        );
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let (gf, _) = field();
        let xs: Vec<u8> = (0..=254).collect();
        let ys = [255u8, 0];
        assert!(matches!(
            build_raw(&gf, &xs, &ys),
            Err(TabgenError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn canonicalize_never_increases_a_row_weight() {
        let (gf, weights) = field();
        let xs: Vec<u8> = (20..36).collect();
        let ys = [100u8, 101, 102, 103];
        let mut matrix = build_raw(&gf, &xs, &ys).unwrap();

        let raw_rows: Vec<u32> = (1..matrix.m())
            .map(|y| matrix.row(y).iter().map(|&c| weights.ones(c)).sum())
            .collect();

        let score = matrix.canonicalize_rows(&gf, &weights);

        for (y, &raw) in (1..matrix.m()).zip(raw_rows.iter()) {
            let rescaled: u32 = matrix.row(y).iter().map(|&c| weights.ones(c)).sum();
            assert!(rescaled <= raw, "row {y} got worse: {rescaled} > {raw}");
            // Rescaled rows still have no zero cells.
            assert!(matrix.row(y).iter().all(|&c| c != 0));
        }
        assert_eq!(score, matrix.count_ones(&weights, matrix.k()));
    }

    #[test]
    fn prefix_count_matches_full_count() {
        let (gf, weights) = field();
        let xs: Vec<u8> = (200..220).collect();
        let ys = [5u8, 6];
        let matrix = build_raw(&gf, &xs, &ys).unwrap();

        assert_eq!(
            matrix.count_ones(&weights, matrix.k()),
            (0..matrix.k())
                .map(|x| matrix.count_ones(&weights, x + 1) - matrix.count_ones(&weights, x))
                .sum::<u32>()
        );
        assert_eq!(matrix.count_ones(&weights, 0), 0);
    }
}
