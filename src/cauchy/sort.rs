use crate::cauchy::matrix::Matrix;
use crate::gf::weight::WeightTable;

/// Selection sort ascending over `counts`, mirroring every swap into the
/// caller's payload through `swap`. O(n^2) is fine at n <= 256 and keeps the
/// first-minimum tie-break the table search depends on.
pub fn selection_sort_paired(counts: &mut [u32], mut swap: impl FnMut(usize, usize)) {
    for x in 0..counts.len() {
        let mut smallest = counts[x];
        let mut best_x = x;
        for z in x + 1..counts.len() {
            if counts[z] < smallest {
                smallest = counts[z];
                best_x = z;
            }
        }
        if best_x != x {
            counts.swap(x, best_x);
            swap(x, best_x);
        }
    }
}

/// Reorder columns ascending by per-column ones totals so a consumer can take
/// the cheapest k' columns as a prefix. Row 0 is all ones and order-invariant,
/// so only rows >= 1 move. Returns the sorted per-column totals.
pub fn sort_columns(matrix: &mut Matrix, weights: &WeightTable) -> Vec<u32> {
    let mut counts: Vec<u32> = (0..matrix.k())
        .map(|x| (0..matrix.m()).map(|y| weights.ones(matrix.get(y, x))).sum())
        .collect();
    selection_sort_paired(&mut counts, |a, b| {
        for y in 1..matrix.m() {
            matrix.swap_cells(y, a, b);
        }
    });
    counts
}
