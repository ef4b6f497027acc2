use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs;

use crate::cauchy::matrix::Matrix;

/// Hex byte grid of a matrix, one row per line.
pub fn render_matrix(matrix: &Matrix) -> String {
    let mut out = String::with_capacity(matrix.k() * matrix.m() * 3 + 8);
    out.push_str("[\n");
    for y in 0..matrix.m() {
        for x in 0..matrix.k() {
            let _ = write!(out, "{:02x} ", matrix.get(y, x));
        }
        out.push('\n');
    }
    out.push(']');
    out
}

/// Single hex line for flat value listings such as the min-weight order.
pub fn render_row(values: &[u8]) -> String {
    let mut out = String::with_capacity(values.len() * 3);
    for &v in values {
        let _ = write!(out, "{v:02x} ");
    }
    out.trim_end().to_string()
}

#[derive(Serialize)]
struct MatrixReport<'a> {
    ones: u32,
    matrix: &'a Matrix,
}

/// Persist the best matrix and its score as JSON. The encoding is a
/// convenience dump for downstream tooling, not a stable format.
pub async fn write_matrix_json(path: &Path, matrix: &Matrix, ones: u32) -> Result<()> {
    let report = serde_json::to_string_pretty(&MatrixReport { ones, matrix })
        .context("Failed to serialize matrix report")?;
    fs::write(path, report)
        .await
        .with_context(|| format!("Failed to write matrix report: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_hex_grid() {
        let mut matrix = Matrix::zeroed(3, 2);
        for x in 0..3 {
            matrix.set(0, x, 1);
        }
        matrix.set(1, 0, 0xab);
        matrix.set(1, 1, 0x02);
        matrix.set(1, 2, 0xff);

        assert_eq!(render_matrix(&matrix), "[\n01 01 01 \nab 02 ff \n]");
        assert_eq!(render_row(&[0, 0x10, 0xff]), "00 10 ff");
    }
}
