//! Removal of linearly dependent equations.

use log::debug;

use crate::numeric::is_zero;
use crate::tableau::Tableau;

/// Indices (ascending) of rows of `matrix` that are linear combinations of
/// the others.
///
/// Gauss-Jordan elimination on a copy. A column with no usable pivot at or
/// below the row cursor is skipped without moving the cursor. Rows left with
/// only zeros are dependent.
pub fn dependent_rows(matrix: &[Vec<f64>], tolerance: f64) -> Vec<usize> {
    let mut mat = matrix.to_vec();
    let n_rows = mat.len();
    let n_cols = mat.first().map_or(0, Vec::len);
    // original index of the row currently stored at each position
    let mut origin: Vec<usize> = (0..n_rows).collect();

    let (mut i, mut j) = (0, 0);
    while i < n_rows && j < n_cols {
        let Some(pivot_row) = (i..n_rows).find(|&r| !is_zero(mat[r][j], tolerance)) else {
            j += 1;
            continue;
        };
        if pivot_row != i {
            mat.swap(pivot_row, i);
            origin.swap(pivot_row, i);
        }

        let pivot_val = mat[i][j];
        for v in mat[i].iter_mut() {
            *v /= pivot_val;
        }

        let pivot = mat[i].clone();
        for (k, row) in mat.iter_mut().enumerate() {
            if k == i || row[j] == 0.0 {
                continue;
            }
            let factor = row[j];
            for (v, p) in row.iter_mut().zip(&pivot) {
                *v -= factor * p;
            }
        }

        i += 1;
        j += 1;
    }

    let mut dependent: Vec<usize> = mat
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().all(|&v| is_zero(v, tolerance)))
        .map(|(pos, _)| origin[pos])
        .collect();
    dependent.sort_unstable();
    dependent
}

/// Drop the entries at the ascending indices `rows`, keeping the rest in order.
fn remove_rows<T>(items: &mut Vec<T>, rows: &[usize]) {
    *items = std::mem::take(items)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| rows.binary_search(i).is_err())
        .map(|(_, item)| item)
        .collect();
}

impl Tableau {
    /// The matrix the rank test runs on: real known terms, then coefficients.
    pub fn augmented_matrix(&self) -> Vec<Vec<f64>> {
        self.coefficients
            .iter()
            .zip(&self.known_terms)
            .map(|(row, b)| {
                let mut augmented = Vec::with_capacity(row.len() + 1);
                augmented.push(b.real);
                augmented.extend_from_slice(row);
                augmented
            })
            .collect()
    }

    /// Delete dependent rows, keeping survivors in order. Returns the deleted
    /// row indices as they were before deletion.
    pub fn reduce_rank(&mut self, tolerance: f64) -> Vec<usize> {
        let dependent = dependent_rows(&self.augmented_matrix(), tolerance);
        if dependent.is_empty() {
            return dependent;
        }

        remove_rows(&mut self.coefficients, &dependent);
        remove_rows(&mut self.known_terms, &dependent);
        remove_rows(&mut self.basis, &dependent);

        debug!("removed {} linearly dependent rows: {:?}", dependent.len(), dependent);
        dependent
    }
}
