use crate::error::SolveError;
use crate::tableau::Tableau;

impl Tableau {
    /// Gauss-Jordan pivot on `(row, column)`: `column` becomes the basic
    /// variable of `row`.
    ///
    /// Fails only when the pivot entry is exactly zero, which means the caller
    /// selected an illegal position.
    pub fn pivot(&mut self, row: usize, column: usize) -> Result<(), SolveError> {
        let pivot_val = self.coefficients[row][column];
        if pivot_val == 0.0 {
            return Err(SolveError::ZeroPivot { row, column });
        }

        // Scale pivot row
        if pivot_val != 1.0 {
            self.known_terms[row] /= pivot_val;
            for a in self.coefficients[row].iter_mut() {
                *a /= pivot_val;
            }
            self.coefficients[row][column] = 1.0;
        }

        let pivot_row = self.coefficients[row].clone();
        let pivot_term = self.known_terms[row];

        // Price out the entering column
        let cost = self.reduced_costs[column];
        if cost != 0.0 {
            let k = -cost;
            self.objective += k * pivot_term;
            for (c, p) in self.reduced_costs.iter_mut().zip(&pivot_row) {
                *c += k * p;
            }
            self.reduced_costs[column] = 0.0;
        }

        // Eliminate column in other rows
        for (i, coeffs) in self.coefficients.iter_mut().enumerate() {
            if i == row || coeffs[column] == 0.0 {
                continue;
            }
            let k = -coeffs[column];
            self.known_terms[i] += k * pivot_term;
            for (a, p) in coeffs.iter_mut().zip(&pivot_row) {
                *a += k * p;
            }
            coeffs[column] = 0.0;
        }

        self.basis[row] = column + 1;
        Ok(())
    }
}
