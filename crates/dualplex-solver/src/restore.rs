//! Getting a tableau into a dual feasible starting state.

use log::{debug, trace};

use crate::error::SolveError;
use crate::numeric::{is_below_zero, is_zero};
use crate::observer::Observer;
use crate::penalized::Penalized;
use crate::tableau::Tableau;

/// Outcome of [`Tableau::complete_basis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisCompletion {
    /// Every row already had a basic variable
    AlreadyComplete,
    /// Some rows were given one by pivoting
    Completed { pivots: usize },
    /// The row has no nonzero coefficient but a nonzero known term
    Inconsistent { row: usize },
}

/// The artificial row and column injected by [`Tableau::repair_costs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repair {
    /// Index of the appended row
    pub row: usize,
    /// Index of the appended (artificial) column
    pub column: usize,
    /// Column that held the most negative reduced cost and entered the basis
    pub entering: usize,
}

/// Outcome of [`Tableau::repair_costs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostRepair {
    NotNeeded,
    Performed(Repair),
}

impl Tableau {
    /// Give every row without a basic variable the first column with a
    /// nonzero coefficient in that row. May leave negative reduced costs.
    pub fn complete_basis<O: Observer + ?Sized>(
        &mut self,
        tolerance: f64,
        observer: &mut O,
    ) -> Result<BasisCompletion, SolveError> {
        let mut pivots = 0;
        for row in 0..self.num_rows() {
            if self.basis[row] != 0 {
                continue;
            }
            let Some(column) = self.coefficients[row].iter().position(|&a| !is_zero(a, tolerance)) else {
                debug!("row {} has no nonzero coefficient, cannot complete basis", row);
                return Ok(BasisCompletion::Inconsistent { row });
            };
            trace!("completing basis: row {} <- x{}", row, column + 1);
            self.pivot(row, column)?;
            observer.on_pivot(row, column, self);
            pivots += 1;
        }

        Ok(if pivots == 0 {
            BasisCompletion::AlreadyComplete
        } else {
            BasisCompletion::Completed { pivots }
        })
    }

    /// Column with the most negative reduced cost, first one on ties.
    pub fn most_negative_cost(&self, tolerance: f64) -> Option<usize> {
        let mut min = 0.0;
        let mut min_col = None;
        for (j, &c) in self.reduced_costs.iter().enumerate() {
            if is_below_zero(c, tolerance) && c < min {
                min = c;
                min_col = Some(j);
            }
        }
        min_col
    }

    /// Make every reduced cost non-negative with one big-M artificial
    /// constraint.
    ///
    /// The new row bounds the sum of all columns with a nonzero reduced cost
    /// (plus the new artificial column) by `M`, and is pivoted on the most
    /// negative cost column. Afterwards the known terms carry `M` multiples.
    pub fn repair_costs<O: Observer + ?Sized>(
        &mut self,
        tolerance: f64,
        observer: &mut O,
    ) -> Result<CostRepair, SolveError> {
        let Some(entering) = self.most_negative_cost(tolerance) else {
            return Ok(CostRepair::NotNeeded);
        };

        let n = self.num_columns();
        let row = self.num_rows();

        for coeffs in self.coefficients.iter_mut() {
            coeffs.push(0.0);
        }
        let mut repair_row: Vec<f64> = self
            .reduced_costs
            .iter()
            .map(|&c| if is_zero(c, tolerance) { 0.0 } else { 1.0 })
            .collect();
        repair_row.push(1.0);
        self.coefficients.push(repair_row);
        self.reduced_costs.push(0.0);
        self.known_terms.push(Penalized::REPAIR_MARKER);
        self.basis.push(n + 1);

        debug!(
            "dual infeasible (x{} costs {}), added artificial x{} in row {}",
            entering + 1,
            self.reduced_costs[entering],
            n + 1,
            row
        );

        self.pivot(row, entering)?;
        observer.on_pivot(row, entering, self);

        Ok(CostRepair::Performed(Repair {
            row,
            column: n,
            entering,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::DEFAULT_TOLERANCE;
    use crate::observer::NoopObserver;

    #[test]
    fn test_complete_basis_pivots_first_nonzero_column() {
        let mut t = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![0.0, 2.0, 1.0, 0.0], vec![1.0, 1.0, 0.0, 1.0]],
            vec![Penalized::real(4.0), Penalized::real(1.0)],
            vec![1.0, 1.0, 0.0, 0.0],
            vec![0, 4],
        )
        .unwrap();

        let outcome = t.complete_basis(DEFAULT_TOLERANCE, &mut NoopObserver).unwrap();
        assert_eq!(outcome, BasisCompletion::Completed { pivots: 1 });
        assert_eq!(t.basis, vec![2, 4]);
        assert!(t.has_identity_basis(DEFAULT_TOLERANCE));
        // pricing out x2 leaves x3 with a negative cost
        assert_eq!(t.reduced_costs, vec![1.0, 0.0, -0.5, 0.0]);
    }

    #[test]
    fn test_complete_basis_reports_inconsistent_row() {
        let mut t = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
            vec![Penalized::real(1.0), Penalized::real(5.0)],
            vec![0.0, 1.0],
            vec![1, 0],
        )
        .unwrap();

        let outcome = t.complete_basis(DEFAULT_TOLERANCE, &mut NoopObserver).unwrap();
        assert_eq!(outcome, BasisCompletion::Inconsistent { row: 1 });
    }

    #[test]
    fn test_no_repair_when_costs_are_non_negative() {
        let mut t = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, 1.0]],
            vec![Penalized::real(1.0)],
            vec![0.0, -1e-9],
            vec![1],
        )
        .unwrap();
        let before = t.clone();

        let outcome = t.repair_costs(DEFAULT_TOLERANCE, &mut NoopObserver).unwrap();
        assert_eq!(outcome, CostRepair::NotNeeded);
        assert_eq!(t, before);
    }

    #[test]
    fn test_repair_grows_tableau_and_prices_out_most_negative() {
        // min -2x1 - x2 with x1 + s = 3
        let mut t = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, 0.0, 1.0]],
            vec![Penalized::real(3.0)],
            vec![-2.0, -1.0, 0.0],
            vec![3],
        )
        .unwrap();

        let outcome = t.repair_costs(DEFAULT_TOLERANCE, &mut NoopObserver).unwrap();
        assert_eq!(
            outcome,
            CostRepair::Performed(Repair {
                row: 1,
                column: 3,
                entering: 0
            })
        );
        assert_eq!(t.num_rows(), 2);
        assert_eq!(t.num_columns(), 4);
        assert_eq!(t.coefficients[1], vec![1.0, 1.0, 0.0, 1.0]);
        assert_eq!(t.coefficients[0], vec![0.0, -1.0, 1.0, -1.0]);
        assert_eq!(t.known_terms[1], Penalized::REPAIR_MARKER);
        assert_eq!(t.known_terms[0], Penalized::new(3.0, -1.0));
        assert_eq!(t.objective, Penalized::new(0.0, 2.0));
        assert_eq!(t.reduced_costs, vec![0.0, 1.0, 0.0, 2.0]);
        assert_eq!(t.basis, vec![3, 1]);
        assert!(t.is_dual_feasible(DEFAULT_TOLERANCE));
        assert!(t.has_identity_basis(DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_most_negative_cost_prefers_first_on_ties() {
        let t = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, 1.0, 1.0]],
            vec![Penalized::real(1.0)],
            vec![-1.0, -3.0, -3.0],
            vec![0],
        )
        .unwrap();
        assert_eq!(t.most_negative_cost(DEFAULT_TOLERANCE), Some(1));
    }
}
