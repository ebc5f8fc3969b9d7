use log::debug;

use crate::error::{InputError, SolveError};
use crate::numeric::{is_below_zero, is_zero};
use crate::penalized::Penalized;
use crate::problem::Problem;

/// The full state of one dual simplex session.
///
/// Row `i` reads `sum_j coefficients[i][j] * x_j = known_terms[i]` and the
/// basic variable of that row is `x_{basis[i]}` (1-based, `0` when the row has
/// none yet). The objective is stored negated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    pub objective: Penalized,
    pub coefficients: Vec<Vec<f64>>,
    pub known_terms: Vec<Penalized>,
    pub reduced_costs: Vec<f64>,
    pub basis: Vec<usize>,
}

impl Tableau {
    /// Build a tableau from decoded input and drop linearly dependent rows.
    pub fn construct(problem: &Problem, tolerance: f64) -> Result<Tableau, SolveError> {
        let mut tableau = Self::build(problem)?;
        tableau.reduce_rank(tolerance);
        tableau.check_rank()?;
        Ok(tableau)
    }

    /// Build a tableau from decoded input without rank reduction.
    ///
    /// Original columns come first, then one column per nonzero slack marker
    /// in row order. A surplus row is negated so its surplus column reads `+1`.
    pub fn build(problem: &Problem) -> Result<Tableau, InputError> {
        validate(problem)?;

        let m = problem.rows;
        let n = problem.num_columns();

        let mut coefficients = vec![vec![0.0; n]; m];
        let mut reduced_costs = vec![0.0; n];
        let mut known_terms: Vec<Penalized> = problem.known_terms.iter().map(|&b| b.into()).collect();
        let mut basis = vec![0; m];

        for (j, column) in problem.columns.iter().enumerate() {
            reduced_costs[j] = column.cost;
            for &(row, value) in &column.entries {
                coefficients[row][j] = value;
            }
        }

        let mut slack_col = problem.vars;
        for (i, &marker) in problem.slack_markers.iter().enumerate() {
            if marker == 0 {
                continue;
            }
            coefficients[i][slack_col] = f64::from(marker);
            if marker < 0 {
                for a in coefficients[i].iter_mut() {
                    *a = -*a;
                }
                known_terms[i] = -known_terms[i];
            }
            basis[i] = slack_col + 1;
            slack_col += 1;
        }

        // A free unit column with zero cost is already basic in its row
        for (j, column) in problem.columns.iter().enumerate() {
            if column.cost != 0.0 {
                continue;
            }
            let mut nonzero = (0..m).filter(|&i| coefficients[i][j] != 0.0);
            if let (Some(row), None) = (nonzero.next(), nonzero.next()) {
                if coefficients[row][j] == 1.0 {
                    basis[row] = j + 1;
                }
            }
        }

        debug!(
            "built tableau: {} rows, {} columns ({} slack), {} rows without basic variable",
            m,
            n,
            problem.num_slacks(),
            basis.iter().filter(|&&b| b == 0).count()
        );

        Ok(Tableau {
            objective: Penalized::ZERO,
            coefficients,
            known_terms,
            reduced_costs,
            basis,
        })
    }

    /// Assemble a tableau from raw parts, checking only the dimensions.
    pub fn from_parts(
        objective: Penalized,
        coefficients: Vec<Vec<f64>>,
        known_terms: Vec<Penalized>,
        reduced_costs: Vec<f64>,
        basis: Vec<usize>,
    ) -> Result<Tableau, InputError> {
        let tableau = Tableau {
            objective,
            coefficients,
            known_terms,
            reduced_costs,
            basis,
        };
        tableau.check_shape()?;
        Ok(tableau)
    }

    /// Every row and the basis agree with the known terms and reduced costs,
    /// and every assigned basic variable is in range.
    pub fn check_shape(&self) -> Result<(), InputError> {
        let (m, n) = (self.num_rows(), self.num_columns());
        if self.coefficients.len() != m {
            return Err(InputError::LengthMismatch {
                what: "coefficient rows",
                expected: m,
                found: self.coefficients.len(),
            });
        }
        if let Some(row) = self.coefficients.iter().find(|row| row.len() != n) {
            return Err(InputError::LengthMismatch {
                what: "coefficients per row",
                expected: n,
                found: row.len(),
            });
        }
        if self.basis.len() != m {
            return Err(InputError::LengthMismatch {
                what: "basis entries",
                expected: m,
                found: self.basis.len(),
            });
        }
        if let Some((row, &index)) = self.basis.iter().enumerate().find(|&(_, &b)| b > n) {
            return Err(InputError::BasisOutOfRange { row, index, columns: n });
        }
        Ok(())
    }

    /// Number of equations
    pub fn num_rows(&self) -> usize {
        self.known_terms.len()
    }

    /// Number of variables
    pub fn num_columns(&self) -> usize {
        self.reduced_costs.len()
    }

    /// Row in which 0-based `column` is basic, if any
    pub fn basic_row(&self, column: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == column + 1)
    }

    pub fn is_basic(&self, column: usize) -> bool {
        self.basic_row(column).is_some()
    }

    /// Shapes agree and every assigned basic variable is in range.
    pub fn is_valid(&self) -> bool {
        self.check_shape().is_ok()
    }

    /// Every row has a basic variable, no variable is basic twice.
    pub fn has_complete_basis(&self) -> bool {
        if !self.is_valid() {
            return false;
        }
        let mut seen = vec![false; self.num_columns()];
        for &b in &self.basis {
            if b == 0 || seen[b - 1] {
                return false;
            }
            seen[b - 1] = true;
        }
        true
    }

    /// Complete basis and no reduced cost below zero.
    pub fn is_dual_feasible(&self, tolerance: f64) -> bool {
        self.has_complete_basis() && !self.reduced_costs.iter().any(|&c| is_below_zero(c, tolerance))
    }

    /// The basic columns form an identity sub-matrix.
    pub fn has_identity_basis(&self, tolerance: f64) -> bool {
        if !self.has_complete_basis() {
            return false;
        }
        self.basis.iter().enumerate().all(|(i, &b)| {
            let col = b - 1;
            self.coefficients.iter().enumerate().all(|(k, row)| {
                if k == i {
                    is_zero(row[col] - 1.0, tolerance)
                } else {
                    is_zero(row[col], tolerance)
                }
            })
        })
    }

    /// Primal value of each of the first `vars` columns
    pub fn values(&self, vars: usize) -> Vec<f64> {
        let mut values = vec![0.0; vars.min(self.num_columns())];
        for (i, &b) in self.basis.iter().enumerate() {
            if b != 0 && b <= values.len() {
                values[b - 1] = self.known_terms[i].real;
            }
        }
        values
    }

    pub(crate) fn check_rank(&self) -> Result<(), InputError> {
        if self.num_rows() > self.num_columns() {
            return Err(InputError::TooManyEquations {
                rows: self.num_rows(),
                columns: self.num_columns(),
            });
        }
        Ok(())
    }
}

fn validate(problem: &Problem) -> Result<(), InputError> {
    let m = problem.rows;
    if problem.known_terms.len() != m {
        return Err(InputError::LengthMismatch {
            what: "known terms",
            expected: m,
            found: problem.known_terms.len(),
        });
    }
    if problem.slack_markers.len() != m {
        return Err(InputError::LengthMismatch {
            what: "slack markers",
            expected: m,
            found: problem.slack_markers.len(),
        });
    }
    if problem.columns.len() != problem.vars {
        return Err(InputError::LengthMismatch {
            what: "columns",
            expected: problem.vars,
            found: problem.columns.len(),
        });
    }
    if let Some(i) = problem.known_terms.iter().position(|b| !b.is_finite()) {
        return Err(InputError::NonFinite(format!("known term of row {}", i)));
    }
    for (row, &value) in problem.slack_markers.iter().enumerate() {
        if !matches!(value, -1..=1) {
            return Err(InputError::InvalidSlackMarker { row, value });
        }
    }
    for (column, col) in problem.columns.iter().enumerate() {
        if !col.cost.is_finite() {
            return Err(InputError::NonFinite(format!("cost of column {}", column)));
        }
        let mut seen = vec![false; m];
        for &(row, value) in &col.entries {
            if row >= m {
                return Err(InputError::RowOutOfRange { column, row, rows: m });
            }
            if seen[row] {
                return Err(InputError::DuplicateEntry { column, row });
            }
            seen[row] = true;
            if !value.is_finite() {
                return Err(InputError::NonFinite(format!("column {} at row {}", column, row)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::DEFAULT_TOLERANCE;

    #[test]
    fn test_build_places_slacks_and_negates_surplus_rows() {
        // x + y <= 4 ; x + 2y >= 3
        let mut problem = Problem::new(2);
        problem.set_known_terms(vec![4.0, 3.0]);
        problem.set_slack_markers(vec![1, -1]);
        problem.add_column(1.0, vec![(0, 1.0), (1, 1.0)]);
        problem.add_column(1.0, vec![(0, 1.0), (1, 2.0)]);

        let tableau = Tableau::build(&problem).unwrap();
        assert_eq!(tableau.coefficients[0], vec![1.0, 1.0, 1.0, 0.0]);
        assert_eq!(tableau.coefficients[1], vec![-1.0, -2.0, 0.0, 1.0]);
        assert_eq!(tableau.known_terms, vec![Penalized::real(4.0), Penalized::real(-3.0)]);
        assert_eq!(tableau.reduced_costs, vec![1.0, 1.0, 0.0, 0.0]);
        assert_eq!(tableau.basis, vec![3, 4]);
        assert!(tableau.has_identity_basis(DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_zero_cost_unit_column_is_basic() {
        let mut problem = Problem::new(2);
        problem.set_known_terms(vec![1.0, 2.0]);
        problem.add_column(0.0, vec![(1, 1.0)]);
        problem.add_column(5.0, vec![(0, 1.0)]);
        problem.add_column(0.0, vec![(0, 2.0)]);

        let tableau = Tableau::build(&problem).unwrap();
        assert_eq!(tableau.basis, vec![0, 1]);
        assert!(!tableau.has_complete_basis());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut problem = Problem::new(2);
        problem.set_known_terms(vec![1.0]);
        let err = Tableau::build(&problem).unwrap_err();
        assert_eq!(
            err,
            InputError::LengthMismatch {
                what: "known terms",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_malformed_columns_are_rejected() {
        let mut problem = Problem::new(1);
        problem.add_column(1.0, vec![(1, 1.0)]);
        assert!(matches!(
            Tableau::build(&problem),
            Err(InputError::RowOutOfRange { column: 0, row: 1, rows: 1 })
        ));

        let mut problem = Problem::new(1);
        problem.add_column(1.0, vec![(0, 1.0), (0, 2.0)]);
        assert!(matches!(
            Tableau::build(&problem),
            Err(InputError::DuplicateEntry { column: 0, row: 0 })
        ));

        let mut problem = Problem::new(1);
        problem.set_slack_markers(vec![2]);
        assert!(matches!(
            Tableau::build(&problem),
            Err(InputError::InvalidSlackMarker { row: 0, value: 2 })
        ));

        let mut problem = Problem::new(1);
        problem.add_column(f64::NAN, vec![(0, 1.0)]);
        assert!(matches!(Tableau::build(&problem), Err(InputError::NonFinite(_))));
    }

    #[test]
    fn test_too_many_equations_after_reduction() {
        let mut problem = Problem::new(2);
        problem.set_known_terms(vec![1.0, 2.0]);
        problem.add_column(1.0, vec![(0, 1.0), (1, 1.0)]);

        let err = Tableau::construct(&problem, DEFAULT_TOLERANCE).unwrap_err();
        assert_eq!(
            err,
            SolveError::InvalidInput(InputError::TooManyEquations { rows: 2, columns: 1 })
        );
    }

    #[test]
    fn test_construct_drops_dependent_rows_first() {
        // second row is twice the first, so only one equation survives
        let mut problem = Problem::new(2);
        problem.set_known_terms(vec![1.0, 2.0]);
        problem.add_column(1.0, vec![(0, 1.0), (1, 2.0)]);

        let tableau = Tableau::construct(&problem, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(tableau.num_rows(), 1);
        assert_eq!(tableau.known_terms, vec![Penalized::real(1.0)]);
    }

    #[test]
    fn test_from_parts_checks_shape() {
        let err = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, 0.0], vec![0.0]],
            vec![Penalized::real(1.0), Penalized::real(1.0)],
            vec![0.0, 0.0],
            vec![1, 2],
        )
        .unwrap_err();
        assert!(matches!(err, InputError::LengthMismatch { what: "coefficients per row", .. }));
    }

    #[test]
    fn test_values_reads_basic_rows() {
        let tableau = Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![0.0, 1.0, 1.0], vec![1.0, 0.0, 2.0]],
            vec![Penalized::real(4.0), Penalized::real(7.0)],
            vec![0.0, 0.0, 1.0],
            vec![2, 1],
        )
        .unwrap();
        assert_eq!(tableau.values(2), vec![7.0, 4.0]);
        assert_eq!(tableau.values(3), vec![7.0, 4.0, 0.0]);
        assert!(tableau.is_dual_feasible(DEFAULT_TOLERANCE));
    }
}
