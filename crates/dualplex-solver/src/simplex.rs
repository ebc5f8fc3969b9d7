use std::cmp::Ordering;

use log::{debug, info, trace};

use crate::error::SolveError;
use crate::numeric::{DEFAULT_TOLERANCE, is_above_zero, is_below_zero, is_zero};
use crate::observer::{NoopObserver, Observer, PivotCounter, Stage};
use crate::problem::Problem;
use crate::restore::{BasisCompletion, CostRepair, Repair};
use crate::solution::{Solution, Status};
use crate::tableau::Tableau;

/// Dual simplex solver for tableaux in equation form
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Build the tableau for `problem` and remove dependent rows.
    pub fn construct(&self, problem: &Problem) -> Result<Tableau, SolveError> {
        self.construct_observed(problem, &mut NoopObserver)
    }

    /// Like [`Solver::construct`], reporting [`Stage::Read`] and, when rows
    /// were dropped, [`Stage::RankReduced`].
    pub fn construct_observed<O: Observer + ?Sized>(
        &self,
        problem: &Problem,
        observer: &mut O,
    ) -> Result<Tableau, SolveError> {
        let mut tableau = Tableau::build(problem)?;
        observer.on_stage(&Stage::Read, &tableau);

        let removed = tableau.reduce_rank(self.tolerance);
        if !removed.is_empty() {
            observer.on_stage(&Stage::RankReduced { removed }, &tableau);
        }
        tableau.check_rank()?;
        Ok(tableau)
    }

    /// Construct and solve in one go.
    pub fn solve_problem(&self, problem: &Problem) -> Result<Solution, SolveError> {
        let tableau = self.construct(problem)?;
        self.solve(tableau)
    }

    /// Run the dual simplex method on `tableau`.
    pub fn solve(&self, tableau: Tableau) -> Result<Solution, SolveError> {
        self.solve_observed(tableau, &mut NoopObserver)
    }

    /// Run the dual simplex method, reporting every pivot and stage to
    /// `observer`. A malformed tableau is rejected before any pivot.
    pub fn solve_observed<O: Observer + ?Sized>(
        &self,
        tableau: Tableau,
        observer: &mut O,
    ) -> Result<Solution, SolveError> {
        tableau.check_shape()?;
        tableau.check_rank()?;
        let mut tableau = tableau;
        let mut counter = PivotCounter::new(observer);

        let status = self.run(&mut tableau, &mut counter)?;
        let pivots = counter.pivots;
        info!("{} after {} pivots", status, pivots);
        counter.on_stage(&Stage::Solved(status), &tableau);

        Ok(match status {
            Status::Optimal => Solution::optimal(tableau, pivots),
            Status::PrimalInfeasible => Solution::infeasible(tableau, pivots),
            Status::PrimalUnbounded => Solution::unbounded(tableau, pivots),
        })
    }

    fn run<O: Observer + ?Sized>(&self, tableau: &mut Tableau, observer: &mut O) -> Result<Status, SolveError> {
        match tableau.complete_basis(self.tolerance, observer)? {
            BasisCompletion::AlreadyComplete => {}
            BasisCompletion::Completed { pivots } => {
                debug!("basis completed with {} pivots", pivots);
                observer.on_stage(&Stage::BasisCompleted, tableau);
            }
            BasisCompletion::Inconsistent { row } => {
                debug!("row {} reads 0 = {}", row, tableau.known_terms[row]);
                return Ok(Status::PrimalInfeasible);
            }
        }

        // Single repair, a second artificial row is never attempted
        let repair = match tableau.repair_costs(self.tolerance, observer)? {
            CostRepair::NotNeeded => None,
            CostRepair::Performed(repair) => {
                observer.on_stage(
                    &Stage::CostsRepaired {
                        row: repair.row,
                        column: repair.column,
                    },
                    tableau,
                );
                Some(repair)
            }
        };

        while let Some(row) = self.select_row(tableau) {
            let Some(column) = self.select_column(tableau, row) else {
                debug!("no negative coefficient in row {}, dual unbounded", row);
                return Ok(Status::PrimalInfeasible);
            };
            debug!(
                "pivot ({}, {}): x{} leaves with {}, x{} enters",
                row,
                column,
                tableau.basis[row],
                tableau.known_terms[row],
                column + 1
            );
            tableau.pivot(row, column)?;
            observer.on_pivot(row, column, tableau);
        }

        if let Some(repair) = repair {
            if self.artificial_unbounded(tableau, &repair) {
                return Ok(Status::PrimalUnbounded);
            }
        }

        if is_zero(tableau.objective.penalty, self.tolerance) {
            Ok(Status::Optimal)
        } else {
            Ok(Status::PrimalInfeasible)
        }
    }

    /// Leaving row: the most negative known term, smallest basic variable
    /// index on ties (Bland). Rows without a basic variable sort first.
    fn select_row(&self, tableau: &Tableau) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, term) in tableau.known_terms.iter().enumerate() {
            if !term.is_negative(self.tolerance) {
                continue;
            }
            best = match best {
                None => Some(i),
                Some(b) => match term.compare(&tableau.known_terms[b], self.tolerance) {
                    Ordering::Less => Some(i),
                    Ordering::Equal if tableau.basis[i] < tableau.basis[b] => Some(i),
                    _ => Some(b),
                },
            };
        }
        best
    }

    /// Entering column: dual ratio test over the negative entries of `row`.
    fn select_column(&self, tableau: &Tableau, row: usize) -> Option<usize> {
        let mut min_ratio = f64::INFINITY;
        let mut min_col = None;

        for (j, &a) in tableau.coefficients[row].iter().enumerate() {
            if is_below_zero(a, self.tolerance) {
                let ratio = tableau.reduced_costs[j] / a.abs();
                trace!("row {} column {}: ratio {}", row, j, ratio);
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_col = Some(j);
                }
            }
        }

        min_col
    }

    /// The artificial constraint no longer carries `M` and the artificial
    /// variable is out of the basis with a positive cost.
    fn artificial_unbounded(&self, tableau: &Tableau, repair: &Repair) -> bool {
        tableau.known_terms[repair.row].penalty == 0.0
            && !tableau.is_basic(repair.column)
            && is_above_zero(tableau.reduced_costs[repair.column], self.tolerance)
    }
}
