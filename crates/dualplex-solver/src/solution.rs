use std::fmt;

use crate::tableau::Tableau;

/// The result of a solve session
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Terminal status
    pub status: Status,
    /// Optimal objective value (`+inf` when infeasible, `-inf` when unbounded)
    pub objective_value: f64,
    /// Value of every tableau column at the optimum, empty otherwise
    pub values: Vec<f64>,
    /// Final basis, 1-based
    pub basis: Vec<usize>,
    /// Number of pivots performed in this session
    pub pivots: usize,
    /// The tableau in its terminal state
    pub tableau: Tableau,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An optimal solution was found
    Optimal,
    /// No point satisfies the constraints (the dual is unbounded)
    PrimalInfeasible,
    /// The objective decreases without limit
    PrimalUnbounded,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Optimal => write!(f, "OPTIMAL"),
            Status::PrimalInfeasible => write!(f, "PRIMAL INFEASIBLE"),
            Status::PrimalUnbounded => write!(f, "PRIMAL UNBOUNDED"),
        }
    }
}

impl Solution {
    pub fn optimal(tableau: Tableau, pivots: usize) -> Self {
        Self {
            status: Status::Optimal,
            // the tableau stores the negated objective
            objective_value: 0.0 - tableau.objective.real,
            values: tableau.values(tableau.num_columns()),
            basis: tableau.basis.clone(),
            pivots,
            tableau,
        }
    }

    pub fn infeasible(tableau: Tableau, pivots: usize) -> Self {
        Self {
            status: Status::PrimalInfeasible,
            objective_value: f64::INFINITY,
            values: Vec::new(),
            basis: tableau.basis.clone(),
            pivots,
            tableau,
        }
    }

    pub fn unbounded(tableau: Tableau, pivots: usize) -> Self {
        Self {
            status: Status::PrimalUnbounded,
            objective_value: f64::NEG_INFINITY,
            values: Vec::new(),
            basis: tableau.basis.clone(),
            pivots,
            tableau,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == Status::Optimal
    }
}
