mod error;
mod numeric;
mod observer;
mod penalized;
mod pivot;
mod problem;
mod rank;
mod restore;
mod simplex;
mod solution;
mod tableau;

pub use error::{InputError, SolveError};
pub use numeric::{DEFAULT_TOLERANCE, is_above_zero, is_below_zero, is_zero};
pub use observer::{NoopObserver, Observer, Stage};
pub use penalized::Penalized;
pub use problem::{Column, Problem};
pub use rank::dependent_rows;
pub use restore::{BasisCompletion, CostRepair, Repair};
pub use simplex::Solver;
pub use solution::{Solution, Status};
pub use tableau::Tableau;
