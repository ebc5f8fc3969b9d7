use crate::solution::Status;
use crate::tableau::Tableau;

/// Milestones of a solve session reported to an [`Observer`]
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// The tableau as built from input, before rank reduction
    Read,
    /// Linearly dependent rows (indices before deletion) were removed
    RankReduced { removed: Vec<usize> },
    /// Rows without a basic variable received one
    BasisCompleted,
    /// An artificial row and column made every reduced cost non-negative
    CostsRepaired { row: usize, column: usize },
    /// Terminal state reached
    Solved(Status),
}

/// Hook for tracing a solve. Both callbacks default to doing nothing.
pub trait Observer {
    /// Called after every completed pivot.
    fn on_pivot(&mut self, _row: usize, _column: usize, _tableau: &Tableau) {}

    /// Called when the session reaches a [`Stage`].
    fn on_stage(&mut self, _stage: &Stage, _tableau: &Tableau) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Counts pivots on the way to the wrapped observer
pub(crate) struct PivotCounter<'a, O: Observer + ?Sized> {
    inner: &'a mut O,
    pub(crate) pivots: usize,
}

impl<'a, O: Observer + ?Sized> PivotCounter<'a, O> {
    pub(crate) fn new(inner: &'a mut O) -> Self {
        Self { inner, pivots: 0 }
    }
}

impl<O: Observer + ?Sized> Observer for PivotCounter<'_, O> {
    fn on_pivot(&mut self, row: usize, column: usize, tableau: &Tableau) {
        self.pivots += 1;
        self.inner.on_pivot(row, column, tableau);
    }

    fn on_stage(&mut self, stage: &Stage, tableau: &Tableau) {
        self.inner.on_stage(stage, tableau);
    }
}
