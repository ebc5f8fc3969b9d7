//! Numbered tableau dumps written while a solve is running.

use std::fs;
use std::path::{Path, PathBuf};

use dualplex_solver::{Observer, Stage, Status, Tableau};
use log::{debug, warn};
use thiserror::Error;

use crate::render::render_tableau;

/// Prefix of every snapshot file, followed by a 1-based counter
pub const FILE_PREFIX: &str = "tableau_";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Cannot write snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which events produce a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Stage boundaries only
    Stages,
    /// Stage boundaries and every pivot
    Pivots,
}

/// [`Observer`] that dumps the tableau into `<out>/<stem>/tableau_<k>`.
///
/// The first write failure stops further output and is returned by
/// [`SnapshotWriter::finish`].
pub struct SnapshotWriter {
    dir: PathBuf,
    mode: SnapshotMode,
    tolerance: f64,
    counter: usize,
    last_basis: Vec<usize>,
    error: Option<SnapshotError>,
}

impl SnapshotWriter {
    /// Create the snapshot directory for `input` below `out_dir`.
    pub fn create(out_dir: &Path, input: &Path, mode: SnapshotMode, tolerance: f64) -> Result<Self, SnapshotError> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tableau".to_string());
        let dir = out_dir.join(stem);
        fs::create_dir_all(&dir).map_err(|source| SnapshotError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!("writing snapshots to {}", dir.display());

        Ok(Self {
            dir,
            mode,
            tolerance,
            counter: 0,
            last_basis: Vec::new(),
            error: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written so far
    pub fn written(&self) -> usize {
        self.counter
    }

    /// Consume the writer, returning the file count or the first failure.
    pub fn finish(self) -> Result<usize, SnapshotError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.counter),
        }
    }

    /// `checked` dumps are captioned by dual feasibility, unchecked ones are
    /// always `INFEASIBLE TABLEAU`.
    fn write(&mut self, tableau: &Tableau, description: &str, checked: bool) {
        self.last_basis = tableau.basis.clone();
        if self.error.is_some() {
            return;
        }

        let caption = if checked && tableau.is_dual_feasible(self.tolerance) {
            "FEASIBLE TABLEAU"
        } else {
            "INFEASIBLE TABLEAU"
        };
        let path = self.dir.join(format!("{}{}", FILE_PREFIX, self.counter + 1));
        let text = render_tableau(tableau, caption, description);

        match fs::write(&path, text) {
            Ok(()) => self.counter += 1,
            Err(source) => {
                warn!("cannot write {}: {}", path.display(), source);
                self.error = Some(SnapshotError::Io { path, source });
            }
        }
    }
}

fn stage_description(stage: &Stage, tableau: &Tableau) -> String {
    match stage {
        Stage::Read => "READ: Tableau represented as read, first row holds the negated objective and the \
                        reduced costs, first column the known terms"
            .to_string(),
        Stage::RankReduced { removed } => {
            let rows: Vec<String> = removed.iter().map(|r| (r + 1).to_string()).collect();
            format!("MAX RANK: Deleted linearly dependent rows {}", rows.join(", "))
        }
        Stage::BasisCompleted => "BASE CREATED: Created basic solution".to_string(),
        Stage::CostsRepaired { column, .. } => format!(
            "COSTS POSITIVE: Added artificial variable x{} so as to make the base dual feasible",
            column + 1
        ),
        Stage::Solved(Status::Optimal) => {
            "SOLUTION: Optimal solution reached (primal solution = dual solution)".to_string()
        }
        Stage::Solved(Status::PrimalInfeasible) => "SOLUTION: Primal infeasible (dual unbounded)".to_string(),
        Stage::Solved(Status::PrimalUnbounded) => format!(
            "SOLUTION: Primal unbounded (artificial variable x{} is not in base)",
            tableau.num_columns()
        ),
    }
}

impl Observer for SnapshotWriter {
    fn on_pivot(&mut self, row: usize, column: usize, tableau: &Tableau) {
        if self.mode != SnapshotMode::Pivots {
            self.last_basis = tableau.basis.clone();
            return;
        }
        let description = match self.last_basis.get(row) {
            Some(&leaving) if leaving != 0 => format!(
                "ITERATION: Pivot in (x{}, x{}) => (x{}, x{})",
                leaving,
                column + 1,
                tableau.basis[row],
                column + 1
            ),
            _ => format!("ITERATION: Pivot in row {} => (x{}, x{})", row + 1, tableau.basis[row], column + 1),
        };
        self.write(tableau, &description, true);
    }

    fn on_stage(&mut self, stage: &Stage, tableau: &Tableau) {
        let description = stage_description(stage, tableau);
        // the as-read tableau is dumped before any check
        self.write(tableau, &description, *stage != Stage::Read);
    }
}
