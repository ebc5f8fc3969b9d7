/// A linear program in equation form, as decoded from input
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Number of equations
    pub rows: usize,
    /// Number of original (decision) variables
    pub vars: usize,
    /// Right-hand side of each equation
    pub known_terms: Vec<f64>,
    /// Per row: `1` appends a slack, `-1` a surplus, `0` nothing
    pub slack_markers: Vec<i8>,
    /// One entry per original variable
    pub columns: Vec<Column>,
}

/// Cost and sparse nonzero entries of one original variable
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    /// Objective coefficient
    pub cost: f64,
    /// `(row, value)` pairs, rows are 0-based
    pub entries: Vec<(usize, f64)>,
}

impl Column {
    pub fn new(cost: f64, entries: Vec<(usize, f64)>) -> Self {
        Self { cost, entries }
    }
}

impl Problem {
    /// A problem with `rows` equations, all known terms zero and no slacks.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            vars: 0,
            known_terms: vec![0.0; rows],
            slack_markers: vec![0; rows],
            columns: Vec::new(),
        }
    }

    pub fn set_known_terms(&mut self, known_terms: Vec<f64>) {
        self.known_terms = known_terms;
    }

    pub fn set_slack_markers(&mut self, slack_markers: Vec<i8>) {
        self.slack_markers = slack_markers;
    }

    /// Append a variable and return its 0-based index.
    pub fn add_column(&mut self, cost: f64, entries: Vec<(usize, f64)>) -> usize {
        self.columns.push(Column::new(cost, entries));
        self.vars = self.columns.len();
        self.vars - 1
    }

    /// Number of slack/surplus columns the tableau will carry
    pub fn num_slacks(&self) -> usize {
        self.slack_markers.iter().filter(|&&s| s != 0).count()
    }

    /// Total tableau width: original variables plus slacks
    pub fn num_columns(&self) -> usize {
        self.vars + self.num_slacks()
    }
}
