use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dualplex_io::{ParseError, SnapshotError, SnapshotMode, SnapshotWriter};
use dualplex_solver::{DEFAULT_TOLERANCE, Problem, Solution, SolveError, Solver};
use log::{LevelFilter, debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "dualplex")]
#[command(about = "Dual simplex solver for linear programs in tableau form", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every problem file found at the given paths
    Solve {
        /// Files or directories; missing paths are looked up in --input-dir,
        /// `*` means every file in it
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Fallback directory for relative input paths
        #[arg(long, default_value = "data/in")]
        input_dir: PathBuf,
        /// Root directory for tableau snapshots
        #[arg(long, default_value = "data/out")]
        out_dir: PathBuf,
        /// Which tableaux to dump
        #[arg(long, value_enum, default_value_t = Snapshots::None)]
        snapshots: Snapshots,
        /// Tolerance for floating point comparisons
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Parse and construct problem files without solving them
    Check {
        /// Files or directories; `*` means every file in --input-dir
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Fallback directory for relative input paths
        #[arg(long, default_value = "data/in")]
        input_dir: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Snapshots {
    None,
    Stages,
    Pivots,
}

impl Snapshots {
    fn mode(self) -> Option<SnapshotMode> {
        match self {
            Snapshots::None => None,
            Snapshots::Stages => Some(SnapshotMode::Stages),
            Snapshots::Pivots => Some(SnapshotMode::Pivots),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pretty,
    Json,
}

#[derive(Error, Debug)]
enum FileError {
    #[error("{0}: no such file or directory")]
    Missing(PathBuf),
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}:{col}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        col: usize,
        #[source]
        source: ParseError,
    },
    #[error("{path}: {source}")]
    Solve {
        path: PathBuf,
        #[source]
        source: SolveError,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

struct Report {
    path: PathBuf,
    vars: usize,
    solution: Solution,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Expand `path` into the regular files to process, sorted by name. A
/// literal `*` stands for the whole input directory.
fn collect_inputs(path: &Path, input_dir: &Path) -> Result<Vec<PathBuf>, FileError> {
    let resolved = if path == Path::new("*") {
        if !input_dir.is_dir() {
            return Err(FileError::Missing(input_dir.to_path_buf()));
        }
        input_dir.to_path_buf()
    } else if path.exists() {
        path.to_path_buf()
    } else {
        let fallback = input_dir.join(path);
        if !fallback.exists() {
            return Err(FileError::Missing(path.to_path_buf()));
        }
        debug!("{} resolved to {}", path.display(), fallback.display());
        fallback
    };

    if !resolved.is_dir() {
        return Ok(vec![resolved]);
    }

    let read_err = |source| FileError::Read {
        path: resolved.clone(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(&resolved).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn load(path: &Path) -> Result<Problem, FileError> {
    let source = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    dualplex_io::Parser::parse(&source).map_err(|err| {
        let offset = err.span().map_or(source.len(), |s| s.start);
        let (line, col) = dualplex_io::Span::new(offset, offset).line_col(&source);
        FileError::Parse {
            path: path.to_path_buf(),
            line,
            col,
            source: err,
        }
    })
}

fn solve_file(path: &Path, solver: &Solver, out_dir: &Path, snapshots: Snapshots) -> Result<Report, FileError> {
    let problem = load(path)?;
    let solve_err = |source| FileError::Solve {
        path: path.to_path_buf(),
        source,
    };

    let solution = match snapshots.mode() {
        None => solver.solve_problem(&problem).map_err(solve_err)?,
        Some(mode) => {
            let mut writer = SnapshotWriter::create(out_dir, path, mode, solver.tolerance())?;
            let tableau = solver.construct_observed(&problem, &mut writer).map_err(solve_err)?;
            let solution = solver.solve_observed(tableau, &mut writer).map_err(solve_err)?;
            let written = writer.finish()?;
            info!("{}: wrote {} snapshots", path.display(), written);
            solution
        }
    };

    Ok(Report {
        path: path.to_path_buf(),
        vars: problem.vars,
        solution,
    })
}

fn print_report(report: &Report, format: Format) {
    match format {
        Format::Json => {
            let value = serde_json::json!({
                "file": report.path.display().to_string(),
                "solution": &report.solution,
            });
            match serde_json::to_string_pretty(&value) {
                Ok(text) => println!("{}", text),
                Err(e) => eprintln!("Error serializing solution: {}", e),
            }
        }
        Format::Pretty => {
            let solution = &report.solution;
            println!("{}", report.path.display());
            println!("  Status: {}", solution.status);
            println!("  Pivots: {}", solution.pivots);
            if solution.is_optimal() {
                println!("  Objective: {}", solution.objective_value);
                for (j, value) in solution.values.iter().take(report.vars).enumerate() {
                    println!("  x{:<5} {:>14.6}", j + 1, value);
                }
            }
        }
    }
}

fn check_file(path: &Path) -> Result<(), FileError> {
    let problem = load(path)?;
    let tableau = Solver::new().construct(&problem).map_err(|source| FileError::Solve {
        path: path.to_path_buf(),
        source,
    })?;
    println!(
        "✓ {} is valid ({} variables, {} equations, tableau {} x {})",
        path.display(),
        problem.vars,
        problem.rows,
        tableau.num_rows(),
        tableau.num_columns()
    );
    Ok(())
}

/// Run `action` on every input under `paths`, reporting failures and
/// carrying on. Returns the number of failures.
fn for_each_input(paths: &[PathBuf], input_dir: &Path, mut action: impl FnMut(&Path) -> Result<(), FileError>) -> usize {
    let mut failures = 0;
    for path in paths {
        let files = match collect_inputs(path, input_dir) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("✗ {}", e);
                failures += 1;
                continue;
            }
        };
        for file in files {
            if let Err(e) = action(&file) {
                eprintln!("✗ {}", e);
                failures += 1;
            }
        }
    }
    failures
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let failures = match cli.command {
        Commands::Solve {
            paths,
            input_dir,
            out_dir,
            snapshots,
            tolerance,
            format,
        } => {
            let solver = Solver::new().with_tolerance(tolerance);
            for_each_input(&paths, &input_dir, |file| {
                let report = solve_file(file, &solver, &out_dir, snapshots)?;
                print_report(&report, format);
                Ok(())
            })
        }
        Commands::Check { paths, input_dir } => for_each_input(&paths, &input_dir, check_file),
    };

    if failures > 0 {
        eprintln!("{} file(s) failed", failures);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualplex_solver::Status;

    const DIET: &str = "2 2\n4 6\n-1 -1\n2 2 1 1 2 1\n3 2 1 1 2 2\n";

    #[test]
    fn test_collect_directory_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), DIET).unwrap();
        fs::write(dir.path().join("a.txt"), DIET).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = collect_inputs(dir.path(), Path::new("unused")).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_collect_falls_back_to_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("diet.txt"), DIET).unwrap();

        let files = collect_inputs(Path::new("diet.txt"), dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("diet.txt")]);

        let err = collect_inputs(Path::new("nothing.txt"), dir.path()).unwrap_err();
        assert!(matches!(err, FileError::Missing(_)));
    }

    #[test]
    fn test_star_expands_to_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), DIET).unwrap();
        fs::write(dir.path().join("a.txt"), DIET).unwrap();

        let files = collect_inputs(Path::new("*"), dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);

        let missing = dir.path().join("absent");
        let err = collect_inputs(Path::new("*"), &missing).unwrap_err();
        assert!(matches!(err, FileError::Missing(p) if p == missing));
    }

    #[test]
    fn test_solve_file_with_snapshots() {
        let input = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let path = input.path().join("diet.txt");
        fs::write(&path, DIET).unwrap();

        let report = solve_file(&path, &Solver::new(), out.path(), Snapshots::Stages).unwrap();
        assert_eq!(report.solution.status, Status::Optimal);
        assert_eq!(report.vars, 2);
        assert!((report.solution.objective_value - 10.0).abs() < 1e-9);
        assert!(out.path().join("diet").join("tableau_1").exists());
    }

    #[test]
    fn test_parse_error_carries_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "1 1\n5 x\n").unwrap();

        match solve_file(&path, &Solver::new(), dir.path(), Snapshots::None) {
            Err(FileError::Parse { line, col, .. }) => assert_eq!((line, col), (2, 3)),
            other => panic!("Expected parse error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "garbage").unwrap();
        fs::write(dir.path().join("b.txt"), DIET).unwrap();

        let mut seen = Vec::new();
        let failures = for_each_input(&[dir.path().to_path_buf()], dir.path(), |file| {
            seen.push(file.to_path_buf());
            load(file).map(|_| ())
        });
        assert_eq!(failures, 1);
        assert_eq!(seen.len(), 2);
    }
}
