//! Plain text dump of a tableau.

use dualplex_solver::{Penalized, Tableau};

/// Decimal places in rendered cells
pub const PRECISION: usize = 2;
/// Minimum width of a rendered cell
pub const CELL_WIDTH: usize = 20;

fn pad(mut cell: String) -> String {
    if cell.len() < CELL_WIDTH {
        cell.push_str(&" ".repeat(CELL_WIDTH - cell.len()));
    }
    cell
}

pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        pad("0".to_string())
    } else {
        pad(format!("{:.*}", PRECISION, value))
    }
}

/// `r`, `pM`, `r + pM` or `r - pM`
pub fn format_penalized(value: Penalized) -> String {
    let real = if value.real == 0.0 {
        "0".to_string()
    } else {
        format!("{:.*}", PRECISION, value.real)
    };

    if value.penalty == 0.0 {
        return pad(real);
    }
    if value.real == 0.0 {
        return pad(format!("{:.*}M", PRECISION, value.penalty));
    }

    let sign = if value.penalty > 0.0 { '+' } else { '-' };
    pad(format!("{} {} {:.*}M", real, sign, PRECISION, value.penalty.abs()))
}

/// Render `tableau` under `caption`, followed by `description` and the
/// matrix: the `c` row holds the objective and the reduced costs, every
/// other row its basic variable, known term and coefficients.
pub fn render_tableau(tableau: &Tableau, caption: &str, description: &str) -> String {
    let m = tableau.num_rows();
    let n = tableau.num_columns();
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", caption));
    out.push_str(&format!("{}.\n\n", description));
    out.push_str(&format!("SIZE: {} x {}\n\n", m + 1, n + 1));

    out.push_str("          d");
    out.push_str(&" ".repeat(CELL_WIDTH - 1));
    for j in 1..=n {
        out.push_str(&format!("    x{:<5}", j));
        out.push_str(&" ".repeat(CELL_WIDTH - 6));
    }

    out.push_str("\nc     ");
    out.push_str(&format!("    {}", format_penalized(tableau.objective)));
    for &cost in &tableau.reduced_costs {
        out.push_str(&format!("    {}", format_real(cost)));
    }

    for (i, row) in tableau.coefficients.iter().enumerate() {
        match tableau.basis[i] {
            0 => out.push_str("\n?     "),
            k => out.push_str(&format!("\nx{:<5}", k)),
        }
        out.push_str(&format!("    {}", format_penalized(tableau.known_terms[i])));
        for &a in row {
            out.push_str(&format!("    {}", format_real(a)));
        }
    }
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tableau {
        Tableau::from_parts(
            Penalized::ZERO,
            vec![vec![1.0, -0.5], vec![0.0, 2.0]],
            vec![Penalized::new(3.0, -1.0), Penalized::real(4.0)],
            vec![0.0, 2.0],
            vec![1, 0],
        )
        .unwrap()
    }

    #[test]
    fn test_format_penalized() {
        assert_eq!(format_penalized(Penalized::ZERO).trim_end(), "0");
        assert_eq!(format_penalized(Penalized::new(0.0, 1.0)).trim_end(), "1.00M");
        assert_eq!(format_penalized(Penalized::new(-2.5, -1.0)).trim_end(), "-2.50 - 1.00M");
        assert_eq!(format_penalized(Penalized::new(1.0, 2.0)).trim_end(), "1.00 + 2.00M");
        assert_eq!(format_penalized(Penalized::real(-0.126)).trim_end(), "-0.13");
    }

    #[test]
    fn test_cells_are_padded() {
        assert_eq!(format_real(0.0).len(), CELL_WIDTH);
        assert_eq!(format_real(-0.0).trim_end(), "0");
        assert_eq!(format_real(1.0e30).trim_end().len(), format_real(1.0e30).len());
    }

    #[test]
    fn test_render_tableau() {
        let text = render_tableau(&sample(), "FEASIBLE TABLEAU", "READ: Tableau represented as read");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "FEASIBLE TABLEAU");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "READ: Tableau represented as read.");
        assert_eq!(lines[4], "SIZE: 3 x 3");
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), vec!["d", "x1", "x2"]);
        assert_eq!(lines[7].split_whitespace().collect::<Vec<_>>(), vec!["c", "0", "0", "2.00"]);
        assert!(lines[8].starts_with("x1    "));
        assert!(lines[8].contains("3.00 - 1.00M"));
        assert!(lines[8].contains("-0.50"));
        assert!(lines[9].starts_with("?     "));
        assert_eq!(lines.len(), 10);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_columns_line_up() {
        let text = render_tableau(&sample(), "caption", "description");
        let lines: Vec<&str> = text.lines().collect();
        let width = lines[6].len();
        for line in &lines[7..] {
            assert_eq!(line.len(), width);
        }
    }
}
