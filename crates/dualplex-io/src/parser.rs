//! Reader for the whitespace separated tableau format.
//!
//! ```text
//! n m                     variables, equations
//! b_1 .. b_m              known terms
//! s_1 .. s_m              slack markers (-1, 0 or 1)
//! c_j k_j r_1 a_1 ..      per variable: cost, nonzero count, (row, value) pairs
//! ```
//!
//! Rows are 1-based in the file and 0-based in the resulting [`Problem`].

use dualplex_solver::Problem;
use thiserror::Error;

use crate::lexer::{Lexer, Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found '{found}' at position {span:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file, expected {0}")]
    UnexpectedEof(String),
    #[error("Invalid count '{text}' at position {span:?}")]
    InvalidCount { text: String, span: Span },
    #[error("Invalid slack marker '{text}' at position {span:?} (expected -1, 0 or 1)")]
    InvalidSlackMarker { text: String, span: Span },
    #[error("Row {row} out of range 1..={rows} at position {span:?}")]
    RowOutOfRange { row: usize, rows: usize, span: Span },
    #[error("Unexpected trailing input '{found}' at position {span:?}")]
    TrailingInput { found: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidCount { span, .. }
            | ParseError::InvalidSlackMarker { span, .. }
            | ParseError::RowOutOfRange { span, .. }
            | ParseError::TrailingInput { span, .. } => Some(*span),
            ParseError::UnexpectedEof(_) => None,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<Problem, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_problem()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn expect_number(&mut self, expected: &str) -> Result<(f64, Token), ParseError> {
        let token = self.current().cloned();
        match token {
            Some(t) if t.kind == TokenKind::Number => {
                self.pos += 1;
                let value = t.text.parse::<f64>().map_err(|_| ParseError::UnexpectedToken {
                    expected: expected.to_string(),
                    found: t.text.clone(),
                    span: t.span,
                })?;
                Ok((value, t))
            }
            Some(t) if t.kind == TokenKind::Word => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: t.text,
                span: t.span,
            }),
            _ => Err(ParseError::UnexpectedEof(expected.to_string())),
        }
    }

    /// A non-negative integer, written either as `3` or `3.0`
    fn expect_index(&mut self, expected: &str) -> Result<(usize, Token), ParseError> {
        let (value, token) = self.expect_number(expected)?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(ParseError::InvalidCount {
                text: token.text,
                span: token.span,
            });
        }
        Ok((value as usize, token))
    }

    /// A count of items that follow. Each item takes at least one token, so a
    /// count above the number of tokens left is rejected before allocating.
    fn expect_count(&mut self, expected: &str) -> Result<usize, ParseError> {
        let (count, token) = self.expect_index(expected)?;
        if count > self.tokens.len().saturating_sub(self.pos) {
            return Err(ParseError::InvalidCount {
                text: token.text,
                span: token.span,
            });
        }
        Ok(count)
    }

    fn expect_marker(&mut self) -> Result<i8, ParseError> {
        let (value, token) = self.expect_number("slack marker")?;
        if value == -1.0 {
            Ok(-1)
        } else if value == 0.0 {
            Ok(0)
        } else if value == 1.0 {
            Ok(1)
        } else {
            Err(ParseError::InvalidSlackMarker {
                text: token.text,
                span: token.span,
            })
        }
    }

    fn parse_problem(&mut self) -> Result<Problem, ParseError> {
        let vars = self.expect_count("number of variables")?;
        let rows = self.expect_count("number of equations")?;

        let mut problem = Problem::new(rows);

        let mut known_terms = Vec::with_capacity(rows);
        for _ in 0..rows {
            known_terms.push(self.expect_number("known term")?.0);
        }
        problem.set_known_terms(known_terms);

        let mut markers = Vec::with_capacity(rows);
        for _ in 0..rows {
            markers.push(self.expect_marker()?);
        }
        problem.set_slack_markers(markers);

        for _ in 0..vars {
            let (cost, _) = self.expect_number("variable cost")?;
            let nonzeros = self.expect_count("nonzero count")?;
            let mut entries = Vec::with_capacity(nonzeros);
            for _ in 0..nonzeros {
                let (row, token) = self.expect_index("row index")?;
                if row == 0 || row > rows {
                    return Err(ParseError::RowOutOfRange {
                        row,
                        rows,
                        span: token.span,
                    });
                }
                let (value, _) = self.expect_number("coefficient")?;
                entries.push((row - 1, value));
            }
            problem.add_column(cost, entries);
        }

        if self.peek_kind() != TokenKind::Eof {
            if let Some(t) = self.current() {
                return Err(ParseError::TrailingInput {
                    found: t.text.clone(),
                    span: t.span,
                });
            }
        }

        Ok(problem)
    }
}
