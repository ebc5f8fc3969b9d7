//! Text input, tableau rendering and snapshot output for `dualplex-solver`.

pub mod lexer;
pub mod parser;
pub mod render;
pub mod snapshot;

pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use render::{format_penalized, format_real, render_tableau};
pub use snapshot::{SnapshotError, SnapshotMode, SnapshotWriter};
