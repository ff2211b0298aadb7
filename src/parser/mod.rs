//! Parser for the textual constraint syntax

mod grammar;
pub mod lexer;

pub use grammar::parse_constraint;
