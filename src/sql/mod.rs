//! Command language module
//!
//! This module contains the command AST, the command-line parser and the
//! WHERE/SET clause parser.

pub mod ast;
pub mod clause;
pub mod parser;

pub use ast::Command;
pub use clause::{parse_assignment_list, parse_equality, parse_where, SetClause, WhereClause};
pub use parser::parse_command;
