//! ES|QL AST - parser, CST walk and AST types

pub mod ast;
pub mod builder;
pub mod config;
pub mod cst;
pub mod factories;
pub mod parser;
pub mod position;
pub mod walkers;

pub use ast::*;
pub use builder::AstBuilder;
pub use config::{ConfigError, ParseOptions};
pub use parser::{parse, parse_with_options, ParseError, ParseResult, SyntaxError};
