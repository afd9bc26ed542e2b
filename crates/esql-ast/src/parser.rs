//! Pest-based parser for ES|QL

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::ast::{Ast, Location};
use crate::builder::AstBuilder;
use crate::config::ParseOptions;
use crate::cst::{walk, TreeEvent, TreeListener};
use crate::position::{location_of, text_of};

#[derive(Parser)]
#[grammar = "esql.pest"]
pub struct EsqlParser;

/// Failure of the grammar itself. Malformed queries never produce this; they
/// come back as a partial AST plus [`SyntaxError`]s.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Pest error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
}

/// Recovery point found in the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxError {
    pub message: String,
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub ast: Ast,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    /// SHA-256 of the AST's JSON form. Equal statements give equal fingerprints.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(&self.ast)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Parse ES|QL source text into an AST
pub fn parse(source: &str) -> Result<ParseResult, ParseError> {
    parse_with_options(source, &ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    let mut pairs = EsqlParser::parse(Rule::single_statement, source)?;
    let statement = pairs
        .next()
        .ok_or_else(|| ParseError::Syntax("Empty parse tree".to_string()))?;

    let mut builder = AstBuilder::new();
    let mut collector = ErrorCollector::new(options);
    {
        let mut listeners = Fanout {
            builder: &mut builder,
            collector: &mut collector,
        };
        walk(&mut listeners, &statement);
    }

    let result = ParseResult {
        ast: builder.into_ast(),
        errors: collector.errors,
    };
    debug!(
        commands = result.ast.len(),
        errors = result.errors.len(),
        "parsed ES|QL statement"
    );
    Ok(result)
}

/// Both listeners see the same event sequence from a single walk.
struct Fanout<'a> {
    builder: &'a mut AstBuilder,
    collector: &'a mut ErrorCollector,
}

impl<'i> TreeListener<'i> for Fanout<'_> {
    fn on_event(&mut self, event: TreeEvent<'_, 'i>) {
        self.builder.on_event(event);
        self.collector.on_event(event);
    }
}

struct ErrorCollector {
    enabled: bool,
    limit: usize,
    errors: Vec<SyntaxError>,
}

impl ErrorCollector {
    fn new(options: &ParseOptions) -> Self {
        Self {
            enabled: options.collect_errors,
            limit: options.max_errors,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, pair: &Pair<'_, Rule>) {
        if !self.enabled || self.errors.len() >= self.limit {
            return;
        }
        let location = location_of(pair);
        let message = match pair.as_rule() {
            Rule::missing_token => format!("Missing token at position {}", location.min),
            _ => format!("Unexpected input '{}'", pair.as_str()),
        };
        self.errors.push(SyntaxError {
            message,
            text: text_of(pair),
            location,
        });
    }
}

impl<'i> TreeListener<'i> for ErrorCollector {
    fn on_event(&mut self, event: TreeEvent<'_, 'i>) {
        if let TreeEvent::Error(pair) = event {
            self.record(pair);
        }
    }
}
