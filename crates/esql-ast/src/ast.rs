//! AST types for ES|QL
//!
//! A statement is a flat list of [`Command`]s, one per pipeline stage. Each
//! command owns an ordered list of [`Expression`] arguments. Every node keeps
//! the raw source slice it was built from and its [`Location`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered command sequence of one statement.
pub type Ast = Vec<Command>;

/// Byte offsets into the statement source. `max` is inclusive; a zero-width
/// node has `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub min: usize,
    pub max: usize,
}

impl Location {
    /// Build from a half-open `[start, end)` byte range.
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            min: start,
            max: end.saturating_sub(1).max(start),
        }
    }

    /// Smallest location covering both `self` and `other`.
    pub fn join(self, other: Location) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, other: &Location) -> bool {
        self.min <= other.min && other.max <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
    pub args: Vec<Expression>,

    /// Only set by `ts`, which exposes its sources both here and in `args`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Literal(Literal),
    Column(Column),
    Function(Function),
    Source(Source),
    Option(CommandOption),
    InlineCast(InlineCast),
    Order(Order),
    Grouping(Grouping),
    Identifier(Identifier),
    List(List),
    TimeInterval(TimeInterval),
    Unknown(Unknown),
}

impl Expression {
    pub fn name(&self) -> &str {
        match self {
            Expression::Literal(node) => &node.name,
            Expression::Column(node) => &node.name,
            Expression::Function(node) => &node.name,
            Expression::Source(node) => &node.name,
            Expression::Option(node) => &node.name,
            Expression::InlineCast(node) => &node.name,
            Expression::Order(node) => &node.name,
            Expression::Grouping(node) => &node.name,
            Expression::Identifier(node) => &node.name,
            Expression::List(node) => &node.name,
            Expression::TimeInterval(node) => &node.name,
            Expression::Unknown(node) => &node.name,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Expression::Literal(node) => &node.text,
            Expression::Column(node) => &node.text,
            Expression::Function(node) => &node.text,
            Expression::Source(node) => &node.text,
            Expression::Option(node) => &node.text,
            Expression::InlineCast(node) => &node.text,
            Expression::Order(node) => &node.text,
            Expression::Grouping(node) => &node.text,
            Expression::Identifier(node) => &node.text,
            Expression::List(node) => &node.text,
            Expression::TimeInterval(node) => &node.text,
            Expression::Unknown(node) => &node.text,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Expression::Literal(node) => node.location,
            Expression::Column(node) => node.location,
            Expression::Function(node) => node.location,
            Expression::Source(node) => node.location,
            Expression::Option(node) => node.location,
            Expression::InlineCast(node) => node.location,
            Expression::Order(node) => node.location,
            Expression::Grouping(node) => node.location,
            Expression::Identifier(node) => node.location,
            Expression::List(node) => node.location,
            Expression::TimeInterval(node) => node.location,
            Expression::Unknown(node) => node.location,
        }
    }

    pub fn incomplete(&self) -> bool {
        match self {
            Expression::Literal(node) => node.incomplete,
            Expression::Column(node) => node.incomplete,
            Expression::Function(node) => node.incomplete,
            Expression::Source(node) => node.incomplete,
            Expression::Option(node) => node.incomplete,
            Expression::InlineCast(node) => node.incomplete,
            Expression::Order(node) => node.incomplete,
            Expression::Grouping(node) => node.incomplete,
            Expression::Identifier(node) => node.incomplete,
            Expression::List(node) => node.incomplete,
            Expression::TimeInterval(node) => node.incomplete,
            Expression::Unknown(node) => node.incomplete,
        }
    }

    pub(crate) fn set_incomplete(&mut self) {
        match self {
            Expression::Literal(node) => node.incomplete = true,
            Expression::Column(node) => node.incomplete = true,
            Expression::Function(node) => node.incomplete = true,
            Expression::Source(node) => node.incomplete = true,
            Expression::Option(node) => node.incomplete = true,
            Expression::InlineCast(node) => node.incomplete = true,
            Expression::Order(node) => node.incomplete = true,
            Expression::Grouping(node) => node.incomplete = true,
            Expression::Identifier(node) => node.incomplete = true,
            Expression::List(node) => node.incomplete = true,
            Expression::TimeInterval(node) => node.incomplete = true,
            Expression::Unknown(node) => node.incomplete = true,
        }
    }

    /// Child expressions in source order.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Function(node) => node.args.iter().collect(),
            Expression::Option(node) => node.args.iter().collect(),
            Expression::Order(node) => node.args.iter().collect(),
            Expression::Grouping(node) => node.entries.iter().collect(),
            Expression::List(node) => node.values.iter().collect(),
            Expression::InlineCast(node) => vec![node.value.as_ref()],
            Expression::Literal(_)
            | Expression::Column(_)
            | Expression::Source(_)
            | Expression::Identifier(_)
            | Expression::TimeInterval(_)
            | Expression::Unknown(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralType {
    Integer,
    Double,
    Boolean,
    Null,
    Keyword,
    Param,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub literal_type: LiteralType,
    pub value: Value,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub values: Vec<Expression>,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Dotted name with backtick quoting removed.
    pub name: String,
    pub parts: Vec<String>,
    pub quoted: bool,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Index,
    Policy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub source_type: SourceType,
    /// Index name or policy name without any qualifier.
    pub index: String,
    /// Cluster alias of an index, or execution mode of an enrich policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

// ---------------------------------------------------------------------------
// Compound nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionSubtype {
    VariadicCall,
    BinaryExpression,
    UnaryExpression,
    PostfixUnaryExpression,
}

/// Function calls and operators. Operators use their lower-cased keyword or
/// symbol as the name (`and`, `not in`, `==`, `is null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub subtype: FunctionSubtype,
    pub args: Vec<Expression>,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

/// Named clause inside a command, e.g. `BY`, `ON`, `WITH`, `METADATA`, `AS`.
///
/// The JOIN `on` option has two shapes. With zero or one condition, or with
/// conditions that repeat each other, `args` holds the conditions directly.
/// With two or more distinct conditions, `args` holds a single
/// [`Grouping`] of kind [`GroupingKind::AllOf`] wrapping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub args: Vec<Expression>,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineCast {
    pub value: Box<Expression>,
    pub cast_type: String,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullsOrder {
    /// Left to the engine when the query does not say.
    #[default]
    Unspecified,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub args: Vec<Expression>,
    pub order: SortDirection,
    pub nulls: NullsOrder,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

/// Best-effort node for an unparsable fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unknown {
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupingKind {
    /// Alternatives. No command builds this kind; it is public for callers
    /// assembling ASTs of their own.
    AnyOf,
    /// Every entry applies. JOIN `on` uses it.
    AllOf,
}

impl GroupingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingKind::AnyOf => "anyOf",
            GroupingKind::AllOf => "allOf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingError {
    #[error("{kind} needs at least 2 entries, got {found}")]
    TooFewEntries { kind: &'static str, found: usize },

    #[error("{kind} entries must be unique, '{entry}' appears more than once")]
    DuplicateEntry { kind: &'static str, entry: String },
}

/// "Any of" / "all of" wrapper around two or more distinct entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub kind: GroupingKind,
    pub entries: Vec<Expression>,
    pub name: String,
    pub text: String,
    pub location: Location,
    pub incomplete: bool,
}

impl Grouping {
    /// Wrap `entries`. Entries are compared by their source text.
    pub fn new(kind: GroupingKind, entries: Vec<Expression>) -> Result<Self, GroupingError> {
        if entries.len() < 2 {
            return Err(GroupingError::TooFewEntries {
                kind: kind.as_str(),
                found: entries.len(),
            });
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|seen| seen.text() == entry.text()) {
                return Err(GroupingError::DuplicateEntry {
                    kind: kind.as_str(),
                    entry: entry.text().to_string(),
                });
            }
        }

        let location = entries
            .iter()
            .map(Expression::location)
            .reduce(Location::join)
            .unwrap_or_default();
        let text = entries
            .iter()
            .map(Expression::text)
            .collect::<Vec<_>>()
            .join(", ");
        let incomplete = entries.iter().any(Expression::incomplete);

        Ok(Self {
            kind,
            entries,
            name: kind.as_str().to_string(),
            text,
            location,
            incomplete,
        })
    }

    /// Grouping of alternatives. The builder never produces one; it exists so
    /// the grouping API covers both kinds.
    pub fn any_of(entries: Vec<Expression>) -> Result<Self, GroupingError> {
        Self::new(GroupingKind::AnyOf, entries)
    }

    pub fn all_of(entries: Vec<Expression>) -> Result<Self, GroupingError> {
        Self::new(GroupingKind::AllOf, entries)
    }
}
