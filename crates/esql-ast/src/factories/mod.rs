//! Node factories
//!
//! One constructor per node kind. Each takes the CST node it describes and
//! copies its text and location onto the AST node. Command-specific shapes
//! live in the submodules.

use pest::iterators::Pair;

use crate::ast::*;
use crate::cst::PairExt;
use crate::parser::Rule;
use crate::position::{location_of, text_of};

pub mod change_point;
pub mod dissect;
pub mod expressions;
pub mod from;
pub mod grok;
pub mod join;
pub mod row;
pub mod stats;
pub mod where_command;

/// Command node with no arguments yet. `incomplete` is set when the command's
/// subtree holds an error fragment or a missing token.
pub fn create_command(name: &str, ctx: &Pair<'_, Rule>) -> Command {
    Command {
        name: name.to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: ctx.contains_error(),
        args: Vec::new(),
        sources: Vec::new(),
    }
}

pub fn create_option(name: &str, ctx: &Pair<'_, Rule>, args: Vec<Expression>) -> Expression {
    Expression::Option(CommandOption {
        incomplete: ctx.contains_error() || args.iter().any(Expression::incomplete),
        args,
        name: name.to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
    })
}

pub fn create_function(
    name: &str,
    subtype: FunctionSubtype,
    ctx: &Pair<'_, Rule>,
    args: Vec<Expression>,
) -> Expression {
    Expression::Function(Function {
        subtype,
        incomplete: args.iter().any(Expression::incomplete),
        args,
        name: name.to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
    })
}

/// Operator node spanning from its first to its last operand. `container` is
/// the CST node the operands were read from; the text is sliced out of it.
pub fn create_operator(
    name: &str,
    subtype: FunctionSubtype,
    container: &Pair<'_, Rule>,
    args: Vec<Expression>,
) -> Expression {
    let location = args
        .iter()
        .map(Expression::location)
        .reduce(Location::join)
        .unwrap_or_else(|| location_of(container));
    Expression::Function(Function {
        subtype,
        incomplete: args.iter().any(Expression::incomplete),
        args,
        name: name.to_string(),
        text: slice_within(container, location),
        location,
    })
}

/// Text of `location`, which must lie inside `container`.
pub(crate) fn slice_within(container: &Pair<'_, Rule>, location: Location) -> String {
    let base = container.as_span().start();
    let text = container.as_str();
    let start = location.min.saturating_sub(base);
    let end = (location.max + 1).saturating_sub(base).min(text.len());
    text.get(start..end).unwrap_or_default().to_string()
}

pub fn create_identifier(ctx: &Pair<'_, Rule>) -> Expression {
    let text = text_of(ctx);
    Expression::Identifier(Identifier {
        name: unquote_identifier(&text),
        text,
        location: location_of(ctx),
        incomplete: false,
    })
}

pub fn create_unknown(ctx: &Pair<'_, Rule>) -> Expression {
    Expression::Unknown(Unknown {
        name: "unknown".to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: true,
    })
}

/// Column from a `qualified_name` or `qualified_name_pattern` node, or from a
/// single identifier token.
pub fn create_column(ctx: &Pair<'_, Rule>) -> Expression {
    let parts_ctx: Vec<_> = match ctx.as_rule() {
        Rule::qualified_name | Rule::qualified_name_pattern => ctx.children().collect(),
        _ => vec![ctx.clone()],
    };
    let quoted = parts_ctx
        .iter()
        .any(|part| part.as_rule() == Rule::quoted_identifier);
    let parts: Vec<String> = parts_ctx
        .iter()
        .map(|part| unquote_identifier(part.as_str()))
        .collect();

    Expression::Column(Column {
        name: parts.join("."),
        parts,
        quoted,
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: ctx.contains_error(),
    })
}

/// `*` argument of `COUNT(*)`.
pub fn create_wildcard_column(ctx: &Pair<'_, Rule>) -> Expression {
    Expression::Column(Column {
        name: "*".to_string(),
        parts: vec!["*".to_string()],
        quoted: false,
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: false,
    })
}

fn unquote_identifier(text: &str) -> String {
    match text.strip_prefix('`').and_then(|rest| rest.strip_suffix('`')) {
        Some(inner) => inner.replace("``", "`"),
        None => text.to_string(),
    }
}

/// Source from an `index_pattern` node (`cluster:index::selector` or a quoted
/// string).
pub fn create_source(ctx: &Pair<'_, Rule>) -> Source {
    let (index, prefix, selector) = match ctx.child(Rule::string) {
        Some(quoted) => (unquote_string(quoted.as_str()), None, None),
        None => (
            ctx.child(Rule::index_string)
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            ctx.child(Rule::cluster_string).map(|p| p.as_str().to_string()),
            ctx.child(Rule::selector_string).map(|p| p.as_str().to_string()),
        ),
    };

    Source {
        source_type: SourceType::Index,
        name: source_name(prefix.as_deref(), &index, selector.as_deref()),
        index,
        prefix,
        selector,
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: false,
    }
}

/// Source from an `enrich_policy_name` node (`_mode:policy`).
pub fn create_policy_source(ctx: &Pair<'_, Rule>) -> Source {
    let index = ctx
        .child(Rule::enrich_policy)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let prefix = ctx.child(Rule::enrich_mode).map(|p| p.as_str().to_string());

    Source {
        source_type: SourceType::Policy,
        name: source_name(prefix.as_deref(), &index, None),
        index,
        prefix,
        selector: None,
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: false,
    }
}

fn source_name(prefix: Option<&str>, index: &str, selector: Option<&str>) -> String {
    let mut name = String::new();
    if let Some(prefix) = prefix {
        name.push_str(prefix);
        name.push(':');
    }
    name.push_str(index);
    if let Some(selector) = selector {
        name.push_str("::");
        name.push_str(selector);
    }
    name
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Literal from a constant token. Tokens that do not hold a literal produce
/// an `Unknown` node.
pub fn create_literal(ctx: &Pair<'_, Rule>) -> Expression {
    let text = ctx.as_str();
    let (literal_type, value) = match ctx.as_rule() {
        Rule::null_literal => (LiteralType::Null, Value::Null),
        Rule::boolean_literal => (
            LiteralType::Boolean,
            Value::Bool(text.eq_ignore_ascii_case("true")),
        ),
        Rule::integer_literal => match text.parse::<i64>() {
            Ok(n) => (LiteralType::Integer, Value::Int(n)),
            // Out of i64 range: keep the magnitude as a double.
            Err(_) => (
                LiteralType::Double,
                Value::Float(text.parse::<f64>().unwrap_or(f64::INFINITY)),
            ),
        },
        Rule::decimal_literal => (
            LiteralType::Double,
            Value::Float(text.parse::<f64>().unwrap_or(f64::NAN)),
        ),
        Rule::string => (LiteralType::Keyword, Value::String(unquote_string(text))),
        Rule::param => (LiteralType::Param, Value::String(text[1..].to_string())),
        Rule::unterminated_string => {
            let text = text_of(ctx);
            return Expression::Literal(Literal {
                literal_type: LiteralType::Keyword,
                value: Value::String(text.get(1..).unwrap_or_default().to_string()),
                name: text.clone(),
                text,
                location: location_of(ctx),
                incomplete: true,
            });
        }
        _ => return create_unknown(ctx),
    };

    Expression::Literal(Literal {
        literal_type,
        value,
        name: text.to_string(),
        text: text.to_string(),
        location: location_of(ctx),
        incomplete: false,
    })
}

/// Integer operand of a command such as LIMIT. A value outside the `i64`
/// range stays an integer literal holding its digits and is incomplete.
pub fn create_integer_literal(ctx: &Pair<'_, Rule>) -> Expression {
    let text = text_of(ctx);
    let (value, incomplete) = match text.parse::<i64>() {
        Ok(n) => (Value::Int(n), false),
        Err(_) => (Value::String(text.clone()), true),
    };
    Expression::Literal(Literal {
        literal_type: LiteralType::Integer,
        value,
        name: text.clone(),
        text,
        location: location_of(ctx),
        incomplete,
    })
}

pub fn create_list(ctx: &Pair<'_, Rule>, values: Vec<Expression>) -> Expression {
    Expression::List(List {
        incomplete: values.iter().any(Expression::incomplete),
        values,
        name: "list".to_string(),
        text: text_of(ctx),
        location: location_of(ctx),
    })
}

pub fn create_time_interval(ctx: &Pair<'_, Rule>) -> Expression {
    let quantity = ctx
        .children()
        .find(|p| matches!(p.as_rule(), Rule::integer_literal | Rule::decimal_literal))
        .and_then(|p| p.as_str().parse::<f64>().ok())
        .unwrap_or_default();
    let unit = ctx
        .child(Rule::time_unit)
        .map(|p| p.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    Expression::TimeInterval(TimeInterval {
        quantity,
        name: unit.clone(),
        unit,
        text: text_of(ctx),
        location: location_of(ctx),
        incomplete: false,
    })
}

/// Strip quotes from a string token and resolve escapes. Triple-quoted
/// strings are taken verbatim.
pub(crate) fn unquote_string(text: &str) -> String {
    if let Some(inner) = text
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return inner.to_string();
    }

    let inner = text
        .strip_prefix('"')
        .map(|rest| rest.strip_suffix('"').unwrap_or(rest))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
